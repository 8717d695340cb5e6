use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::{Direction, Extent, MapId, Offset};
use crate::layout::graph::ConnectionGraph;
use crate::layout::solver::{neighbor_offset, Placement};

/// A recorded connection that disagrees with where BFS put its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetConflict {
    pub from: MapId,
    pub to: MapId,
    pub direction: Direction,
    /// Where `to` was placed
    pub placed: Offset,
    /// Where this connection would put it
    pub expected: Offset,
}

/// Recompute each explicit connection between two placed maps and report
/// every divergence. The placement is left untouched.
///
/// A connection whose reverse placed its own source map is skipped; the
/// same lateral offset is used in both directions, so that pair never
/// round-trips exactly.
pub fn find_offset_conflicts(
    graph: &ConnectionGraph,
    extents: &IndexMap<MapId, Extent>,
    placement: &Placement,
) -> Vec<OffsetConflict> {
    let mut conflicts = Vec::new();
    for conn in graph.explicit() {
        let (Some(origin), Some(placed)) = (placement.offset(conn.from), placement.offset(conn.to)) else {
            continue;
        };
        if placement.placed_by.get(&conn.from) == Some(&conn.reversed()) {
            continue;
        }
        let (Some(&from), Some(&to)) = (extents.get(&conn.from), extents.get(&conn.to)) else {
            continue;
        };
        let Some(expected) = neighbor_offset(origin, from, to, conn.direction, conn.offset) else {
            continue;
        };
        if expected != placed {
            warn!(
                "connection {} -> {} ({}) puts map {} at {expected}, placed at {placed}",
                conn.from, conn.to, conn.direction, conn.to
            );
            conflicts.push(OffsetConflict {
                from: conn.from,
                to: conn.to,
                direction: conn.direction,
                placed,
                expected,
            });
        }
    }
    conflicts
}
