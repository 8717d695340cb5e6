//! Breadth-first placement of connected maps in one global tile space.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::debug;

use crate::codec::{Direction, Extent, MapId, Offset, TileRect, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::layout::graph::ConnectionGraph;
use crate::state::{MapConnection, MapTiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Unvisited,
    Queued,
    Placed,
}

/// Offset of a neighbor lying in `direction` from a map at `origin`.
///
/// `lateral` is in blocks. North grows y past the map's height, south
/// places the neighbor's full height below `origin.y`. `None` when the
/// neighbor, far corner included, would leave the `i32` coordinate space.
pub fn neighbor_offset(
    origin: Offset,
    from: Extent,
    to: Extent,
    direction: Direction,
    lateral: i32,
) -> Option<Offset> {
    let shift = lateral.checked_mul(BLOCK_SIZE)?;
    let (x, y) = match direction {
        Direction::North => (origin.x.checked_add(shift)?, origin.y.checked_add(from.height)?),
        Direction::South => (origin.x.checked_add(shift)?, origin.y.checked_sub(to.height)?),
        Direction::East => (origin.x.checked_add(from.width)?, origin.y.checked_add(shift)?),
        Direction::West => (origin.x.checked_sub(to.width)?, origin.y.checked_add(shift)?),
    };
    x.checked_add(to.width)?;
    y.checked_add(to.height)?;
    Some(Offset::new(x, y))
}

/// Solver output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub root: MapId,
    /// Offsets of placed maps, in BFS order
    pub offsets: IndexMap<MapId, Offset>,
    /// Edge that placed each map other than the root
    pub placed_by: IndexMap<MapId, MapConnection>,
    /// Maps the BFS never reached
    pub unplaced: Vec<MapId>,
}

impl Placement {
    pub fn offset(&self, map: MapId) -> Option<Offset> {
        self.offsets.get(&map).copied()
    }

    pub fn is_placed(&self, map: MapId) -> bool {
        self.offsets.contains_key(&map)
    }

    /// Bounding box of every placed map
    pub fn bounds(&self, extents: &IndexMap<MapId, Extent>) -> Option<TileRect> {
        self.offsets
            .iter()
            .filter_map(|(id, &offset)| extents.get(id).map(|&e| TileRect::at(offset, e)))
            .reduce(|a, b| a.union(&b))
    }
}

pub struct CoordinateSolver<'a> {
    graph: &'a ConnectionGraph,
    extents: &'a IndexMap<MapId, Extent>,
}

impl<'a> CoordinateSolver<'a> {
    pub fn new(graph: &'a ConnectionGraph, extents: &'a IndexMap<MapId, Extent>) -> Self {
        Self { graph, extents }
    }

    /// Place every map reachable from `root`, root at (0, 0). The first
    /// offset computed for a map is final.
    pub fn solve(&self, root: MapId) -> Result<Placement> {
        if !self.extents.contains_key(&root) {
            return Err(Error::UnknownRootMap(root));
        }

        let mut state: IndexMap<MapId, PlacementState> =
            self.extents.keys().map(|&id| (id, PlacementState::Unvisited)).collect();
        let mut placement = Placement { root, ..Placement::default() };
        let mut queue = VecDeque::new();

        state.insert(root, PlacementState::Queued);
        queue.push_back((root, Offset::ZERO));

        while let Some((map, offset)) = queue.pop_front() {
            state.insert(map, PlacementState::Placed);
            placement.offsets.insert(map, offset);
            let Some(&extent) = self.extents.get(&map) else { continue };

            for edge in self.graph.edges_from(map) {
                if state.get(&edge.to) != Some(&PlacementState::Unvisited) {
                    continue;
                }
                let Some(&to_extent) = self.extents.get(&edge.to) else { continue };
                let Some(next) = neighbor_offset(offset, extent, to_extent, edge.direction, edge.offset) else {
                    return Err(Error::UnresolvableConnection {
                        from: edge.from,
                        to: edge.to,
                        reason: format!("lateral offset {} leaves the coordinate space", edge.offset),
                    });
                };
                debug!("map {} {} of {} at {next}", edge.to, edge.direction, map);
                state.insert(edge.to, PlacementState::Queued);
                placement.placed_by.insert(edge.to, *edge);
                queue.push_back((edge.to, next));
            }
        }

        placement.unplaced = state
            .iter()
            .filter(|&(_, &s)| s == PlacementState::Unvisited)
            .map(|(&id, _)| id)
            .collect();
        Ok(placement)
    }
}

/// Reset every map to local coordinates, then translate placed maps by
/// their offset. Safe to repeat.
pub fn apply_placement(maps: &mut IndexMap<MapId, MapTiles>, offsets: &IndexMap<MapId, Offset>) {
    for (id, tiles) in maps.iter_mut() {
        match offsets.get(id) {
            Some(&offset) => tiles.place(offset),
            None => tiles.reset_to_local(),
        }
    }
}
