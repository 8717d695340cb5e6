use ahash::{AHashMap, AHashSet};

use crate::codec::MapId;
use crate::error::{Error, Result};
use crate::state::{ConnectionRecord, MapConnection};

/// Validated, bidirectional view of the map connections.
///
/// Each map's edge list holds its explicit connections in record order,
/// followed by the reverse edges implied by other maps' records.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    explicit: Vec<MapConnection>,
    edges: AHashMap<MapId, Vec<MapConnection>>,
    implied: usize,
}

impl ConnectionGraph {
    /// Parse and check every record against the known map ids. Any bad
    /// record fails the whole build.
    pub fn build(maps: impl IntoIterator<Item = MapId>, records: &[ConnectionRecord]) -> Result<Self> {
        let known: AHashSet<MapId> = maps.into_iter().collect();

        let mut explicit = Vec::with_capacity(records.len());
        for record in records {
            let conn = record.parse()?;
            for id in [conn.from, conn.to] {
                if !known.contains(&id) {
                    return Err(Error::UnresolvableConnection {
                        from: conn.from,
                        to: conn.to,
                        reason: format!("unknown map {id}"),
                    });
                }
            }
            explicit.push(conn);
        }

        let pairs: AHashSet<(MapId, MapId)> = explicit.iter().map(|c| (c.from, c.to)).collect();
        let mut edges: AHashMap<MapId, Vec<MapConnection>> = AHashMap::new();
        for conn in &explicit {
            edges.entry(conn.from).or_default().push(*conn);
        }
        let mut implied = 0;
        for conn in &explicit {
            if !pairs.contains(&(conn.to, conn.from)) {
                edges.entry(conn.to).or_default().push(conn.reversed());
                implied += 1;
            }
        }

        Ok(Self { explicit, edges, implied })
    }

    /// Outgoing edges of `map`, explicit first
    pub fn edges_from(&self, map: MapId) -> &[MapConnection] {
        self.edges.get(&map).map_or(&[], Vec::as_slice)
    }

    /// Connections exactly as recorded
    pub fn explicit(&self) -> &[MapConnection] {
        &self.explicit
    }

    pub fn implied_count(&self) -> usize {
        self.implied
    }

    /// Total directed edges, implied ones included
    pub fn len(&self) -> usize {
        self.explicit.len() + self.implied
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Direction;

    #[test]
    fn test_implied_reverse() {
        let records = [ConnectionRecord::new(0, 1, "north", 2)];
        let graph = ConnectionGraph::build([0, 1], &records).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges_from(1), &[MapConnection::new(1, 0, Direction::South, 2)]);
        assert!(graph.edges_from(7).is_empty());
    }

    #[test]
    fn test_explicit_reverse_wins() {
        let records = [
            ConnectionRecord::new(0, 1, "east", 0),
            ConnectionRecord::new(1, 0, "west", -1),
        ];
        let graph = ConnectionGraph::build([0, 1], &records).unwrap();
        assert_eq!(graph.implied_count(), 0);
        assert_eq!(graph.edges_from(1), &[MapConnection::new(1, 0, Direction::West, -1)]);
    }

    #[test]
    fn test_explicit_edges_first() {
        let records = [
            ConnectionRecord::new(2, 0, "south", 0),
            ConnectionRecord::new(0, 1, "north", 0),
        ];
        let graph = ConnectionGraph::build([0, 1, 2], &records).unwrap();
        let from_root = graph.edges_from(0);
        assert_eq!(from_root[0], MapConnection::new(0, 1, Direction::North, 0));
        assert_eq!(from_root[1], MapConnection::new(0, 2, Direction::North, 0));
    }

    #[test]
    fn test_unknown_map() {
        let records = [ConnectionRecord::new(0, 99, "north", 0)];
        let err = ConnectionGraph::build([0, 1], &records).unwrap_err();
        assert!(matches!(err, Error::UnresolvableConnection { from: 0, to: 99, .. }));
    }

    #[test]
    fn test_bad_direction() {
        let records = [ConnectionRecord::new(0, 1, "sideways", 0)];
        assert!(ConnectionGraph::build([0, 1], &records).is_err());
    }
}
