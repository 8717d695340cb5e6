use serde::{Deserialize, Serialize};

use crate::codec::{Direction, MapId};
use crate::error::{Error, Result};

/// A connection as ingested, direction still free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: MapId,
    pub to: MapId,
    pub direction: String,
    /// Lateral offset in blocks
    #[serde(default)]
    pub offset: i32,
}

impl ConnectionRecord {
    pub fn new(from: MapId, to: MapId, direction: impl Into<String>, offset: i32) -> Self {
        Self { from, to, direction: direction.into(), offset }
    }

    pub fn parse(&self) -> Result<MapConnection> {
        let direction = self.direction.parse::<Direction>().map_err(|reason| {
            Error::UnresolvableConnection { from: self.from, to: self.to, reason }
        })?;
        Ok(MapConnection {
            from: self.from,
            to: self.to,
            direction,
            offset: self.offset,
        })
    }
}

/// Directed edge: `to` lies in `direction` from `from`, shifted laterally by
/// `offset` blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapConnection {
    pub from: MapId,
    pub to: MapId,
    pub direction: Direction,
    pub offset: i32,
}

impl MapConnection {
    pub fn new(from: MapId, to: MapId, direction: Direction, offset: i32) -> Self {
        Self { from, to, direction, offset }
    }

    /// The implied edge back, opposite direction, same offset
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            direction: self.direction.opposite(),
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let conn = ConnectionRecord::new(0, 12, "north", -3).parse().unwrap();
        assert_eq!(conn, MapConnection::new(0, 12, Direction::North, -3));
        assert_eq!(conn.reversed(), MapConnection::new(12, 0, Direction::South, -3));
    }

    #[test]
    fn test_parse_bad_direction() {
        let err = ConnectionRecord::new(1, 2, "up", 0).parse().unwrap_err();
        assert!(matches!(err, Error::UnresolvableConnection { from: 1, to: 2, .. }));
        assert!(ConnectionRecord::new(1, 2, "South", 0).parse().is_err());
    }
}
