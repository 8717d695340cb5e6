use indexmap::IndexMap;

use crate::codec::{Extent, MapId, Offset, TileRect};

/// Lay out `maps` in rows to the right of `occupied`, `gap` tiles apart.
///
/// A row wraps once it would grow past `row_width` tiles; a map wider than
/// that gets a row of its own.
pub fn grid_layout(
    maps: &[MapId],
    extents: &IndexMap<MapId, Extent>,
    occupied: Option<TileRect>,
    gap: i32,
    row_width: i32,
) -> IndexMap<MapId, Offset> {
    let gap = gap.max(0);
    let left = occupied.map_or(0, |r| r.max_x.saturating_add(gap));
    let mut x = left;
    let mut y = occupied.map_or(0, |r| r.min_y);
    let mut row_height = 0;

    let mut offsets = IndexMap::with_capacity(maps.len());
    for &id in maps {
        let Some(&extent) = extents.get(&id) else { continue };
        if x > left && x - left + extent.width > row_width {
            x = left;
            y = y.saturating_add(row_height + gap);
            row_height = 0;
        }
        offsets.insert(id, Offset::new(x, y));
        x = x.saturating_add(extent.width + gap);
        row_height = row_height.max(extent.height);
    }
    offsets
}
