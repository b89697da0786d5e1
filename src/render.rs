//! Plain-text map dump for debugging a colony's world

use std::collections::HashMap;

use crate::coords::{colony_anchor, TilePos};
use crate::fog::RevealMap;
use crate::tile::WorldTile;

const FOG: char = '?';
const UNKNOWN: char = ' ';
const HOME: char = '@';

/// Render every materialized tile inside their bounding box, one row per line.
/// Fogged tiles show `?`, missing tiles a blank, the anchor `@`, worn tiles `#`
/// once they reach trail tier.
pub fn render_ascii(tiles: &[WorldTile], reveal: &RevealMap) -> String {
    let Some((min, max)) = bounding_box(tiles) else {
        return String::new();
    };
    let by_pos: HashMap<TilePos, &WorldTile> = tiles.iter().map(|t| (t.pos(), t)).collect();
    let anchor = colony_anchor();

    let mut out = String::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let pos = TilePos::new(x, y);
            let glyph = match by_pos.get(&pos) {
                _ if pos == anchor => HOME,
                None => UNKNOWN,
                Some(_) if !reveal.is_revealed(pos) => FOG,
                Some(tile) if tile.path_wear >= 60 => '#',
                Some(tile) => tile.terrain.glyph(),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn bounding_box(tiles: &[WorldTile]) -> Option<(TilePos, TilePos)> {
    let first = tiles.first()?;
    let mut min = first.pos();
    let mut max = first.pos();
    for tile in tiles {
        min.x = min.x.min(tile.x);
        min.y = min.y.min(tile.y);
        max.x = max.x.max(tile.x);
        max.y = max.y.max(tile.y);
    }
    Some((min, max))
}
