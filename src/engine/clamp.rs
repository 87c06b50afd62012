//! Camera safety clamp.
//!
//! The animator interpolates between tiles, so the visual pose can sit
//! anywhere on the segment between two tile centres, including right up
//! against a wall face. Rendering from there shows the inside of the
//! wall. This module turns the candidate pose into a world-space camera
//! position that is always inside a walkable tile and away from its edges.

use glam::{Vec2, vec2};

use crate::{
    config::RenderConfig,
    world::{Pose, TILE_CENTRE, TileGrid},
};

/// Output of [`safe_camera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeCamera {
    /// World-space camera position.
    pub pos: Vec2,
    /// The visual pose was discarded in favour of the logical tile.
    pub snapped: bool,
}

/// Pick the camera position for this frame.
///
/// * `logical` – authoritative pose from game logic.
/// * `visual`  – optional interpolated (x, y) in the same grid units.
pub fn safe_camera(
    grid: &TileGrid,
    logical: &Pose,
    visual: Option<Vec2>,
    cfg: &RenderConfig,
) -> SafeCamera {
    let raw = visual.unwrap_or_else(|| logical.pos());

    // 1. keep inside the map, minus a margin
    let raw = clamp_to_map(grid, raw, cfg.edge_margin);

    // 2. split into tile + remainder (world space)
    let world = raw + Vec2::splat(TILE_CENTRE);
    let tile = world.floor();
    let (tx, ty) = (tile.x as i32, tile.y as i32);

    // 3. anything solid around us → trust game logic instead
    let enclosed = grid.is_walkable(tx, ty)
        && grid.is_walkable(tx, ty - 1)
        && grid.is_walkable(tx + 1, ty)
        && grid.is_walkable(tx, ty + 1)
        && grid.is_walkable(tx - 1, ty);

    let (tile, frac, snapped) = if enclosed {
        (tile, world - tile, false)
    } else {
        let (lx, ly) = logical.tile();
        let lx = lx.clamp(0, grid.width() as i32 - 1);
        let ly = ly.clamp(0, grid.height() as i32 - 1);
        (
            vec2(lx as f32, ly as f32),
            Vec2::splat(TILE_CENTRE),
            visual.is_some(),
        )
    };

    // 4. bias towards the tile centre
    let frac = frac.clamp(Vec2::splat(cfg.band_min), Vec2::splat(cfg.band_max));

    SafeCamera {
        pos: tile + frac,
        snapped,
    }
}

fn clamp_to_map(grid: &TileGrid, p: Vec2, margin: f32) -> Vec2 {
    let hi_x = (grid.width() as f32 - 1.0 - margin).max(margin);
    let hi_y = (grid.height() as f32 - 1.0 - margin).max(margin);
    vec2(p.x.clamp(margin, hi_x), p.y.clamp(margin, hi_y))
}
