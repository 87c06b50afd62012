//! Per-column DDA wall caster.
//!
//! ```text
//!   cameraX = 2·x / w − 1
//!   ray     = dir + plane · cameraX
//! ```
//!
//! The grid is walked one cell boundary at a time, always taking whichever
//! axis crosses its next grid line first, until a solid cell is entered or
//! the ray leaves the map.

use glam::Vec2;

use crate::{
    config::RenderConfig,
    engine::types::{RayHit, Side},
    world::{Camera, Tile, TileGrid},
};

/// Cast a single ray from world position `pos` along `ray`.
///
/// The returned hit has `column == 0`; [`cast_columns`] fills it in.
pub fn cast_ray(grid: &TileGrid, pos: Vec2, ray: Vec2, cfg: &RenderConfig) -> RayHit {
    let mut map_x = pos.x.floor() as i32;
    let mut map_y = pos.y.floor() as i32;

    // zero component → never crosses that axis
    let delta_x = if ray.x == 0.0 { f32::INFINITY } else { ray.x.recip().abs() };
    let delta_y = if ray.y == 0.0 { f32::INFINITY } else { ray.y.recip().abs() };

    let (step_x, mut side_x) = if ray.x < 0.0 {
        (-1, (pos.x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - pos.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray.y < 0.0 {
        (-1, (pos.y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - pos.y) * delta_y)
    };

    // A ray can cross at most w + h cell boundaries before it leaves.
    let max_steps = grid.width() + grid.height() + 2;

    let mut side = Side::X;
    let mut hit: Option<Tile> = None;
    for _ in 0..max_steps {
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = Side::X;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = Side::Y;
        }

        match grid.get(map_x, map_y) {
            None => break,
            Some(t) if !t.is_walkable() => {
                hit = Some(t);
                break;
            }
            Some(_) => {}
        }
    }

    let perp = match side {
        Side::X => side_x - delta_x,
        Side::Y => side_y - delta_y,
    };

    let distance = match hit {
        Some(_) => sanitize_distance(perp, cfg),
        None => cfg.max_distance,
    };

    // U from the axis we did *not* step on
    let wall_u = if perp.is_finite() {
        let along = match side {
            Side::X => pos.y + perp * ray.y,
            Side::Y => pos.x + perp * ray.x,
        };
        along - along.floor()
    } else {
        0.0
    };

    RayHit {
        column: 0,
        distance,
        side,
        tile_x: map_x,
        tile_y: map_y,
        is_door: hit == Some(Tile::Door),
        wall_u,
        outside: hit.is_none(),
        step: match side {
            Side::X => step_x,
            Side::Y => step_y,
        },
    }
}

/// Non-finite or non-positive → the far limit; otherwise clamp into range.
#[inline]
pub fn sanitize_distance(d: f32, cfg: &RenderConfig) -> f32 {
    if !d.is_finite() || d <= 0.0 {
        cfg.max_distance
    } else {
        d.clamp(cfg.min_distance, cfg.max_distance)
    }
}

/// Normalised camera-space offset of screen column `x`.
#[inline(always)]
pub fn camera_x(x: usize, width: usize) -> f32 {
    2.0 * x as f32 / width as f32 - 1.0
}

/// Cast every `stride`-th column of a `width`-wide view into `out`.
pub fn cast_columns(
    grid: &TileGrid,
    cam: &Camera,
    width: usize,
    stride: usize,
    cfg: &RenderConfig,
    out: &mut Vec<RayHit>,
) {
    out.clear();
    if width == 0 {
        return;
    }
    for x in (0..width).step_by(stride.max(1)) {
        let ray = cam.proj.ray_dir(camera_x(x, width));
        let mut hit = cast_ray(grid, cam.pos, ray, cfg);
        hit.column = x;
        out.push(hit);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
