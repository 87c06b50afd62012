//! Wall and door compositing for one cast column.
//!
//! A strip `h / distance` tall is centred on the horizon and painted in
//! layers: texture (or flat colour), trim, then distance fog. Plain walls
//! get a baseboard cut from the floor texture; doors get a stone frame,
//! a recess seam and a lintel cut from the wall texture.

use crate::{
    config::RenderConfig,
    engine::types::{RayHit, Screen, Side},
    renderer::{Rect, Rgba, SrcRect, Surface, Tint, rgb},
    world::{OpenFaces, Texture, TexturePool, TileGrid},
};

/// Flat wall colours by side (X, Y) while no wall image is loaded.
pub const WALL_FLAT: [Rgba; 2] = [rgb(0x77, 0x77, 0x77), rgb(0x55, 0x55, 0x55)];
/// Flat door colours by side (X, Y) while no door image is loaded.
pub const DOOR_FLAT: [Rgba; 2] = [rgb(0x4a, 0x5a, 0x60), rgb(0x3a, 0x4a, 0x50)];

const BLACK: Rgba = 0xFF00_0000;

/* trim ---------------------------------------------------------------*/
const SEAM_WIDTH: f32 = 0.03;
const SEAM_ALPHA: f32 = 0.4;
const LINTEL_SOURCE: f32 = 0.2;
const LINTEL_SHADOW_ALPHA: f32 = 0.5;
const BASEBOARD_DARKEN: f32 = 0.25;
const BASEBOARD_CAP: Rgba = rgb(180, 170, 155);
const BASEBOARD_CAP_ALPHA: f32 = 0.4;
const BASEBOARD_FOOT_ALPHA: f32 = 0.5;

/// Linear fog amount in `[0, 1]` at `distance`.
#[inline]
pub fn fog_factor(distance: f32, cfg: &RenderConfig) -> f32 {
    let span = cfg.fog_end - cfg.fog_start;
    if span <= 0.0 {
        return if distance >= cfg.fog_end { 1.0 } else { 0.0 };
    }
    ((distance - cfg.fog_start) / span).clamp(0.0, 1.0)
}

/// Vertical extent of a wall strip on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strip {
    pub top: i32,
    pub height: i32,
}

impl Strip {
    pub fn new(screen: &Screen, distance: f32) -> Self {
        let line_h = screen.h as f32 / distance;
        Self {
            top: (screen.horizon - line_h * 0.5).round() as i32,
            height: (line_h.round() as i32).max(1),
        }
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Everything one column needs besides the hit itself.
pub struct ColumnCtx<'a> {
    pub screen: &'a Screen,
    pub grid: &'a TileGrid,
    pub pool: &'a TexturePool,
    pub stride: usize,
    pub cfg: &'a RenderConfig,
}

/// Composite the strip for `hit`.
pub fn draw_column<S: Surface + ?Sized>(surface: &mut S, ctx: &ColumnCtx<'_>, hit: &RayHit) {
    let strip = Strip::new(ctx.screen, hit.distance);
    let col = Rect::new(
        hit.column as i32,
        strip.top,
        ctx.stride.max(1) as i32,
        strip.height,
    );
    let shade = match hit.side {
        Side::X => 1.0,
        Side::Y => ctx.cfg.side_shade,
    };

    if hit.is_door {
        draw_door(surface, ctx, hit, col, shade);
    } else {
        draw_wall(surface, ctx, hit, col, shade);
        // Cast hits always enter through an open face; hand-built hits
        // against a solid neighbour must not get a baseboard.
        let open = ctx.grid.open_faces(hit.tile_x, hit.tile_y);
        if !hit.outside && open.contains(face_hit(hit)) {
            draw_baseboard(surface, ctx, hit, col, shade, hit.facing_cell());
        }
    }

    let fog = fog_factor(hit.distance, ctx.cfg);
    if fog > 0.0 {
        surface.fill_rect(col, BLACK, fog);
    }
}

/// Face of the hit cell the ray entered through.
fn face_hit(hit: &RayHit) -> OpenFaces {
    match (hit.side, hit.step > 0) {
        (Side::X, true) => OpenFaces::WEST,
        (Side::X, false) => OpenFaces::EAST,
        (Side::Y, true) => OpenFaces::NORTH,
        (Side::Y, false) => OpenFaces::SOUTH,
    }
}

fn draw_wall<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ColumnCtx<'_>,
    hit: &RayHit,
    col: Rect,
    shade: f32,
) {
    match ctx.pool.wall.pick(hit.tile_x, hit.tile_y) {
        Some(tex) => {
            let src = column_src(tex, hit.wall_u, 0.0, 1.0, ctx.cfg.texel_inset);
            surface.blit(tex, src, col, Tint::shade(shade));
        }
        None => surface.fill_rect(col, WALL_FLAT[hit.side as usize], 1.0),
    }
}

fn draw_baseboard<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ColumnCtx<'_>,
    hit: &RayHit,
    col: Rect,
    shade: f32,
    (fx, fy): (i32, i32),
) {
    let bb = ((col.h as f32 * ctx.cfg.baseboard).floor() as i32)
        .max(ctx.cfg.baseboard_min_px as i32)
        .min(col.h);
    let band = Rect::new(col.x, col.y + col.h - bb, col.w, bb);

    if let Some(tex) = ctx.pool.floor.pick(fx, fy) {
        let inset = ctx.cfg.texel_inset;
        let tw = tex.w as f32;
        let x = (hit.wall_u * tw).clamp(inset, (tw - 2.0 - inset).max(inset));
        let src = SrcRect::new(x, inset, 2.0, (tex.h as f32 - 2.0 * inset).max(1.0));
        surface.blit(tex, src, band, Tint::shade(shade));
        surface.fill_rect(band, BLACK, BASEBOARD_DARKEN);
    }

    // stone cap and the shadow where it meets the floor
    surface.fill_rect(
        Rect::new(band.x, band.y, band.w, 1),
        BASEBOARD_CAP,
        BASEBOARD_CAP_ALPHA,
    );
    surface.fill_rect(
        Rect::new(band.x, col.y + col.h - 1, band.w, 1),
        BLACK,
        BASEBOARD_FOOT_ALPHA,
    );
}

fn draw_door<S: Surface + ?Sized>(
    surface: &mut S,
    ctx: &ColumnCtx<'_>,
    hit: &RayHit,
    col: Rect,
    shade: f32,
) {
    let cfg = ctx.cfg;
    let u = hit.wall_u;
    let frame = cfg.door_frame;
    let wall = ctx.pool.wall.pick(hit.tile_x, hit.tile_y);

    if u < frame || u > 1.0 - frame {
        match wall {
            Some(tex) => {
                let src = column_src(tex, u, 0.0, 1.0, cfg.texel_inset);
                surface.blit(tex, src, col, Tint::shade(shade));
            }
            None => surface.fill_rect(col, WALL_FLAT[hit.side as usize], 1.0),
        }
        // recess seam on the panel side of each jamb
        let seam = (u < frame && u > frame - SEAM_WIDTH)
            || (u > 1.0 - frame && u < 1.0 - frame + SEAM_WIDTH);
        if seam {
            surface.fill_rect(col, BLACK, SEAM_ALPHA);
        }
        return;
    }

    let Some(door) = ctx.pool.door.pick(hit.tile_x, hit.tile_y) else {
        surface.fill_rect(col, DOOR_FLAT[hit.side as usize], 1.0);
        return;
    };

    let lintel = (col.h as f32 * cfg.door_lintel).floor() as i32;
    let panel = Rect::new(col.x, col.y + lintel, col.w, col.h - lintel);
    let du = ((u - frame) / (1.0 - 2.0 * frame)).clamp(0.0, 1.0);
    let src = column_src(door, du, 0.0, 1.0, cfg.texel_inset);
    surface.blit(door, src, panel, Tint::shade(shade));

    if lintel > 0 {
        let top = Rect::new(col.x, col.y, col.w, lintel);
        match wall {
            Some(tex) => {
                let src = column_src(tex, u, 0.0, LINTEL_SOURCE, cfg.texel_inset);
                surface.blit(tex, src, top, Tint::shade(shade));
            }
            None => surface.fill_rect(top, WALL_FLAT[hit.side as usize], 1.0),
        }
        surface.fill_rect(
            Rect::new(col.x, col.y + lintel - 2, col.w, 3),
            BLACK,
            LINTEL_SHADOW_ALPHA,
        );
    }
}

/// One texel column at `u`, rows `v0..v1` (fractions), kept `inset`
/// texels away from every edge.
fn column_src(tex: &Texture, u: f32, v0: f32, v1: f32, inset: f32) -> SrcRect {
    let tw = tex.w as f32;
    let th = tex.h as f32;
    let x = (u * tw).clamp(inset, (tw - inset).max(inset)) - 0.5;
    let y0 = (v0 * th).max(inset);
    let y1 = (v1 * th).min(th - inset).max(y0);
    SrcRect::new(x, y0, 1.0, y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Software, lerp, scale};
    use std::sync::Arc;

    const W: Rgba = rgb(200, 100, 50);
    const F: Rgba = rgb(200, 200, 200);
    const D: Rgba = rgb(20, 40, 60);

    fn grid() -> TileGrid {
        TileGrid::from_ascii(
            "#####\n\
             #...#\n\
             #..D#\n\
             #####",
        )
        .unwrap()
    }

    fn pool(wall: bool, floor: bool, door: bool) -> TexturePool {
        let mut p = TexturePool::empty(1);
        if wall {
            p.wall.primary = Some(Arc::new(Texture::solid("wall", 16, 16, W)));
        }
        if floor {
            p.floor.primary = Some(Arc::new(Texture::solid("floor", 16, 16, F)));
        }
        if door {
            p.door.primary = Some(Arc::new(Texture::solid("door", 16, 16, D)));
        }
        p
    }

    /// East-facing hit on the wall at (4, 1), seen from (3, 1).
    fn wall_hit(distance: f32) -> RayHit {
        RayHit {
            column: 0,
            distance,
            side: Side::X,
            tile_x: 4,
            tile_y: 1,
            is_door: false,
            wall_u: 0.5,
            outside: false,
            step: 1,
        }
    }

    fn door_hit(u: f32) -> RayHit {
        RayHit {
            tile_x: 3,
            tile_y: 2,
            is_door: true,
            wall_u: u,
            step: 1,
            ..wall_hit(1.0)
        }
    }

    fn paint(h: usize, pool: &TexturePool, hit: &RayHit) -> Software {
        let cfg = RenderConfig::default();
        let screen = Screen::new(1, h, 0.0);
        let grid = grid();
        let ctx = ColumnCtx {
            screen: &screen,
            grid: &grid,
            pool,
            stride: 1,
            cfg: &cfg,
        };
        let mut sw = Software::new(1, h);
        draw_column(&mut sw, &ctx, hit);
        sw
    }

    #[test]
    fn strip_is_centred_on_the_horizon() {
        let s = Strip::new(&Screen::new(1, 100, 0.0), 2.0);
        assert_eq!(s, Strip { top: 25, height: 50 });
        let s = Strip::new(&Screen::new(1, 100, 0.1), 2.0);
        assert_eq!(s.top, 35);
        assert_eq!(s.bottom(), 85);
    }

    #[test]
    fn fog_is_linear_between_limits() {
        let cfg = RenderConfig::default();
        assert_eq!(fog_factor(1.0, &cfg), 0.0);
        assert_eq!(fog_factor(cfg.fog_start, &cfg), 0.0);
        assert!((fog_factor(7.0, &cfg) - 0.5).abs() < 1e-6);
        assert_eq!(fog_factor(50.0, &cfg), 1.0);
    }

    #[test]
    fn plain_wall_shading() {
        let sw = paint(100, &pool(true, true, false), &wall_hit(1.0));
        assert_eq!(sw.pixel(0, 50), W);

        let hit = RayHit {
            side: Side::Y,
            tile_x: 2,
            tile_y: 0,
            step: -1,
            ..wall_hit(1.0)
        };
        let sw = paint(100, &pool(true, true, false), &hit);
        assert_eq!(sw.pixel(0, 50), scale(W, 0.7));
    }

    #[test]
    fn far_walls_fade_to_black() {
        let sw = paint(140, &pool(true, false, false), &wall_hit(7.0));
        assert_eq!(sw.pixel(0, 70), lerp(W, BLACK, 0.5));

        let sw = paint(240, &pool(true, false, false), &wall_hit(12.0));
        assert_eq!(sw.pixel(0, 120), BLACK);
    }

    #[test]
    fn missing_wall_texture_uses_flat_colour() {
        let sw = paint(100, &TexturePool::empty(1), &wall_hit(1.0));
        assert_eq!(sw.pixel(0, 50), WALL_FLAT[0]);
    }

    #[test]
    fn baseboard_comes_from_the_floor() {
        // strip covers rows 0..100, baseboard is the bottom 6
        let sw = paint(100, &pool(true, true, false), &wall_hit(1.0));
        assert_eq!(sw.pixel(0, 96), lerp(F, BLACK, BASEBOARD_DARKEN));
        assert_eq!(sw.pixel(0, 93), W);
    }

    #[test]
    fn outside_hits_get_no_baseboard() {
        let hit = RayHit {
            outside: true,
            ..wall_hit(1.0)
        };
        let sw = paint(100, &pool(true, true, false), &hit);
        assert_eq!(sw.pixel(0, 96), W);
    }

    #[test]
    fn baseboard_needs_a_walkable_neighbour() {
        // (4, 0) entered from (3, 0), which is itself wall
        let hit = RayHit {
            tile_y: 0,
            ..wall_hit(1.0)
        };
        assert_eq!(hit.facing_cell(), (3, 0));
        let sw = paint(100, &pool(true, true, false), &hit);
        assert_eq!(sw.pixel(0, 96), W);
        assert_eq!(sw.pixel(0, 50), W);
    }

    #[test]
    fn door_panel_and_frame() {
        let p = pool(true, true, true);
        let sw = paint(100, &p, &door_hit(0.5));
        assert_eq!(sw.pixel(0, 50), D);
        // lintel from the wall texture, no baseboard
        assert_eq!(sw.pixel(0, 2), W);
        assert_eq!(sw.pixel(0, 96), D);

        let sw = paint(100, &p, &door_hit(0.05));
        assert_eq!(sw.pixel(0, 50), W);

        let sw = paint(100, &p, &door_hit(0.10));
        assert_eq!(sw.pixel(0, 50), lerp(W, BLACK, SEAM_ALPHA));
    }

    #[test]
    fn missing_door_texture_uses_flat_colour() {
        let sw = paint(100, &pool(true, true, false), &door_hit(0.5));
        assert_eq!(sw.pixel(0, 50), DOOR_FLAT[0]);
        let hit = RayHit {
            side: Side::Y,
            ..door_hit(0.5)
        };
        let sw = paint(100, &TexturePool::empty(1), &hit);
        assert_eq!(sw.pixel(0, 50), DOOR_FLAT[1]);
    }

    #[test]
    fn face_hit_points_back_at_the_viewer() {
        assert_eq!(face_hit(&wall_hit(1.0)), OpenFaces::WEST);
        let hit = RayHit {
            side: Side::Y,
            step: -1,
            ..wall_hit(1.0)
        };
        assert_eq!(face_hit(&hit), OpenFaces::SOUTH);
    }

    #[test]
    fn column_src_stays_inside() {
        let tex = Texture::solid("t", 8, 8, W);
        let s = column_src(&tex, 0.0, 0.0, 1.0, 0.5);
        assert_eq!(s, SrcRect::new(0.0, 0.5, 1.0, 7.0));
        let s = column_src(&tex, 0.9999, 0.0, 0.2, 0.5);
        assert_eq!(s.x, 7.0);
        assert!((s.h - 1.1).abs() < 1e-5);
    }
}
