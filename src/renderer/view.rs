//! One dungeon view: owns the dirty cache and the per-frame scratch
//! buffers, and runs clamp → quality → planes → walls (plus the optional
//! atmosphere overlays) for each frame that actually needs drawing.

use glam::Vec2;
use tracing::{debug, trace, trace_span};

use crate::{
    config::{ConfigError, RenderConfig},
    engine::{DirtyCache, Quality, RayHit, RenderKey, Screen, cast_columns, safe_camera},
    renderer::{
        Surface, atmosphere, planes,
        walls::{self, ColumnCtx},
    },
    world::{Camera, Pose, TexturePool, TileGrid},
};

/// Pose data supplied by game logic and the animator for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Authoritative pose; also supplies the facing.
    pub logical: Pose,
    /// Interpolated position, preferred when it is safe to render from.
    pub visual: Option<Vec2>,
    /// Dungeon level being shown.
    pub level: u32,
}

impl FrameInput {
    pub fn settled(logical: Pose, level: u32) -> Self {
        Self {
            logical,
            visual: None,
            level,
        }
    }

    /// Position the frame is drawn from (before the safety clamp).
    pub fn drawn_pos(&self) -> Vec2 {
        self.visual.unwrap_or_else(|| self.logical.pos())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Nothing visible changed; the surface was not touched.
    Skipped,
    /// A full frame was painted from `columns` cast rays.
    Rendered { columns: usize },
}

pub struct DungeonView {
    cfg: RenderConfig,
    cache: DirtyCache,
    hits: Vec<RayHit>,
}

impl DungeonView {
    /// Rejects configurations the caster cannot run with (e.g. an inverted
    /// distance range).
    pub fn new(cfg: RenderConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cache: DirtyCache::new(cfg.cache_epsilon),
            cfg,
            hits: Vec::new(),
        })
    }

    /// Force the next [`draw`](Self::draw) to paint, e.g. after a new
    /// texture pool was published.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Hits of the most recently rendered frame.
    pub fn last_hits(&self) -> &[RayHit] {
        &self.hits
    }

    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        grid: &TileGrid,
        input: &FrameInput,
        pool: &TexturePool,
    ) -> DrawOutcome {
        let (w, h) = surface.size();
        let drawn = input.drawn_pos();
        let key = RenderKey {
            x: drawn.x,
            y: drawn.y,
            facing: input.logical.facing,
            level: input.level,
            width: w,
            height: h,
        };
        if self.cache.is_clean(&key) {
            trace!("frame unchanged, skipped");
            return DrawOutcome::Skipped;
        }

        let _span = trace_span!("draw", w, h, level = input.level).entered();
        let cfg = &self.cfg;

        if pool.level != input.level {
            debug!(pool = pool.level, view = input.level, "pool belongs to another level");
        }

        let safe = safe_camera(grid, &input.logical, input.visual, cfg);
        if safe.snapped {
            debug!(x = drawn.x, y = drawn.y, "visual pose unsafe, snapped to logical tile");
        }
        let quality = Quality::for_position(drawn, cfg);
        let cam = Camera::new(safe.pos, input.logical.facing, cfg.plane_len);
        let screen = Screen::new(w, h, cfg.horizon_bias);

        self.hits.clear();
        if w > 0 && h > 0 {
            planes::draw_planes(surface, &screen, &cam, pool, quality.stride, cfg);
            if cfg.atmosphere {
                atmosphere::draw_ceiling(surface, &screen, pool, input.level, cfg);
            }

            cast_columns(grid, &cam, w, quality.stride, cfg, &mut self.hits);
            let ctx = ColumnCtx {
                screen: &screen,
                grid,
                pool,
                stride: quality.stride,
                cfg,
            };
            for hit in &self.hits {
                walls::draw_column(surface, &ctx, hit);
            }

            if cfg.atmosphere {
                let pose = &input.logical;
                if !atmosphere::draw_decorations(surface, &screen, grid, pose, input.level) {
                    trace!("door ahead, decorations left out");
                }
            }
        }

        self.cache.commit(key);
        let columns = self.hits.len();
        debug!(columns, stride = quality.stride, motion = ?quality.motion, "frame rendered");
        DrawOutcome::Rendered { columns }
    }
}
