//! Windowed software viewer.
//!
//! ```bash
//! cargo run --release -- --assets ./textures --level 1
//! ```
//!
//! W/↑ and S/↓ step, A/← and D/→ turn, Space climbs a ladder, Esc quits.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crawlcast::{
    assets::{LevelManifest, PoolSlot, TextureLoader},
    config::RenderConfig,
    renderer::{DrawOutcome, DungeonView, FrameInput, Software},
    world::{Facing, Pose, Tile, TileGrid},
};

/// Two small floors joined by ladders; levels alternate between them.
const DEMO_MAPS: [&str; 2] = [
    "\
###########
#<..#.....#
#.#.D.###.#
#.#.#.#...#
#...#.#.#.#
###.#...#.#
#...###D#.#
#.#.......#
#.#####.#>#
###########",
    "\
#########
#<......#
#.##.##.#
#.#...#.#
#.D.>.D.#
#.#...#.#
#.##D##.#
#.......#
#########",
];

const STEP_TIME: f32 = 0.18;
const PROCEDURAL_SIZE: usize = 64;
const PROCEDURAL_EXTRAS: u32 = 2;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Texture root holding `level_<n>/` directories
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Dungeon level to start on
    #[arg(long, default_value_t = 1)]
    level: u32,

    #[arg(long, default_value_t = 480)]
    width: usize,

    #[arg(long, default_value_t = 300)]
    height: usize,

    /// Window scale factor (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// JSON file overriding render tunables
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// ASCII map used for every level instead of the built-in ones
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Seed for procedural textures
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Tile-to-tile interpolation standing in for the game's animator.
struct Walker {
    pose: Pose,
    from: Vec2,
    elapsed: f32,
}

impl Walker {
    fn new(pose: Pose) -> Self {
        Self {
            pose,
            from: pose.pos(),
            elapsed: STEP_TIME,
        }
    }

    fn busy(&self) -> bool {
        self.elapsed < STEP_TIME
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(STEP_TIME);
    }

    /// Interpolated position while a step is in flight.
    fn visual(&self) -> Option<Vec2> {
        self.busy()
            .then(|| self.from.lerp(self.pose.pos(), self.elapsed / STEP_TIME))
    }

    fn try_step(&mut self, grid: &TileGrid, forward: bool) {
        let (dx, dy) = self.pose.facing.step();
        let (dx, dy) = if forward { (dx, dy) } else { (-dx, -dy) };
        let (tx, ty) = self.pose.tile();
        if grid.is_walkable(tx + dx, ty + dy) {
            self.from = self.pose.pos();
            self.pose = Pose::at_tile(tx + dx, ty + dy, self.pose.facing);
            self.elapsed = 0.0;
        }
    }
}

fn load_map(custom: Option<&Path>, level: u32) -> anyhow::Result<TileGrid> {
    let grid = match custom {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading map {}", path.display()))?;
            TileGrid::from_ascii(&text)?
        }
        None => TileGrid::from_ascii(DEMO_MAPS[(level as usize - 1) % DEMO_MAPS.len()])?,
    };
    Ok(grid)
}

/// Arrival tile: the ladder leading back where we came from, else any floor.
fn arrival(grid: &TileGrid, climbed_down: bool) -> anyhow::Result<Pose> {
    let back = if climbed_down {
        Tile::LadderUp
    } else {
        Tile::LadderDown
    };
    let (x, y) = grid
        .find(back)
        .or_else(|| grid.find(Tile::Floor))
        .context("map has nowhere to stand")?;
    Ok(Pose::at_tile(x, y, Facing::East))
}

fn start_loader(assets: Option<&Path>, level: u32, seed: u64) -> anyhow::Result<TextureLoader> {
    if let Some(root) = assets {
        let manifest = LevelManifest::scan(root, level)?;
        if !manifest.is_empty() {
            info!(level, images = manifest.entries.len(), "loading textures from disk");
            return Ok(TextureLoader::spawn(manifest)?);
        }
        info!(level, root = %root.display(), "no textures on disk, generating");
    }
    Ok(TextureLoader::procedural(
        level,
        seed,
        PROCEDURAL_SIZE,
        PROCEDURAL_EXTRAS,
    )?)
}

fn window_scale(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        4 => Scale::X4,
        8 => Scale::X8,
        _ => Scale::X2,
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let filter = if opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let cfg = match &opts.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    let mut level = opts.level.max(1);
    let mut grid = load_map(opts.map.as_deref(), level)?;
    let mut walker = Walker::new(arrival(&grid, true)?);
    let mut loader = start_loader(opts.assets.as_deref(), level, opts.seed)?;
    let mut slot = PoolSlot::new(level);

    let mut view = DungeonView::new(cfg)?;
    let mut sw = Software::new(opts.width, opts.height);

    let mut win = Window::new(
        "crawlcast",
        opts.width,
        opts.height,
        WindowOptions {
            scale: window_scale(opts.scale),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_tick = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();
        walker.advance(dt);

        /* input ------------------------------------------------------------ */
        if !walker.busy() {
            let pressed = |keys: [Key; 2]| keys.iter().any(|&k| win.is_key_pressed(k, KeyRepeat::Yes));
            if pressed([Key::W, Key::Up]) {
                walker.try_step(&grid, true);
            } else if pressed([Key::S, Key::Down]) {
                walker.try_step(&grid, false);
            } else if pressed([Key::A, Key::Left]) {
                walker.pose.facing = walker.pose.facing.turn_left();
            } else if pressed([Key::D, Key::Right]) {
                walker.pose.facing = walker.pose.facing.turn_right();
            } else if win.is_key_pressed(Key::Space, KeyRepeat::No) {
                let (tx, ty) = walker.pose.tile();
                let next = match grid.get(tx, ty) {
                    Some(Tile::LadderDown) => Some(level + 1),
                    Some(Tile::LadderUp) if level > 1 => Some(level - 1),
                    _ => None,
                };
                if let Some(next) = next {
                    info!(from = level, to = next, "changing level");
                    let down = next > level;
                    level = next;
                    grid = load_map(opts.map.as_deref(), level)?;
                    walker = Walker::new(arrival(&grid, down)?);
                    loader = start_loader(opts.assets.as_deref(), level, opts.seed)?;
                    slot.reset(level);
                    view.invalidate();
                }
            }
        }

        /* textures --------------------------------------------------------- */
        if slot.poll(&loader) {
            debug!(
                level = loader.level(),
                generation = slot.pool().generation,
                "new texture pool"
            );
            view.invalidate();
        }

        /* draw ------------------------------------------------------------- */
        let t0 = Instant::now();
        let input = FrameInput {
            logical: walker.pose,
            visual: walker.visual(),
            level,
        };
        match view.draw(&mut sw, &grid, &input, slot.pool()) {
            DrawOutcome::Rendered { .. } => {
                acc_time += t0.elapsed();
                acc_frames += 1;
                sw.end_frame(|fb, w, h| win.update_with_buffer(fb, w, h))?;
            }
            DrawOutcome::Skipped => win.update(),
        }

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!(avg_ms = format_args!("{avg_ms:.2}"), frames = acc_frames, "render time");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
