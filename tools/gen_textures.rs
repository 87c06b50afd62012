//! gen_textures.rs - write procedural texture sets in the layout the
//! loader scans (`<out>/level_<n>/<kind>[_<k>].png` plus a shared
//! `<out>/door.png`).
//!
//! USAGE:
//! ```bash
//! cargo run --bin gen_textures -- \
//!     --out ./textures --levels 10 --size 64
//! ```

use anyhow::Context;
use clap::Parser;
use std::{fs, path::Path, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crawlcast::{
    assets::{LAST_LEVEL, procedural},
    world::{SurfaceKind, Texture},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Directory receiving the generated sets
    #[arg(long, value_name = "DIR", default_value = "./textures")]
    out: PathBuf,

    /// Number of levels to generate (at most 10)
    #[arg(long, default_value_t = 3)]
    levels: u32,

    /// Edge length of each square texture in pixels
    #[arg(long, default_value_t = 64)]
    size: usize,

    /// Extra variants per kind and level
    #[arg(long, default_value_t = 2)]
    extras: u32,

    #[arg(long, default_value_t = 1337)]
    seed: u64,
}

fn save_png(tex: &Texture, path: &Path) -> anyhow::Result<()> {
    let mut buf = image::RgbaImage::new(tex.w as u32, tex.h as u32);
    for (dst, &argb) in buf.pixels_mut().zip(&tex.pixels) {
        *dst = image::Rgba([
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        ]);
    }
    buf.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();
    let opts = Opts::parse();

    let levels = opts.levels.clamp(1, LAST_LEVEL);
    for level in 1..=levels {
        let dir = opts.out.join(format!("level_{level}"));
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let pool = procedural::generate_pool(level, opts.seed, opts.size, opts.extras);
        for kind in SurfaceKind::ALL {
            let set = pool.set(kind);
            for variant in 0..set.len() {
                let Some(tex) = set.get(variant) else { continue };
                let file = match variant {
                    0 => format!("{}.png", kind.stem()),
                    v => format!("{}_{v}.png", kind.stem()),
                };
                save_png(tex, &dir.join(file))?;
            }
        }
        info!(level, dir = %dir.display(), "wrote texture set");
    }

    let shared = procedural::generate(SurfaceKind::Door, 1, 0, opts.size, opts.seed);
    save_png(&shared, &opts.out.join("door.png"))?;

    println!("✓ {levels} level(s) written to {}", opts.out.display());
    Ok(())
}
