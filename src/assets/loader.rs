//! Background texture loading.
//!
//! ```text
//!   <root>/door.png                shared door, used when a level has none
//!   <root>/level_<n>/wall.png      primary
//!   <root>/level_<n>/wall_<k>.png  extra variants, ordered by k
//!                    floor*.png  ceiling*.png  door*.png
//! ```
//!
//! A worker thread decodes one image at a time. After every image it
//! publishes a *complete* new [`TexturePool`] behind a fresh `Arc`, so the
//! renderer only ever sees whole snapshots. [`PoolSlot`] is the receiving
//! end on the render thread.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    assets::{clamp_level, procedural},
    world::{SurfaceKind, Texture, TextureError, TexturePool},
};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode `{path}`")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("cannot start texture worker")]
    Worker(#[source] io::Error),
}

static FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(wall|floor|ceiling|door)(?:_(\d+))?\.png$").unwrap());

fn kind_from_stem(stem: &str) -> Option<SurfaceKind> {
    SurfaceKind::ALL.into_iter().find(|k| k.stem() == stem)
}

fn kind_rank(kind: SurfaceKind) -> usize {
    SurfaceKind::ALL.iter().position(|&k| k == kind).unwrap_or(0)
}

/// One image the loader will try to decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetEntry {
    pub kind: SurfaceKind,
    /// `None` for the primary, `Some(k)` for `<kind>_<k>.png`.
    pub variant: Option<u32>,
    pub path: PathBuf,
}

/// Everything found on disk for one level, primaries first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelManifest {
    pub level: u32,
    pub entries: Vec<AssetEntry>,
}

impl LevelManifest {
    /// List the images for `level` under `root`.
    ///
    /// A missing directory is not an error; it just yields no entries.
    pub fn scan<P: AsRef<Path>>(root: P, level: u32) -> Result<Self, AssetError> {
        let root = root.as_ref();
        let level = clamp_level(level);
        let dir = root.join(format!("level_{level}"));
        let mut entries = Vec::new();

        if dir.is_dir() {
            let io_err = |source| AssetError::Io {
                path: dir.clone(),
                source,
            };
            for item in fs::read_dir(&dir).map_err(io_err)? {
                let item = item.map_err(io_err)?;
                let name = item.file_name();
                let Some(name) = name.to_str() else { continue };
                let Some(caps) = FILE_RE.captures(name) else {
                    continue;
                };
                let Some(kind) = kind_from_stem(&caps[1]) else {
                    continue;
                };
                let variant = match caps.get(2) {
                    Some(k) => match k.as_str().parse() {
                        Ok(k) => Some(k),
                        Err(_) => {
                            warn!(file = name, "variant number out of range, ignored");
                            continue;
                        }
                    },
                    None => None,
                };
                entries.push(AssetEntry {
                    kind,
                    variant,
                    path: item.path(),
                });
            }
        }

        if !entries.iter().any(|e| e.kind == SurfaceKind::Door) {
            let shared = root.join("door.png");
            if shared.is_file() {
                entries.push(AssetEntry {
                    kind: SurfaceKind::Door,
                    variant: None,
                    path: shared,
                });
            }
        }

        entries.sort_by_key(|e| (kind_rank(e.kind), e.variant.is_some(), e.variant));
        debug!(level, dir = %dir.display(), found = entries.len(), "scanned textures");
        Ok(Self { level, entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a PNG into a 0xAARRGGBB texture named after the file stem.
pub fn load_texture(path: &Path) -> Result<Texture, AssetError> {
    let img = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Texture::new(name, w as usize, h as usize, pixels)?)
}

/// Unit of work for the worker thread.
enum Job {
    File(AssetEntry),
    Generated {
        kind: SurfaceKind,
        variant: u32,
        size: usize,
        seed: u64,
    },
}

impl Job {
    fn kind(&self) -> SurfaceKind {
        match self {
            Job::File(e) => e.kind,
            Job::Generated { kind, .. } => *kind,
        }
    }

    fn is_primary(&self) -> bool {
        match self {
            Job::File(e) => e.variant.is_none(),
            Job::Generated { variant, .. } => *variant == 0,
        }
    }

    fn produce(&self, level: u32) -> Result<Texture, AssetError> {
        match self {
            Job::File(e) => load_texture(&e.path),
            Job::Generated {
                kind,
                variant,
                size,
                seed,
            } => Ok(procedural::generate(*kind, level, *variant, *size, *seed)),
        }
    }
}

/// Handle to a running (or finished) worker.
pub struct TextureLoader {
    level: u32,
    rx: Receiver<Arc<TexturePool>>,
    handle: Option<JoinHandle<()>>,
}

impl TextureLoader {
    /// Decode every entry of `manifest` in the background.
    pub fn spawn(manifest: LevelManifest) -> Result<Self, AssetError> {
        let jobs = manifest.entries.into_iter().map(Job::File).collect();
        Self::start(manifest.level, jobs)
    }

    /// Generate a level's textures in the background instead of reading
    /// them from disk. `extras` variants are made per kind.
    pub fn procedural(level: u32, seed: u64, size: usize, extras: u32) -> Result<Self, AssetError> {
        let mut jobs = Vec::new();
        for kind in SurfaceKind::ALL {
            for variant in 0..=extras {
                jobs.push(Job::Generated {
                    kind,
                    variant,
                    size,
                    seed,
                });
            }
        }
        Self::start(clamp_level(level), jobs)
    }

    fn start(level: u32, jobs: Vec<Job>) -> Result<Self, AssetError> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(format!("textures-{level}"))
            .spawn(move || run(level, jobs, tx))
            .map_err(AssetError::Worker)?;
        Ok(Self {
            level,
            rx,
            handle: Some(handle),
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Newest publication since the last call, skipping older ones.
    pub fn latest(&self) -> Option<Arc<TexturePool>> {
        let mut newest = None;
        loop {
            match self.rx.try_recv() {
                Ok(pool) => newest = Some(pool),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return newest,
            }
        }
    }

    /// The worker has exited (all images tried).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the worker is done; returns the final pool, if any.
    pub fn wait(mut self) -> Option<Arc<TexturePool>> {
        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                warn!(level = self.level, "texture worker panicked");
            }
        }
        self.latest()
    }
}

fn run(level: u32, jobs: Vec<Job>, tx: Sender<Arc<TexturePool>>) {
    let started = Instant::now();
    let mut pool = TexturePool::empty(level);
    let mut failed = 0usize;

    for job in &jobs {
        let tex = match job.produce(level) {
            Ok(t) => Arc::new(t),
            Err(err) => {
                failed += 1;
                warn!(level, error = %err, cause = ?std::error::Error::source(&err), "texture skipped");
                continue;
            }
        };

        let set = pool.set_mut(job.kind());
        if job.is_primary() {
            set.primary = Some(tex);
        } else {
            set.extras.push(tex);
        }
        pool.generation += 1;

        if tx.send(Arc::new(pool.clone())).is_err() {
            debug!(level, "pool receiver dropped, loader stopping");
            return;
        }
    }

    info!(
        level,
        loaded = pool.len(),
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "texture pool complete"
    );
}

/// The render thread's current pool.
pub struct PoolSlot {
    current: Arc<TexturePool>,
}

impl PoolSlot {
    pub fn new(level: u32) -> Self {
        Self {
            current: Arc::new(TexturePool::empty(clamp_level(level))),
        }
    }

    pub fn pool(&self) -> &TexturePool {
        &self.current
    }

    pub fn level(&self) -> u32 {
        self.current.level
    }

    /// Drop everything and wait for `level`'s textures.
    pub fn reset(&mut self, level: u32) {
        self.current = Arc::new(TexturePool::empty(clamp_level(level)));
    }

    /// Swap in `pool` if it belongs to this level and is newer.
    ///
    /// Returns `true` when the view has to be invalidated.
    pub fn accept(&mut self, pool: Arc<TexturePool>) -> bool {
        if pool.level != self.current.level {
            debug!(got = pool.level, want = self.current.level, "pool for another level ignored");
            return false;
        }
        if pool.generation <= self.current.generation {
            return false;
        }
        self.current = pool;
        true
    }

    /// Pull whatever `loader` has published.
    pub fn poll(&mut self, loader: &TextureLoader) -> bool {
        loader.latest().is_some_and(|pool| self.accept(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_png(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
        img.save(path).unwrap();
    }

    fn layout() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let lvl = root.path().join("level_2");
        fs::create_dir(&lvl).unwrap();
        write_png(&lvl.join("wall.png"), 4, 4, [255, 0, 0, 255]);
        write_png(&lvl.join("wall_2.png"), 4, 4, [0, 255, 0, 255]);
        write_png(&lvl.join("wall_1.png"), 4, 4, [0, 0, 255, 255]);
        write_png(&lvl.join("floor.png"), 2, 2, [10, 20, 30, 255]);
        File::create(lvl.join("notes.txt")).unwrap();
        write_png(&root.path().join("door.png"), 2, 2, [1, 2, 3, 255]);
        root
    }

    #[test]
    fn scan_orders_entries_and_uses_shared_door() {
        let root = layout();
        let m = LevelManifest::scan(root.path(), 2).unwrap();
        let names: Vec<String> = m
            .entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["wall.png", "wall_1.png", "wall_2.png", "floor.png", "door.png"]
        );
        assert_eq!(m.entries[1].variant, Some(1));
        assert_eq!(m.entries[4].path, root.path().join("door.png"));
    }

    #[test]
    fn scan_of_missing_level_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let m = LevelManifest::scan(root.path(), 7).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.level, 7);
        assert_eq!(LevelManifest::scan(root.path(), 0).unwrap().level, 1);
    }

    #[test]
    fn decoded_pixels_are_argb() {
        let root = tempfile::tempdir().unwrap();
        let p = root.path().join("wall.png");
        write_png(&p, 3, 2, [0x12, 0x34, 0x56, 0xFF]);
        let t = load_texture(&p).unwrap();
        assert_eq!((t.w, t.h), (3, 2));
        assert_eq!(t.name, "wall");
        assert!(t.pixels.iter().all(|&px| px == 0xFF12_3456));
    }

    #[test]
    fn loader_publishes_growing_snapshots() {
        let root = layout();
        let m = LevelManifest::scan(root.path(), 2).unwrap();
        let loader = TextureLoader::spawn(m).unwrap();

        let mut generations = Vec::new();
        let mut last = None;
        while let Ok(pool) = loader.rx.recv() {
            generations.push(pool.generation);
            last = Some(pool);
        }
        assert_eq!(generations, vec![1, 2, 3, 4, 5]);

        let pool = last.unwrap();
        assert_eq!(pool.level, 2);
        assert_eq!(pool.wall.len(), 3);
        assert_eq!(pool.wall.get(1).unwrap().name, "wall_1");
        assert_eq!(pool.floor.len(), 1);
        assert!(pool.ceiling.is_empty());
        assert_eq!(pool.door.len(), 1);
    }

    #[test]
    fn undecodable_files_are_skipped() {
        let root = layout();
        let bad = root.path().join("level_2").join("ceiling.png");
        File::create(&bad)
            .unwrap()
            .write_all(b"definitely not a png")
            .unwrap();

        let m = LevelManifest::scan(root.path(), 2).unwrap();
        assert_eq!(m.entries.len(), 6);
        let pool = TextureLoader::spawn(m).unwrap().wait().unwrap();
        assert_eq!(pool.generation, 5);
        assert!(pool.ceiling.is_empty());
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn procedural_loader_fills_every_kind() {
        let loader = TextureLoader::procedural(3, 9, 16, 1).unwrap();
        assert_eq!(loader.level(), 3);
        let pool = loader.wait().unwrap();
        assert_eq!(pool.level, 3);
        for kind in SurfaceKind::ALL {
            assert_eq!(pool.set(kind).len(), 2, "{kind:?}");
        }
    }

    #[test]
    fn slot_accepts_only_newer_pools_of_its_level() {
        let mut slot = PoolSlot::new(2);
        let mut pool = TexturePool::empty(2);
        pool.generation = 1;
        assert!(slot.accept(Arc::new(pool.clone())));
        assert!(!slot.accept(Arc::new(pool.clone())));

        let mut other = TexturePool::empty(3);
        other.generation = 9;
        assert!(!slot.accept(Arc::new(other)));
        assert_eq!(slot.pool().generation, 1);

        slot.reset(3);
        assert_eq!(slot.level(), 3);
        assert_eq!(slot.pool().generation, 0);
    }

    #[test]
    fn slot_polls_loader_to_completion() {
        let root = layout();
        let loader = TextureLoader::spawn(LevelManifest::scan(root.path(), 2).unwrap()).unwrap();
        let mut slot = PoolSlot::new(2);
        while !loader.is_finished() {
            slot.poll(&loader);
            std::thread::yield_now();
        }
        slot.poll(&loader);
        assert_eq!(slot.pool().len(), 5);
    }
}
