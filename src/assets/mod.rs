//! Texture assets.
//!
//! * [`loader`] – on-disk layout, background decoding, pool publication.
//! * [`procedural`] – seeded generators for when no images exist.

pub mod loader;
pub mod procedural;

pub use loader::{AssetEntry, AssetError, LevelManifest, PoolSlot, TextureLoader, load_texture};

/// Levels that have their own texture set; deeper levels reuse the last.
pub const FIRST_LEVEL: u32 = 1;
pub const LAST_LEVEL: u32 = 10;

#[inline]
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(FIRST_LEVEL, LAST_LEVEL)
}
