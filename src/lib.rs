//! First-person view of a tile dungeon, ray cast on the CPU.
//!
//! * [`world`] – tile grid, pose/camera and texture pools.
//! * [`engine`] – safety clamp, DDA caster, dirty cache, stride choice.
//! * [`renderer`] – output surface, floor/ceiling and wall compositing,
//!   and [`renderer::DungeonView`], which ties a frame together.
//! * [`assets`] – background texture loading and procedural textures.
//! * [`config`] – tunables.

pub mod assets;
pub mod config;
pub mod engine;
pub mod renderer;
pub mod world;
