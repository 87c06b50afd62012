//! Map-space half of the view: where the camera is, what each column
//! sees, and whether a frame needs drawing at all.

pub mod cache;
pub mod clamp;
pub mod quality;
pub mod raycast;
pub mod types;

pub use cache::{DirtyCache, RenderKey};
pub use clamp::{SafeCamera, safe_camera};
pub use quality::{MotionState, Quality};
pub use raycast::{cast_columns, cast_ray};
pub use types::{RayHit, Screen, Side};
