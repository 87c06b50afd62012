pub mod camera;
pub mod grid;
pub mod texture;

pub use camera::{Camera, Facing, Pose, Projection, TILE_CENTRE};

pub use grid::{GridError, OpenFaces, Tile, TileGrid};

pub use texture::{SurfaceKind, Texture, TextureError, TexturePool, VariantSet, variant_index};
