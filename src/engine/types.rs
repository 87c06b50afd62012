/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub horizon: f32,
}

impl Screen {
    /// `horizon_bias` is a fraction of the height; positive moves it down.
    pub fn new(w: usize, h: usize, horizon_bias: f32) -> Self {
        Self {
            w,
            h,
            horizon: (h as f32 * (0.5 + horizon_bias)).floor(),
        }
    }
}

/// Which grid axis the DDA stepped last before the hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Side {
    /// Crossed a vertical grid line (face normal along X).
    X = 0,
    /// Crossed a horizontal grid line (face normal along Y).
    Y = 1,
}

/// Result of casting one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub column: usize,
    /// Perpendicular (fisheye-free) distance, already clamped.
    pub distance: f32,
    pub side: Side,
    pub tile_x: i32,
    pub tile_y: i32,
    pub is_door: bool,
    /// Wall-local U in [0, 1).
    pub wall_u: f32,
    /// The ray left the map instead of hitting a cell.
    pub outside: bool,
    /// Which way the ray stepped on the hit axis (+1 / -1).
    pub step: i32,
}

impl RayHit {
    /// Grid cell on the viewer's side of the face that was hit.
    #[inline]
    pub fn facing_cell(&self) -> (i32, i32) {
        match self.side {
            Side::X => (self.tile_x - self.step, self.tile_y),
            Side::Y => (self.tile_x, self.tile_y - self.step),
        }
    }
}
