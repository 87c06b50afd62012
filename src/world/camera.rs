use glam::{Vec2, vec2};

/// Cardinal heading. Discriminants match the game logic's `dir` codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facing {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Facing {
    pub fn from_index(i: u8) -> Self {
        match i & 3 {
            0 => Facing::North,
            1 => Facing::East,
            2 => Facing::South,
            _ => Facing::West,
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Rotate 90° clockwise (as seen on the map, y pointing down).
    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Unit grid step in this direction (y grows southwards).
    pub fn step(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }
}

/// Direction + camera-plane pair for one facing.
///
/// The plane is perpendicular to `dir`; its length sets the field of view
/// (0.66 ≈ 66°).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub dir: Vec2,
    pub plane: Vec2,
}

impl Projection {
    /// Fixed four-entry table; no trigonometry involved.
    pub fn for_facing(facing: Facing, plane_len: f32) -> Self {
        let k = plane_len;
        match facing {
            Facing::North => Self {
                dir: vec2(0.0, -1.0),
                plane: vec2(k, 0.0),
            },
            Facing::East => Self {
                dir: vec2(1.0, 0.0),
                plane: vec2(0.0, k),
            },
            Facing::South => Self {
                dir: vec2(0.0, 1.0),
                plane: vec2(-k, 0.0),
            },
            Facing::West => Self {
                dir: vec2(-1.0, 0.0),
                plane: vec2(0.0, -k),
            },
        }
    }

    /// Ray through camera-space offset `camera_x` ∈ [-1, 1].
    #[inline(always)]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.dir + self.plane * camera_x
    }
}

/// Player pose in grid units: integer coordinates are tile centres.
///
/// Game logic only ever produces integer positions; the animator produces
/// fractional ones while a step is in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
}

impl Pose {
    pub fn new(x: f32, y: f32, facing: Facing) -> Self {
        Self { x, y, facing }
    }

    /// Pose standing on tile `(tx, ty)`.
    pub fn at_tile(tx: i32, ty: i32, facing: Facing) -> Self {
        Self::new(tx as f32, ty as f32, facing)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Tile the pose is (nearest to) standing on.
    #[inline]
    pub fn tile(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Grid units → world units. Tile `(i, j)` covers `[i, i+1) × [j, j+1)`.
pub const TILE_CENTRE: f32 = 0.5;

/// Per-frame view point in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub proj: Projection,
}

impl Camera {
    pub fn new(pos: Vec2, facing: Facing, plane_len: f32) -> Self {
        Self {
            pos,
            proj: Projection::for_facing(facing, plane_len),
        }
    }

    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        self.proj.dir
    }

    #[inline(always)]
    pub fn plane(&self) -> Vec2 {
        self.proj.plane
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
