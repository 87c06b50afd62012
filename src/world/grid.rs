// Static per-floor tile map. The level generator hands us integer rows;
// the renderer only ever reads it.

use bitflags::bitflags;

/// One cell of the dungeon floor plan.
///
/// The discriminants are the cell codes used by the level generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tile {
    Floor = 0,
    Wall = 1,
    Door = 2,
    LadderDown = 3,
    LadderUp = 4,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Door),
            3 => Some(Tile::LadderDown),
            4 => Some(Tile::LadderUp),
            _ => None,
        }
    }

    /// ASCII picture form: `.` floor, `#` wall, `D` door, `>` down, `<` up.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            'D' => Some(Tile::Door),
            '>' => Some(Tile::LadderDown),
            '<' => Some(Tile::LadderUp),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Cells a camera may stand in. Rays pass through these.
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::LadderDown | Tile::LadderUp)
    }
}

bitflags! {
    /// Which orthogonal neighbours of a cell are walkable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct OpenFaces: u8 {
        const NORTH = 0b0001;
        const EAST  = 0b0010;
        const SOUTH = 0b0100;
        const WEST  = 0b1000;
    }
}

/// Things that can go wrong when building a grid from generator output.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("tile grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell code {code} at ({x}, {y})")]
    BadCode { code: u8, x: usize, y: usize },

    #[error("unknown map character `{ch}` at ({x}, {y})")]
    BadChar { ch: char, x: usize, y: usize },
}

/// Rectangular, row-major grid of [`Tile`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Build from rows of generator cell codes (`rows[y][x]`).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                cells.push(Tile::from_code(code).ok_or(GridError::BadCode { code, x, y })?);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Build from an ASCII picture, one line per row. Blank lines are skipped.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let y = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(x, ch)| {
                    Tile::from_char(ch)
                        .map(Tile::code)
                        .ok_or(GridError::BadChar { ch, x, y })
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounds-checked lookup; `None` outside the map.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Out-of-bounds counts as solid.
    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Tile::is_walkable)
    }

    pub fn open_faces(&self, x: i32, y: i32) -> OpenFaces {
        let mut faces = OpenFaces::empty();
        faces.set(OpenFaces::NORTH, self.is_walkable(x, y - 1));
        faces.set(OpenFaces::EAST, self.is_walkable(x + 1, y));
        faces.set(OpenFaces::SOUTH, self.is_walkable(x, y + 1));
        faces.set(OpenFaces::WEST, self.is_walkable(x - 1, y));
        faces
    }

    /// First cell holding `tile`, scanning row by row.
    pub fn find(&self, tile: Tile) -> Option<(i32, i32)> {
        self.cells
            .iter()
            .position(|&t| t == tile)
            .map(|i| ((i % self.width) as i32, (i / self.width) as i32))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
