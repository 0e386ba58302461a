/// The 4×4 grid and its score.
///
/// Cells hold `0` (empty) or a power of two ≥ 2. The grid itself does not
/// enforce that on `set`; callers are the merge engine, the spawner and the
/// save loader, and `is_valid()` is there to check the invariant after the fact.

pub const SIZE: usize = 4;

pub type Cells = [[u32; SIZE]; SIZE];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[allow(dead_code)]
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Grid {
    cells: Cells,
    score: u32,
}

impl Grid {
    /// Empty grid, zero score.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Build a grid from explicit rows. Used by the save loader and tests.
    pub fn from_rows(cells: Cells, score: u32) -> Self {
        Grid { cells, score }
    }

    #[allow(dead_code)]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row][col] = value;
    }

    pub fn rows(&self) -> &Cells {
        &self.cells
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Cells {
        &mut self.cells
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Zero every cell and the score.
    pub fn clear(&mut self) {
        *self = Grid::default();
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Number of non-empty cells.
    #[allow(dead_code)]
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Every non-zero cell is a power of two ≥ 2.
    pub fn is_valid(&self) -> bool {
        self.cells.iter().flatten().all(|&v| is_tile_value(v))
    }
}

/// Largest tile a 4×4 board can reach (2^17).
pub const MAX_TILE: u32 = 1 << 17;

/// `0`, or a power of two in `2..=MAX_TILE`.
pub fn is_tile_value(v: u32) -> bool {
    v == 0 || (v >= 2 && v <= MAX_TILE && v.is_power_of_two())
}
