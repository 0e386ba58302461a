/// Terminal-state detection.
///
/// A move exists while any cell is empty or any two orthogonal neighbours
/// are equal. Each adjacent pair is checked once, through its right and
/// down neighbour.

use super::grid::{Grid, SIZE};

pub fn can_move(grid: &Grid) -> bool {
    let cells = grid.rows();
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = cells[r][c];
            if v == 0 {
                return true;
            }
            if c + 1 < SIZE && cells[r][c + 1] == v {
                return true;
            }
            if r + 1 < SIZE && cells[r + 1][c] == v {
                return true;
            }
        }
    }
    false
}

pub fn is_game_over(grid: &Grid) -> bool {
    !can_move(grid)
}
