/// Merge engine: the four directional moves.
///
/// One primitive, `slide_line_left`, does all the work. The other directions
/// rotate the grid so the target edge lines up with "left", slide, and rotate
/// back:
///
///   Left  = slide
///   Right = cw, cw, slide, cw, cw
///   Up    = ccw, slide, cw
///   Down  = cw, slide, ccw
///
/// A tile produced by a merge never merges again in the same move, and
/// tiles at `MAX_TILE` never merge.

use super::grid::{Cells, Direction, Grid, MAX_TILE, SIZE};

/// Compact one line toward index 0, merging equal neighbours once.
/// Returns the points earned (sum of merged tile values).
pub fn slide_line_left(line: &mut [u32; SIZE]) -> u32 {
    let mut out = [0u32; SIZE];
    let mut cursor = 0;
    let mut gained: u32 = 0;

    for &v in line.iter() {
        if v == 0 {
            continue;
        }
        if out[cursor] == 0 {
            out[cursor] = v;
        } else if out[cursor] == v && v < MAX_TILE {
            out[cursor] = v * 2;
            gained = gained.saturating_add(out[cursor]);
            cursor += 1;
        } else {
            cursor += 1;
            out[cursor] = v;
        }
    }

    *line = out;
    gained
}

/// Rotate 90° clockwise: `out[i][j] = g[N-1-j][i]`.
pub fn rotate_cw(g: &Cells) -> Cells {
    let mut out = [[0u32; SIZE]; SIZE];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = g[SIZE - 1 - j][i];
        }
    }
    out
}

/// Rotate 90° counter-clockwise: `out[i][j] = g[j][N-1-i]`.
pub fn rotate_ccw(g: &Cells) -> Cells {
    let mut out = [[0u32; SIZE]; SIZE];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = g[j][SIZE - 1 - i];
        }
    }
    out
}

/// Slide every row left. Returns points earned.
fn slide_all_left(cells: &mut Cells) -> u32 {
    cells.iter_mut().map(slide_line_left).fold(0, u32::saturating_add)
}

/// Apply one move. Returns whether any cell changed; score is updated in place.
/// A move that changes nothing leaves grid and score untouched.
pub fn apply_move(grid: &mut Grid, dir: Direction) -> bool {
    let before = *grid.rows();
    let mut cells = before;

    let gained = match dir {
        Direction::Left => slide_all_left(&mut cells),
        Direction::Right => {
            cells = rotate_cw(&rotate_cw(&cells));
            let g = slide_all_left(&mut cells);
            cells = rotate_cw(&rotate_cw(&cells));
            g
        }
        Direction::Up => {
            cells = rotate_ccw(&cells);
            let g = slide_all_left(&mut cells);
            cells = rotate_cw(&cells);
            g
        }
        Direction::Down => {
            cells = rotate_cw(&cells);
            let g = slide_all_left(&mut cells);
            cells = rotate_ccw(&cells);
            g
        }
    };

    if cells == before {
        return false;
    }

    *grid.rows_mut() = cells;
    grid.add_score(gained);
    true
}
