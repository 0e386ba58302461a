/// Save and load game progress.
///
/// ## Two records, written independently:
///
///   **Game state** (`savegame.txt`):
///     16 cell values, row-major, four per line, then the score on its own
///     line. Readers accept any whitespace between the 17 integers.
///
///   **Best score** (`bestscore.txt`):
///     A single integer. Rewritten only when the current score beats it.
///
/// The two writes are not atomic. A crash between them can leave the best
/// score behind the last saved game.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::SaveConfig;
use crate::domain::grid::{Cells, Grid, SIZE};

pub const DEFAULT_STATE_FILE: &str = "savegame.txt";
pub const DEFAULT_BEST_FILE: &str = "bestscore.txt";

/// Number of integers in a complete game-state record.
const RECORD_LEN: usize = SIZE * SIZE + 1;

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Where the two records live.
#[derive(Clone, Debug)]
pub struct SaveFiles {
    pub dir: PathBuf,
    pub state: PathBuf,
    pub best: PathBuf,
}

impl SaveFiles {
    /// Default file names inside `dir`.
    #[allow(dead_code)]
    pub fn in_dir(dir: &Path) -> Self {
        SaveFiles::with_names(dir, DEFAULT_STATE_FILE, DEFAULT_BEST_FILE)
    }

    pub fn with_names(dir: &Path, state: &str, best: &str) -> Self {
        SaveFiles {
            dir: dir.to_path_buf(),
            state: dir.join(state),
            best: dir.join(best),
        }
    }

    /// Resolve from config: explicit `save_dir`, else the automatic search.
    pub fn resolve(cfg: &SaveConfig) -> Self {
        let dir = match &cfg.save_dir {
            Some(d) => {
                if let Err(e) = fs::create_dir_all(d) {
                    eprintln!("Warning: could not create save dir {}: {e}", d.display());
                }
                d.clone()
            }
            None => save_dir(),
        };
        SaveFiles::with_names(&dir, &cfg.state_file, &cfg.best_file)
    }
}

fn save_dir() -> PathBuf {
    // 1. Exe directory, if writable (portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_twenty48");
            if fs::write(&test_path, "").is_ok() {
                let _ = fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/twenty48");
        if fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// Record operations
// ══════════════════════════════════════════════════════════════

/// Write the game-state record, then the best-score record if `grid.score()`
/// beats `*best`. Returns `true` when a new best was recorded.
///
/// `*best` is only raised once its record is on disk, so a failed write is
/// retried by the next save.
pub fn save_game(files: &SaveFiles, grid: &Grid, best: &mut u32) -> Result<bool, String> {
    fs::write(&files.state, serialize_state(grid))
        .map_err(|e| format!("Save failed ({}): {}", files.state.display(), e))?;

    if grid.score() <= *best {
        return Ok(false);
    }

    fs::write(&files.best, grid.score().to_string())
        .map_err(|e| format!("Best score save failed ({}): {}", files.best.display(), e))?;
    *best = grid.score();
    debug!("best score record updated to {}", best);
    Ok(true)
}

/// Read the game-state record. `None` if missing, short, or corrupt.
pub fn load_game(files: &SaveFiles) -> Option<Grid> {
    let content = fs::read_to_string(&files.state).ok()?;
    let grid = parse_state(&content);
    if grid.is_none() {
        warn!("ignoring unreadable save record {}", files.state.display());
    }
    grid
}

/// Read the best-score record. Missing or unreadable yields 0.
pub fn load_best(files: &SaveFiles) -> u32 {
    fs::read_to_string(&files.best)
        .ok()
        .and_then(|s| s.split_whitespace().next().and_then(|t| t.parse().ok()))
        .unwrap_or(0)
}

pub fn has_save(files: &SaveFiles) -> bool {
    files.state.exists()
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

pub fn serialize_state(grid: &Grid) -> String {
    let mut out = String::with_capacity(96);
    for row in grid.rows() {
        let cols: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cols.join(" "));
        out.push('\n');
    }
    out.push_str(&format!("{}\n", grid.score()));
    out
}

/// Parse the first 17 integers. Anything after them is ignored.
pub fn parse_state(content: &str) -> Option<Grid> {
    let values: Vec<u32> = content
        .split_whitespace()
        .take(RECORD_LEN)
        .map(|t| t.parse().ok())
        .collect::<Option<Vec<u32>>>()?;
    if values.len() < RECORD_LEN {
        return None;
    }

    let mut cells: Cells = [[0; SIZE]; SIZE];
    for (i, &v) in values[..SIZE * SIZE].iter().enumerate() {
        cells[i / SIZE][i % SIZE] = v;
    }

    let grid = Grid::from_rows(cells, values[SIZE * SIZE]);
    grid.is_valid().then_some(grid)
}
