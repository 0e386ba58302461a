/// GameState: everything the game loop owns.
///
/// The grid (with its score) is the per-game state; `best_score` outlives
/// games and is only raised at save time. The RNG feeds the spawner and is
/// seeded once per process, from config when a seed is given.

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::grid::Grid;
use crate::domain::rules;
use super::save::{self, SaveFiles};
use super::spawn;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

/// Menu entries, in display order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    Continue,
    NewGame,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::Continue, MenuItem::NewGame];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Continue => "Continue saved game",
            MenuItem::NewGame => "Start new game",
        }
    }
}

pub struct GameState {
    pub grid: Grid,
    pub best_score: u32,
    pub phase: Phase,
    pub menu_cursor: usize,
    pub has_save: bool,
    pub message: String,
    rng: ChaCha8Rng,
}

impl GameState {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        GameState {
            grid: Grid::new(),
            best_score: 0,
            phase: Phase::Menu,
            menu_cursor: 0,
            has_save: false,
            message: String::new(),
            rng,
        }
    }

    /// Reset grid and score, then seed two tiles. Best score is kept.
    pub fn start_new_game(&mut self) {
        self.grid.clear();
        self.generate_number();
        self.generate_number();
        self.phase = Phase::Playing;
        info!("new game started");
    }

    /// Spawn one tile. No-op on a full grid.
    pub fn generate_number(&mut self) -> Option<(usize, usize, u32)> {
        spawn::spawn_tile(&mut self.grid, &mut self.rng)
    }

    pub fn can_move(&self) -> bool {
        rules::can_move(&self.grid)
    }

    /// Restore grid and score from disk. Returns `false` when there is no
    /// usable record; the grid is left untouched in that case.
    pub fn load(&mut self, files: &SaveFiles) -> bool {
        self.best_score = self.best_score.max(save::load_best(files));
        match save::load_game(files) {
            Some(grid) => {
                self.grid = grid;
                self.phase = if self.can_move() { Phase::Playing } else { Phase::GameOver };
                info!("loaded saved game (score {})", self.grid.score());
                true
            }
            None => {
                info!("no saved game at {}", files.state.display());
                false
            }
        }
    }

    /// Persist grid/score and, if beaten, the best score.
    /// Returns `true` when a new best was recorded.
    pub fn save(&mut self, files: &SaveFiles) -> Result<bool, String> {
        let improved = save::save_game(files, &self.grid, &mut self.best_score)?;
        self.has_save = true;
        Ok(improved)
    }

    pub fn set_message(&mut self, msg: &str) {
        self.message.clear();
        self.message.push_str(msg);
    }

    pub fn menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_cursor.min(MenuItem::ALL.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::SIZE;
    use tempfile::tempdir;

    #[test]
    fn new_game_has_two_tiles_and_zero_score() {
        for seed in 0..50 {
            let mut gs = GameState::new(Some(seed));
            gs.grid.add_score(999);
            gs.start_new_game();
            assert_eq!(gs.grid.tile_count(), 2);
            assert_eq!(gs.grid.score(), 0);
            assert!(gs.grid.is_valid());
            assert_eq!(gs.phase, Phase::Playing);
        }
    }

    #[test]
    fn new_game_keeps_best_score() {
        let mut gs = GameState::new(Some(1));
        gs.best_score = 4096;
        gs.start_new_game();
        assert_eq!(gs.best_score, 4096);
    }

    #[test]
    fn same_seed_same_opening() {
        let mut a = GameState::new(Some(42));
        let mut b = GameState::new(Some(42));
        a.start_new_game();
        b.start_new_game();
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn load_without_record_fails_and_keeps_grid() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let mut gs = GameState::new(Some(3));
        gs.start_new_game();
        let before = gs.grid.clone();
        assert!(!gs.load(&files));
        assert_eq!(gs.grid, before);
    }

    #[test]
    fn save_load_round_trip_and_best() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());

        let mut gs = GameState::new(Some(9));
        gs.start_new_game();
        gs.grid.add_score(64);
        assert!(gs.save(&files).unwrap());
        assert_eq!(gs.best_score, 64);
        assert!(gs.has_save);

        let mut other = GameState::new(Some(10));
        assert!(other.load(&files));
        assert_eq!(other.grid, gs.grid);
        assert_eq!(other.best_score, 64);
        assert_eq!(other.phase, Phase::Playing);
    }

    #[test]
    fn load_best_survives_missing_state() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        std::fs::write(&files.best, "777").unwrap();
        let mut gs = GameState::new(Some(0));
        assert!(!gs.load(&files));
        assert_eq!(gs.best_score, 777);
    }

    #[test]
    fn loading_a_finished_game_lands_on_game_over() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let text = "2 4 2 4\n4 2 4 2\n2 4 2 4\n4 2 4 2\n100\n";
        std::fs::write(&files.state, text).unwrap();
        let mut gs = GameState::new(Some(0));
        assert!(gs.load(&files));
        assert_eq!(gs.phase, Phase::GameOver);
    }

    #[test]
    fn oversized_saved_tiles_are_rejected() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let text = "2147483648 2147483648 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n10\n";
        std::fs::write(&files.state, text).unwrap();
        let mut gs = GameState::new(Some(0));
        gs.start_new_game();
        let before = gs.grid.clone();
        assert!(!gs.load(&files));
        assert_eq!(gs.grid, before);
    }

    #[test]
    fn generate_number_on_full_grid_is_noop() {
        let mut gs = GameState::new(Some(0));
        gs.grid = Grid::from_rows([[2; SIZE]; SIZE], 0);
        assert_eq!(gs.generate_number(), None);
    }
}
