/// One turn of play.
///
/// Processing order:
///   1. Apply the move (merge engine)
///   2. If nothing changed, stop
///   3. Spawn one tile
///   4. Save (state record, then best score if beaten)
///   5. Terminal check
///
/// An unchanged move spawns nothing and writes nothing.

use log::{info, warn};

use crate::domain::grid::Direction;
use crate::domain::{merge, rules};
use super::event::GameEvent;
use super::save::SaveFiles;
use super::world::{GameState, Phase};

pub fn step(gs: &mut GameState, dir: Direction, files: &SaveFiles) -> Vec<GameEvent> {
    if gs.phase != Phase::Playing { return vec![]; }

    let mut events = Vec::new();
    let score_before = gs.grid.score();

    if !merge::apply_move(&mut gs.grid, dir) {
        events.push(GameEvent::NoChange);
        return events;
    }

    let gained = gs.grid.score() - score_before;
    if gained > 0 {
        events.push(GameEvent::TilesMerged { gained });
    }

    if let Some((row, col, value)) = gs.generate_number() {
        events.push(GameEvent::TileSpawned { row, col, value });
    }

    match gs.save(files) {
        Ok(true) => {
            info!("new best score {}", gs.best_score);
            events.push(GameEvent::NewBestScore { score: gs.best_score });
        }
        Ok(false) => {}
        Err(reason) => {
            warn!("{reason}");
            events.push(GameEvent::SaveFailed { reason });
        }
    }

    if rules::is_game_over(&gs.grid) {
        info!("game over at score {}", gs.grid.score());
        gs.phase = Phase::GameOver;
        events.push(GameEvent::GameOver);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{Grid, SIZE};
    use crate::sim::save;
    use tempfile::tempdir;

    fn playing(cells: [[u32; SIZE]; SIZE]) -> GameState {
        let mut gs = GameState::new(Some(17));
        gs.grid = Grid::from_rows(cells, 0);
        gs.phase = Phase::Playing;
        gs
    }

    #[test]
    fn changed_move_spawns_and_saves() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let mut cells = [[0; SIZE]; SIZE];
        cells[0] = [2, 2, 0, 0];
        let mut gs = playing(cells);

        let events = step(&mut gs, Direction::Left, &files);

        assert!(events.contains(&GameEvent::TilesMerged { gained: 4 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::TileSpawned { .. })));
        assert!(events.contains(&GameEvent::NewBestScore { score: 4 }));
        assert_eq!(gs.grid.score(), 4);
        assert_eq!(gs.grid.tile_count(), 2);
        assert_eq!(save::load_game(&files), Some(gs.grid.clone()));
        assert_eq!(save::load_best(&files), 4);
    }

    #[test]
    fn unchanged_move_spawns_nothing_and_writes_nothing() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let mut cells = [[0; SIZE]; SIZE];
        cells[0] = [2, 4, 0, 0];
        let mut gs = playing(cells);
        let before = gs.grid.clone();

        let events = step(&mut gs, Direction::Left, &files);

        assert_eq!(events, vec![GameEvent::NoChange]);
        assert_eq!(gs.grid, before);
        assert!(!save::has_save(&files));
    }

    #[test]
    fn shift_without_merge_reports_no_points() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let mut cells = [[0; SIZE]; SIZE];
        cells[0] = [0, 0, 0, 2];
        let mut gs = playing(cells);

        let events = step(&mut gs, Direction::Left, &files);

        assert!(!events.iter().any(|e| matches!(e, GameEvent::TilesMerged { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBestScore { .. })));
        assert_eq!(gs.grid.get(0, 0), 2);
    }

    #[test]
    fn filling_move_can_end_the_game() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        // One move left: sliding the last row left leaves a single hole,
        // and whatever spawns there (2 or 4) has no equal neighbour.
        let cells = [
            [8, 16, 8, 16],
            [16, 8, 16, 8],
            [8, 16, 8, 16],
            [0, 32, 64, 128],
        ];
        let mut gs = playing(cells);

        let events = step(&mut gs, Direction::Left, &files);

        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(gs.phase, Phase::GameOver);
        assert!(!gs.can_move());
    }

    #[test]
    fn no_step_outside_play() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(td.path());
        let mut gs = playing([[0, 2, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
        gs.phase = Phase::GameOver;
        assert!(step(&mut gs, Direction::Left, &files).is_empty());
        assert_eq!(gs.grid.get(0, 1), 2);
    }

    #[test]
    fn save_failure_is_reported_not_fatal() {
        let td = tempdir().unwrap();
        let files = SaveFiles::in_dir(&td.path().join("missing"));
        let mut gs = playing([[2, 2, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);

        let events = step(&mut gs, Direction::Left, &files);

        assert!(events.iter().any(|e| matches!(e, GameEvent::SaveFailed { .. })));
        assert_eq!(gs.grid.score(), 4);
    }
}
