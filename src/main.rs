/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use log::{debug, info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::save::{self, SaveFiles};
use sim::step;
use sim::world::{GameState, MenuItem, Phase};
use ui::input::{Command, InputState};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();
    let files = SaveFiles::resolve(&config.save);

    if let Some(log_file) = &config.log_file {
        logging::init(&files.dir.join(log_file));
    }
    info!("save records: {} / {}", files.state.display(), files.best.display());

    let mut gs = GameState::new(config.seed);
    gs.best_score = save::load_best(&files);
    gs.has_save = save::has_save(&files);
    if !gs.has_save {
        gs.menu_cursor = 1;
    }

    let mut input = InputState::new(config.keys.clone());
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut gs, &mut renderer, &mut input, &files);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    if gs.phase != Phase::Menu {
        println!("Final Score: {}  Best: {}", gs.grid.score(), gs.best_score);
    }
}

fn game_loop(
    gs: &mut GameState,
    renderer: &mut Renderer,
    input: &mut InputState,
    files: &SaveFiles,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        renderer.render(gs, input.keys())?;
        let cmd = input.next_command()?;

        let quit = match gs.phase {
            Phase::Menu => handle_menu(gs, cmd, files),
            Phase::Playing => handle_play(gs, cmd, files),
            Phase::GameOver => handle_game_over(gs, cmd),
        };
        if quit {
            break;
        }
    }

    if gs.phase != Phase::Menu {
        save_on_exit(gs, files);
    }
    Ok(())
}

/// Returns `true` to quit.
fn handle_menu(gs: &mut GameState, cmd: Command, files: &SaveFiles) -> bool {
    use domain::grid::Direction;

    let count = MenuItem::ALL.len();
    match cmd {
        Command::Move(Direction::Up) => {
            gs.menu_cursor = (gs.menu_cursor + count - 1) % count;
        }
        Command::Move(Direction::Down) => {
            gs.menu_cursor = (gs.menu_cursor + 1) % count;
        }
        Command::Choose(i) if i < count => {
            gs.menu_cursor = i;
            choose_menu_item(gs, files);
        }
        Command::Confirm => choose_menu_item(gs, files),
        Command::Quit => return true,
        _ => {}
    }
    false
}

fn choose_menu_item(gs: &mut GameState, files: &SaveFiles) {
    match gs.menu_item() {
        MenuItem::Continue => {
            if !gs.load(files) {
                gs.start_new_game();
                gs.set_message("No saved game found. Starting new game...");
            }
        }
        MenuItem::NewGame => gs.start_new_game(),
    }
}

fn handle_play(gs: &mut GameState, cmd: Command, files: &SaveFiles) -> bool {
    match cmd {
        Command::Move(dir) => {
            let events = step::step(gs, dir, files);
            apply_events(gs, &events);
        }
        Command::NewGame => {
            gs.start_new_game();
            gs.set_message("New game");
        }
        Command::Quit => return true,
        Command::Invalid(c) => {
            gs.set_message(&format!("Invalid input '{c}'! Use the move keys or arrows."));
        }
        Command::Choose(_) | Command::Confirm => {}
    }
    false
}

fn handle_game_over(gs: &mut GameState, cmd: Command) -> bool {
    match cmd {
        Command::NewGame | Command::Confirm => {
            gs.start_new_game();
            false
        }
        Command::Quit => true,
        _ => false,
    }
}

/// Turn step events into the status line.
fn apply_events(gs: &mut GameState, events: &[GameEvent]) {
    let mut parts: Vec<String> = Vec::new();
    for event in events {
        match event {
            GameEvent::TilesMerged { gained } => parts.push(format!("+{gained}")),
            GameEvent::NewBestScore { score } => parts.push(format!("New best: {score}")),
            GameEvent::SaveFailed { reason } => parts.push(reason.clone()),
            GameEvent::TileSpawned { row, col, value } => {
                debug!("spawned {value} at ({row}, {col})");
            }
            GameEvent::NoChange | GameEvent::GameOver => {}
        }
    }
    gs.set_message(&parts.join("  "));
}

fn save_on_exit(gs: &mut GameState, files: &SaveFiles) {
    if let Err(e) = gs.save(files) {
        warn!("{e}");
        eprintln!("{e}");
    }
}
