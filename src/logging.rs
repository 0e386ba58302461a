/// File-backed logging.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so log lines go to a file. Filter comes from `RUST_LOG` (default `info`).

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Env, Target};

/// Initialise the global logger. Returns `false` (logging disabled) when the
/// file cannot be opened.
pub fn init(path: &Path) -> bool {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return false;
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .is_ok()
}
