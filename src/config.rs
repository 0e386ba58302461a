/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::save::{DEFAULT_BEST_FILE, DEFAULT_STATE_FILE};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub save: SaveConfig,
    pub keys: KeyConfig,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SaveConfig {
    pub save_dir: Option<PathBuf>,
    pub state_file: String,
    pub best_file: String,
}

/// Letter bindings. Stored lowercase; matched case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyConfig {
    pub up: char,
    pub left: char,
    pub down: char,
    pub right: char,
    pub quit: char,
    pub new_game: char,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            up: 'w',
            left: 'a',
            down: 's',
            right: 'd',
            quit: 'q',
            new_game: 'n',
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    keys: TomlKeys,
    #[serde(default)]
    rng: TomlRng,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    save_dir: String,
    #[serde(default = "default_state_file")]
    state_file: String,
    #[serde(default = "default_best_file")]
    best_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlKeys {
    #[serde(default = "default_up")]
    up: String,
    #[serde(default = "default_left")]
    left: String,
    #[serde(default = "default_down")]
    down: String,
    #[serde(default = "default_right")]
    right: String,
    #[serde(default = "default_quit")]
    quit: String,
    #[serde(default = "default_new_game")]
    new_game: String,
}

#[derive(Deserialize, Debug, Default)]
struct TomlRng {
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_state_file() -> String { DEFAULT_STATE_FILE.into() }
fn default_best_file() -> String { DEFAULT_BEST_FILE.into() }
fn default_up() -> String { "w".into() }
fn default_left() -> String { "a".into() }
fn default_down() -> String { "s".into() }
fn default_right() -> String { "d".into() }
fn default_quit() -> String { "q".into() }
fn default_new_game() -> String { "n".into() }
fn default_log_file() -> String { "twenty48.log".into() }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            save_dir: String::new(),
            state_file: default_state_file(),
            best_file: default_best_file(),
        }
    }
}

impl Default for TomlKeys {
    fn default() -> Self {
        TomlKeys {
            up: default_up(),
            left: default_left(),
            down: default_down(),
            right: default_right(),
            quit: default_quit(),
            new_game: default_new_game(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    /// Parse config text directly. Parse errors fall back to defaults.
    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Self {
        GameConfig::from_toml(toml::from_str::<TomlConfig>(text).unwrap_or_default())
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };

        GameConfig {
            save: SaveConfig {
                save_dir: non_empty(cfg.general.save_dir).map(PathBuf::from),
                state_file: cfg.general.state_file,
                best_file: cfg.general.best_file,
            },
            keys: resolve_keys(&cfg.keys),
            seed: cfg.rng.seed,
            log_file: non_empty(cfg.log.file).map(PathBuf::from),
        }
    }
}

/// Turn the TOML strings into single lowercase letters.
/// Any malformed or duplicated binding resets the whole table to defaults.
fn resolve_keys(k: &TomlKeys) -> KeyConfig {
    let letter = |s: &str| -> Option<char> {
        let mut it = s.trim().chars();
        match (it.next(), it.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    };

    let parsed = [&k.up, &k.left, &k.down, &k.right, &k.quit, &k.new_game]
        .iter()
        .map(|s| letter(s.as_str()))
        .collect::<Option<Vec<char>>>();

    let Some(keys) = parsed else {
        eprintln!("Warning: [keys] must be single letters. Using default keys.");
        return KeyConfig::default();
    };

    let mut sorted = keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != keys.len() {
        eprintln!("Warning: [keys] has duplicate bindings. Using default keys.");
        return KeyConfig::default();
    }

    KeyConfig {
        up: keys[0],
        left: keys[1],
        down: keys[2],
        right: keys[3],
        quit: keys[4],
        new_game: keys[5],
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg.keys, KeyConfig::default());
        assert_eq!(cfg.save.save_dir, None);
        assert_eq!(cfg.save.state_file, "savegame.txt");
        assert_eq!(cfg.save.best_file, "bestscore.txt");
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.log_file, Some(PathBuf::from("twenty48.log")));
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [general]
            save_dir = "/tmp/t48"

            [keys]
            up = "K"

            [rng]
            seed = 42

            [log]
            file = ""
            "#,
        );
        assert_eq!(cfg.save.save_dir, Some(PathBuf::from("/tmp/t48")));
        assert_eq!(cfg.save.state_file, "savegame.txt");
        assert_eq!(cfg.keys.up, 'k');
        assert_eq!(cfg.keys.left, 'a');
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn duplicate_keys_fall_back() {
        let cfg = GameConfig::from_toml_str("[keys]\nup = \"a\"\n");
        assert_eq!(cfg.keys, KeyConfig::default());
    }

    #[test]
    fn multi_char_key_falls_back() {
        let cfg = GameConfig::from_toml_str("[keys]\nquit = \"esc\"\n");
        assert_eq!(cfg.keys, KeyConfig::default());
    }

    #[test]
    fn digit_key_falls_back() {
        let cfg = GameConfig::from_toml_str("[keys]\nup = \"1\"\n");
        assert_eq!(cfg.keys, KeyConfig::default());
    }

    #[test]
    fn broken_toml_falls_back() {
        let cfg = GameConfig::from_toml_str("[general\nsave_dir = ");
        assert_eq!(cfg.save.state_file, "savegame.txt");
    }
}
