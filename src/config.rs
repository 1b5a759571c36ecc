/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or the
/// user data dir. Falls back to defaults if the file is missing, a key is
/// absent, or the file does not parse.
///
/// Loading happens before the logger exists (the log target is itself a
/// config key), so problems are collected in `GameConfig::problems` and
/// logged by `main` once logging is up.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::sim::level;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub general: GeneralConfig,
    pub gamepad: GamepadConfig,
    /// The file the settings came from, if any.
    pub source: Option<PathBuf>,
    pub problems: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub frame: Duration,
    /// Upper bound on one simulation tick, seconds.
    pub max_dt: f32,
    pub lose_delay: Duration,
    pub won_delay: Duration,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub start_level: usize,
    pub sound: bool,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub toggle_sound: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_max_dt")]
    max_dt: f32,
    #[serde(default = "default_lose_delay")]
    lose_delay_ms: u64,
    #[serde(default = "default_won_delay")]
    won_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    start_level: usize,
    #[serde(default = "default_sound")]
    sound: bool,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_toggle_sound")]
    toggle_sound: Vec<String>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }
fn default_max_dt() -> f32 { 0.05 }
fn default_lose_delay() -> u64 { 200 }
fn default_won_delay() -> u64 { 2000 }
fn default_sound() -> bool { true }

fn default_jump() -> Vec<String> { vec!["A".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "X".into()] }
fn default_toggle_sound() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            max_dt: default_max_dt(),
            lose_delay_ms: default_lose_delay(),
            won_delay_ms: default_won_delay(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            start_level: 0,
            sound: default_sound(),
            seed: None,
            log_file: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            confirm: default_confirm(),
            toggle_sound: default_toggle_sound(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_schema(TomlConfig::default(), Vec::new())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/egg-kong`.
    pub fn load() -> Self {
        let mut problems = Vec::new();
        let (cfg, source) = load_toml(&candidate_dirs(), &mut problems);
        let mut config = GameConfig::from_schema(cfg, problems);
        config.source = source;
        config
    }

    /// Parse a config document. A parse error yields the defaults.
    pub fn from_toml_str(text: &str) -> Self {
        let mut problems = Vec::new();
        let cfg = parse(text, "config.toml", &mut problems);
        GameConfig::from_schema(cfg, problems)
    }

    fn from_schema(cfg: TomlConfig, mut problems: Vec<String>) -> Self {
        let max_dt = if cfg.timing.max_dt.is_finite() && cfg.timing.max_dt > 0.0 {
            cfg.timing.max_dt
        } else {
            problems.push(format!(
                "timing.max_dt = {} is not usable, using {}",
                cfg.timing.max_dt,
                default_max_dt()
            ));
            default_max_dt()
        };

        GameConfig {
            timing: TimingConfig {
                frame: Duration::from_millis(cfg.timing.frame_ms.max(1)),
                max_dt,
                lose_delay: Duration::from_millis(cfg.timing.lose_delay_ms),
                won_delay: Duration::from_millis(cfg.timing.won_delay_ms),
            },
            general: GeneralConfig {
                start_level: level::clamp_index(cfg.general.start_level),
                sound: cfg.general.sound,
                seed: cfg.general.seed,
                log_file: cfg.general.log_file.map(PathBuf::from),
            },
            gamepad: GamepadConfig {
                jump: cfg.gamepad.jump,
                confirm: cfg.gamepad.confirm,
                toggle_sound: cfg.gamepad.toggle_sound,
            },
            source: None,
            problems,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + user data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
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

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/egg-kong");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    dirs
}

/// First readable config.toml wins.
fn load_toml(search_dirs: &[PathBuf], problems: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let cfg = parse(&text, &path.display().to_string(), problems);
                return (cfg, Some(path));
            }
            Err(e) => problems.push(format!("could not read {}: {e}", path.display())),
        }
    }
    (TomlConfig::default(), None)
}

fn parse(text: &str, origin: &str, problems: &mut Vec<String>) -> TomlConfig {
    toml::from_str::<TomlConfig>(text).unwrap_or_else(|e| {
        problems.push(format!("{origin}: parse error, using defaults: {e}"));
        TomlConfig::default()
    })
}
