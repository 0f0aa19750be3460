//! Configuration loading and persistence.
//!
//! The primary format is TOML:
//!
//! ```toml
//! log_level = "info"
//!
//! [region]
//! x = [0, 1920]
//! y = [0, 1080]
//! buffer = 10
//! poll_interval_secs = 0.001
//!
//! [keys]
//! toggle = "ctrl_r"
//! exit = "end"
//! ```
//!
//! Files ending in `.json` are read in the older flat layout instead:
//!
//! ```json
//! { "pos_lims": [[0, 1920], [0, 1080]], "pos_buffer": 10, "delay": 0.001 }
//! ```
//!
//! # Where the file is looked up
//!
//! 1. The path given with `--config` (or `MOUSE_CONTROLS_CONFIG`). It must
//!    exist.
//! 2. `config.toml`, then `config.json`, in the working directory.
//! 3. `config.toml` in the platform config directory:
//!    - Windows: `%APPDATA%\MouseControls\config.toml`
//!    - Linux:   `$XDG_CONFIG_HOME/mouse-controls/config.toml` (or `~/.config/…`)
//!    - macOS:   `~/Library/Application Support/MouseControls/config.toml`
//!
//! If none of the implicit locations has a file, [`AppConfig::default`] is
//! used.
//!
//! # Validation
//!
//! Parsing only checks shape. [`AppConfig::settings`] turns a parsed config
//! into [`ControlSettings`] and rejects anything the governor cannot run
//! with: a margin wider than half the region, a negative or non-finite poll
//! interval, or identical toggle and exit keys.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mouse_controls_core::{BoundingRegion, ClampRegion, Interval, Key, RegionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::governor::TriggerKeys;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// An explicitly requested config file does not exist.
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The JSON content could not be parsed.
    #[error("failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The region and buffer do not leave a usable clamp rectangle.
    #[error("invalid region: {0}")]
    Region(#[from] RegionError),

    /// The poll interval is negative, NaN or too large.
    #[error("invalid poll interval {0} s: must be a finite, non-negative number of seconds")]
    InvalidPollInterval(f64),

    /// Toggle and exit are bound to the same key.
    #[error("toggle and exit keys must differ (both are {0})")]
    DuplicateKeys(Key),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub region: RegionConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Where the cursor is held and how often it is checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    /// Horizontal bounds `[min, max]` in screen pixels, both inclusive.
    pub x: Interval,
    /// Vertical bounds `[min, max]` in screen pixels, both inclusive.
    pub y: Interval,
    /// Inset applied to every side of the bounds before clamping.
    pub buffer: u32,
    /// Seconds between clamp checks. `0` busy-loops.
    pub poll_interval_secs: f64,
}

/// Hotkey bindings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeysConfig {
    #[serde(default = "default_toggle_key")]
    pub toggle: Key,
    #[serde(default = "default_exit_key")]
    pub exit: Key,
}

/// The older flat JSON layout.
#[derive(Debug, Deserialize)]
struct LegacyJsonConfig {
    pos_lims: (Interval, Interval),
    pos_buffer: u32,
    delay: f64,
    #[serde(default)]
    toggle_key: Option<Key>,
    #[serde(default)]
    exit_key: Option<Key>,
    #[serde(default)]
    log_level: Option<String>,
}

impl From<LegacyJsonConfig> for AppConfig {
    fn from(legacy: LegacyJsonConfig) -> Self {
        let (x, y) = legacy.pos_lims;
        Self {
            log_level: legacy.log_level.unwrap_or_else(default_log_level),
            region: RegionConfig {
                x,
                y,
                buffer: legacy.pos_buffer,
                poll_interval_secs: legacy.delay,
            },
            keys: KeysConfig {
                toggle: legacy.toggle_key.unwrap_or_else(default_toggle_key),
                exit: legacy.exit_key.unwrap_or_else(default_exit_key),
            },
        }
    }
}

/// Validated runtime parameters for the governor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSettings {
    pub region: ClampRegion,
    pub poll_interval: Duration,
    pub keys: TriggerKeys,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_toggle_key() -> Key {
    Key::CtrlRight
}
fn default_exit_key() -> Key {
    Key::End
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            region: RegionConfig::default(),
            keys: KeysConfig::default(),
        }
    }
}

impl Default for RegionConfig {
    /// A single 1920x1080 monitor with a 10 px buffer, checked every 1 ms.
    fn default() -> Self {
        Self {
            x: Interval::from_origin(1920),
            y: Interval::from_origin(1080),
            buffer: 10,
            poll_interval_secs: 0.001,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle_key(),
            exit: default_exit_key(),
        }
    }
}

impl AppConfig {
    /// Validates the config and derives the governor's runtime parameters.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Region`] if the buffer empties the region on an axis.
    /// - [`ConfigError::InvalidPollInterval`] for negative, NaN or
    ///   out-of-range intervals.
    /// - [`ConfigError::DuplicateKeys`] if toggle and exit are the same key.
    pub fn settings(&self) -> Result<ControlSettings, ConfigError> {
        let bounds = BoundingRegion::new(self.region.x, self.region.y);
        let region = ClampRegion::new(bounds, self.region.buffer)?;

        let secs = self.region.poll_interval_secs;
        let poll_interval =
            Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidPollInterval(secs))?;

        if self.keys.toggle == self.keys.exit {
            return Err(ConfigError::DuplicateKeys(self.keys.toggle));
        }

        Ok(ControlSettings {
            region,
            poll_interval,
            keys: TriggerKeys {
                toggle: self.keys.toggle,
                exit: self.keys.exit,
            },
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file in the platform directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Parses config text. `.json` paths use the flat JSON layout; anything else
/// is TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or [`ConfigError::ParseJson`] for malformed
/// content.
pub fn parse_config(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let legacy: LegacyJsonConfig = serde_json::from_str(content)?;
        Ok(legacy.into())
    } else {
        Ok(toml::from_str(content)?)
    }
}

/// Loads the config at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist,
/// [`ConfigError::Io`] for other file-system errors, and a parse error if the
/// content is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the config from `explicit` if given, otherwise from the first
/// implicit location that has a file, otherwise returns the defaults.
///
/// Returns the config together with the path it was read from (`None` for
/// defaults).
///
/// # Errors
///
/// Propagates [`load_config_from`] errors. A missing explicit path is an
/// error; missing implicit files are not.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        return Ok((load_config_from(path)?, Some(path.to_path_buf())));
    }
    resolve_in(&implicit_candidates())
}

fn resolve_in(candidates: &[PathBuf]) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    for path in candidates {
        match load_config_from(path) {
            Ok(cfg) => return Ok((cfg, Some(path.clone()))),
            Err(ConfigError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok((AppConfig::default(), None))
}

fn implicit_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("config.toml"), PathBuf::from("config.json")];
    if let Ok(path) = config_file_path() {
        candidates.push(path);
    }
    candidates
}

/// Persists `config` as TOML at `path`.
///
/// Creates the parent directory if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure directory exists before writing.
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MouseControls"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mouse-controls"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/MouseControls
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MouseControls")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
