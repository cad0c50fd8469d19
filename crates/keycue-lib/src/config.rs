//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::binding::{Binding, BindingSet, ParamKind, StripParam};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# Keycue configuration — changes made outside the app may be overwritten.\n\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OSC mixer address. Default: "127.0.0.1:10023".
    #[serde(default = "default_mixer_addr")]
    pub mixer_addr: String,

    /// How long to wait for a mixer reply, in milliseconds.
    #[serde(default = "default_mixer_timeout_ms")]
    pub mixer_timeout_ms: u64,

    /// OpenRGB SDK server address. Default: "127.0.0.1:6742".
    #[serde(default = "default_lighting_addr")]
    pub lighting_addr: String,

    /// Controller index on the lighting server. Default: 0 (first device).
    #[serde(default)]
    pub lighting_device: u32,

    /// How often to check for out-of-band mixer changes, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// The key → parameter → LED binding table.
    #[serde(default = "default_bindings")]
    pub bindings: Vec<BindingEntry>,
}

/// One binding row as it appears in the TOML file.
///
/// `origin`/`end` are required for `kind = "level"` and ignored for
/// `kind = "switch"` (validation flags strays).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingEntry {
    pub key: String,
    pub strip: usize,
    pub param: String,
    pub led: u32,
    pub kind: BindingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Switch,
    Level,
}

fn default_mixer_addr() -> String {
    "127.0.0.1:10023".into()
}
fn default_mixer_timeout_ms() -> u64 {
    250
}
fn default_lighting_addr() -> String {
    "127.0.0.1:6742".into()
}
fn default_poll_interval_ms() -> u64 {
    100
}

/// The default binding table: numpad row 1-9 over the usual session strips,
/// including the two gain gradients.
fn default_bindings() -> Vec<BindingEntry> {
    fn switch(key: &str, strip: usize, param: &str, led: u32) -> BindingEntry {
        BindingEntry {
            key: key.into(),
            strip,
            param: param.into(),
            led,
            kind: BindingKind::Switch,
            origin: None,
            end: None,
        }
    }
    fn level(key: &str, strip: usize, param: &str, led: u32, origin: f32, end: f32) -> BindingEntry {
        BindingEntry {
            key: key.into(),
            strip,
            param: param.into(),
            led,
            kind: BindingKind::Level,
            origin: Some(origin),
            end: Some(end),
        }
    }
    vec![
        switch("Numpad1", 0, "B1", 116),
        switch("Numpad2", 0, "B2", 117),
        switch("Numpad3", 0, "B3", 118),
        switch("Numpad4", 5, "A1", 113),
        switch("Numpad5", 6, "A1", 114),
        switch("Numpad6", 7, "A1", 115),
        level("Numpad7", 6, "gain", 109, 0.0, 0.40),
        level("Numpad8", 5, "gain", 110, 0.0, -30.0),
        switch("Numpad9", 6, "A3", 111),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mixer_addr: default_mixer_addr(),
            mixer_timeout_ms: default_mixer_timeout_ms(),
            lighting_addr: default_lighting_addr(),
            lighting_device: 0,
            poll_interval_ms: default_poll_interval_ms(),
            bindings: default_bindings(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A binding has an empty trigger key (1-based row number).
    EmptyKey { row: usize },
    /// Two bindings share a trigger key.
    DuplicateKey(String),
    /// A level binding is missing `origin` or `end`.
    MissingRange { key: String },
    /// A switch binding carries `origin`/`end` values.
    UnexpectedRange { key: String },
    /// An address field is not `host:port`.
    BadAddress { field: &'static str, value: String },
    /// The poll interval is zero.
    ZeroPollInterval,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyKey { row } => {
                write!(f, "Binding {row} has an empty trigger key")
            }
            ValidationError::DuplicateKey(key) => write!(f, "Duplicate trigger key '{key}'"),
            ValidationError::MissingRange { key } => {
                write!(f, "Level binding '{key}' needs both origin and end")
            }
            ValidationError::UnexpectedRange { key } => {
                write!(f, "Switch binding '{key}' does not take origin/end")
            }
            ValidationError::BadAddress { field, value } => {
                write!(f, "Invalid {field}: '{value}' (expected host:port)")
            }
            ValidationError::ZeroPollInterval => write!(f, "poll_interval_ms must be nonzero"),
        }
    }
}

/// `host:port` with a parseable port.
fn valid_addr(value: &str) -> bool {
    match value.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keycue"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any
    /// parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any
    /// parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Save config to an arbitrary path atomically (write to temp file,
    /// then rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn mixer_timeout(&self) -> Duration {
        Duration::from_millis(self.mixer_timeout_ms)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !valid_addr(&self.mixer_addr) {
            errors.push(ValidationError::BadAddress {
                field: "mixer_addr",
                value: self.mixer_addr.clone(),
            });
        }
        if !valid_addr(&self.lighting_addr) {
            errors.push(ValidationError::BadAddress {
                field: "lighting_addr",
                value: self.lighting_addr.clone(),
            });
        }
        if self.poll_interval_ms == 0 {
            errors.push(ValidationError::ZeroPollInterval);
        }

        let mut seen_duplicates = Vec::new();
        for (i, entry) in self.bindings.iter().enumerate() {
            let key = entry.key.trim();
            if key.is_empty() {
                errors.push(ValidationError::EmptyKey { row: i + 1 });
            } else if self.bindings[..i].iter().any(|other| other.key == entry.key)
                && !seen_duplicates.contains(&entry.key)
            {
                errors.push(ValidationError::DuplicateKey(entry.key.clone()));
                seen_duplicates.push(entry.key.clone());
            }
            match entry.kind {
                BindingKind::Level => {
                    if entry.origin.is_none() || entry.end.is_none() {
                        errors.push(ValidationError::MissingRange {
                            key: entry.key.clone(),
                        });
                    }
                }
                BindingKind::Switch => {
                    if entry.origin.is_some() || entry.end.is_some() {
                        errors.push(ValidationError::UnexpectedRange {
                            key: entry.key.clone(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Convert the binding table into a validated [`BindingSet`].
    pub fn binding_set(&self) -> crate::error::Result<BindingSet> {
        let mut bindings = Vec::with_capacity(self.bindings.len());
        for entry in &self.bindings {
            let kind = match entry.kind {
                BindingKind::Switch => ParamKind::Switch,
                BindingKind::Level => match (entry.origin, entry.end) {
                    (Some(origin), Some(end)) => ParamKind::Level { origin, end },
                    _ => {
                        return Err(crate::KeycueError::Config(format!(
                            "level binding '{}' needs both origin and end",
                            entry.key
                        )));
                    }
                },
            };
            bindings.push(Binding {
                key: entry.key.clone(),
                param: StripParam::new(entry.strip, entry.param.clone()),
                led: entry.led,
                kind,
            });
        }
        BindingSet::new(bindings)
    }
}
