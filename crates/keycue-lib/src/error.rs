//! Unified error type for the keycue-lib crate.
//!
//! [`KeycueError`] wraps module-specific errors (`MixerError`,
//! `LightingError`) and configuration failures. `From` impls allow `?` to
//! propagate across module boundaries seamlessly.

use std::fmt;

use crate::lighting::LightingError;
use crate::mixer::MixerError;

/// Unified error type for keycue-lib operations.
#[derive(Debug)]
pub enum KeycueError {
    /// Mixer communication error (connect, read, write, reply timeout).
    Mixer(MixerError),
    /// Lighting transport error (connect, handshake, LED write).
    Lighting(LightingError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration or binding validation error.
    Config(String),
}

impl fmt::Display for KeycueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeycueError::Mixer(e) => write!(f, "{e}"),
            KeycueError::Lighting(e) => write!(f, "{e}"),
            KeycueError::Io(e) => write!(f, "I/O error: {e}"),
            KeycueError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for KeycueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeycueError::Mixer(e) => Some(e),
            KeycueError::Lighting(e) => Some(e),
            KeycueError::Io(e) => Some(e),
            KeycueError::Config(_) => None,
        }
    }
}

impl From<MixerError> for KeycueError {
    fn from(e: MixerError) -> Self {
        KeycueError::Mixer(e)
    }
}

impl From<LightingError> for KeycueError {
    fn from(e: LightingError) -> Self {
        KeycueError::Lighting(e)
    }
}

impl From<std::io::Error> for KeycueError {
    fn from(e: std::io::Error) -> Self {
        KeycueError::Io(e)
    }
}

/// Crate-level Result alias using [`KeycueError`].
pub type Result<T> = std::result::Result<T, KeycueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mixer_error() {
        let e: KeycueError = MixerError::Timeout("no reply".into()).into();
        assert!(matches!(e, KeycueError::Mixer(MixerError::Timeout(_))));
    }

    #[test]
    fn from_lighting_error() {
        let e: KeycueError = LightingError::ConnectFailed("refused".into()).into();
        assert!(matches!(
            e,
            KeycueError::Lighting(LightingError::ConnectFailed(_))
        ));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: KeycueError = io_err.into();
        assert!(matches!(e, KeycueError::Io(_)));
    }

    #[test]
    fn display_config_error() {
        let e = KeycueError::Config("duplicate trigger".into());
        assert_eq!(e.to_string(), "Config error: duplicate trigger");
    }

    #[test]
    fn source_chains_mixer_error() {
        let e = KeycueError::Mixer(MixerError::ReadFailed("strip[5].gain: timeout".into()));
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("timeout"));
    }

    #[test]
    fn source_none_for_config() {
        let e = KeycueError::Config("bad".into());
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_mixer_to_keycue() {
        fn inner() -> crate::mixer::Result<()> {
            Err(MixerError::WriteFailed("nope".into()))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(err, KeycueError::Mixer(MixerError::WriteFailed(_))));
    }
}
