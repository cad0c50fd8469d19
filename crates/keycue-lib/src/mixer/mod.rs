//! Mixer parameter access — trait + OSC backend.

mod osc;

pub use osc::OscMixer;

use std::fmt;

use crate::binding::StripParam;

/// Mixer communication errors.
///
/// String payloads follow the convention **"context: details"** where
/// *context* identifies the parameter or step and *details* describes what
/// went wrong.
#[derive(Debug)]
pub enum MixerError {
    ConnectFailed(String),
    ReadFailed(String),
    WriteFailed(String),
    /// No reply arrived within the configured window.
    Timeout(String),
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::ConnectFailed(e) => write!(f, "Mixer connection failed: {e}"),
            MixerError::ReadFailed(e) => write!(f, "Mixer read failed: {e}"),
            MixerError::WriteFailed(e) => write!(f, "Mixer write failed: {e}"),
            MixerError::Timeout(e) => write!(f, "Mixer reply timed out: {e}"),
        }
    }
}

impl std::error::Error for MixerError {}

pub type Result<T> = std::result::Result<T, MixerError>;

/// Read/write access to mixer parameters.
///
/// Calls are expected to be bounded, fast operations; backends enforce
/// their own timeouts so no call blocks indefinitely.
pub trait MixerParams {
    fn read_switch(&self, param: &StripParam) -> Result<bool>;
    fn read_level(&self, param: &StripParam) -> Result<f32>;
    fn write_switch(&self, param: &StripParam, on: bool) -> Result<()>;
    fn write_level(&self, param: &StripParam, value: f32) -> Result<()>;
}

// ── Mock mixer for testing ──

/// In-memory mock mixer for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use crate::binding::ParamValue;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// In-memory mixer for unit tests. Stores parameter values in a map
    /// keyed by location; writes are recorded in order, and individual
    /// locations can be set to fail.
    #[derive(Default)]
    pub struct MockMixer {
        /// Parameter storage: location → value.
        pub values: RefCell<HashMap<StripParam, ParamValue>>,
        /// Recorded writes: (location, value written).
        pub writes: RefCell<Vec<(StripParam, ParamValue)>>,
        /// Locations whose reads and writes fail.
        pub fail_params: RefCell<HashSet<StripParam>>,
    }

    impl MockMixer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_switch(&self, param: &StripParam, on: bool) {
            self.values
                .borrow_mut()
                .insert(param.clone(), ParamValue::Switch(on));
        }

        pub fn set_level(&self, param: &StripParam, value: f32) {
            self.values
                .borrow_mut()
                .insert(param.clone(), ParamValue::Level(value));
        }

        pub fn fail_on(&self, param: &StripParam) {
            self.fail_params.borrow_mut().insert(param.clone());
        }

        fn check(&self, param: &StripParam, op: &str) -> Result<()> {
            if self.fail_params.borrow().contains(param) {
                let msg = format!("{param}: mock {op} failure injected");
                return Err(if op == "write" {
                    MixerError::WriteFailed(msg)
                } else {
                    MixerError::ReadFailed(msg)
                });
            }
            Ok(())
        }
    }

    impl MixerParams for MockMixer {
        fn read_switch(&self, param: &StripParam) -> Result<bool> {
            self.check(param, "read")?;
            match self.values.borrow().get(param) {
                Some(ParamValue::Switch(on)) => Ok(*on),
                _ => Err(MixerError::ReadFailed(format!("{param}: no such switch"))),
            }
        }

        fn read_level(&self, param: &StripParam) -> Result<f32> {
            self.check(param, "read")?;
            match self.values.borrow().get(param) {
                Some(ParamValue::Level(v)) => Ok(*v),
                _ => Err(MixerError::ReadFailed(format!("{param}: no such level"))),
            }
        }

        fn write_switch(&self, param: &StripParam, on: bool) -> Result<()> {
            self.check(param, "write")?;
            self.values
                .borrow_mut()
                .insert(param.clone(), ParamValue::Switch(on));
            self.writes
                .borrow_mut()
                .push((param.clone(), ParamValue::Switch(on)));
            Ok(())
        }

        fn write_level(&self, param: &StripParam, value: f32) -> Result<()> {
            self.check(param, "write")?;
            self.values
                .borrow_mut()
                .insert(param.clone(), ParamValue::Level(value));
            self.writes
                .borrow_mut()
                .push((param.clone(), ParamValue::Level(value)));
            Ok(())
        }
    }

}
