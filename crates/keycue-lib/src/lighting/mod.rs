//! Lighting control — indicator driver over a device trait + OpenRGB backend.

mod openrgb;
pub mod protocol;

pub use openrgb::OpenRgbDevice;

use std::fmt;

use crate::color::Rgb;

/// Lighting transport errors.
#[derive(Debug)]
pub enum LightingError {
    ConnectFailed(String),
    /// Malformed or unexpected data from the lighting server.
    Protocol(String),
    WriteFailed(String),
    /// The configured controller index does not exist on the server.
    DeviceMissing { index: u32, count: u32 },
}

impl fmt::Display for LightingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightingError::ConnectFailed(e) => write!(f, "Lighting connection failed: {e}"),
            LightingError::Protocol(e) => write!(f, "Lighting protocol error: {e}"),
            LightingError::WriteFailed(e) => write!(f, "LED write failed: {e}"),
            LightingError::DeviceMissing { index, count } => write!(
                f,
                "Lighting device {index} not found (server reports {count} devices)"
            ),
        }
    }
}

impl std::error::Error for LightingError {}

pub type Result<T> = std::result::Result<T, LightingError>;

/// One addressable lighting device with independently colorable LEDs.
pub trait LightingDevice {
    fn set_color(&self, led: u32, color: Rgb) -> Result<()>;
}

/// Capability wrapper applying computed colors to indicators.
///
/// Indicator writes are non-fatal by contract: mixer-side state must not
/// couple to lighting availability, so transport failures are logged as
/// warnings and swallowed. The indicator stays stale until the next
/// successful push.
pub struct IndicatorDriver<L: LightingDevice> {
    device: L,
}

impl<L: LightingDevice> IndicatorDriver<L> {
    pub fn new(device: L) -> Self {
        IndicatorDriver { device }
    }

    /// Push one color to one indicator.
    pub fn set(&self, led: u32, color: Rgb) {
        if let Err(e) = self.device.set_color(led, color) {
            log::warn!("indicator {led}: {e}");
        }
    }

    /// Turn the given indicators off (exit restore).
    pub fn blank<I: IntoIterator<Item = u32>>(&self, leds: I) {
        for led in leds {
            self.set(led, Rgb::BLACK);
        }
    }

    pub fn device(&self) -> &L {
        &self.device
    }
}

// ── Mock lighting device for testing ──

/// In-memory mock lighting device for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory lighting device for unit tests. Records every color write
    /// in order; individual LEDs can be set to fail.
    #[derive(Default)]
    pub struct MockLighting {
        /// Recorded writes: (led, color).
        pub writes: RefCell<Vec<(u32, Rgb)>>,
        /// LEDs whose writes fail.
        pub fail_leds: RefCell<HashSet<u32>>,
    }

    impl MockLighting {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_on(&self, led: u32) {
            self.fail_leds.borrow_mut().insert(led);
        }

        /// Last color written to a given LED, if any.
        pub fn last_color(&self, led: u32) -> Option<Rgb> {
            self.writes
                .borrow()
                .iter()
                .rev()
                .find(|(l, _)| *l == led)
                .map(|(_, c)| *c)
        }
    }

    impl LightingDevice for MockLighting {
        fn set_color(&self, led: u32, color: Rgb) -> Result<()> {
            if self.fail_leds.borrow().contains(&led) {
                return Err(LightingError::WriteFailed(format!(
                    "led {led}: mock failure injected"
                )));
            }
            self.writes.borrow_mut().push((led, color));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLighting;
    use super::*;

    #[test]
    fn driver_forwards_writes() {
        let driver = IndicatorDriver::new(MockLighting::new());
        driver.set(116, Rgb::GREEN);
        assert_eq!(driver.device().last_color(116), Some(Rgb::GREEN));
    }

    #[test]
    fn driver_swallows_write_failures() {
        let driver = IndicatorDriver::new(MockLighting::new());
        driver.device().fail_on(7);
        // Must not panic or propagate.
        driver.set(7, Rgb::RED);
        assert_eq!(driver.device().last_color(7), None);
    }

    #[test]
    fn blank_turns_indicators_off() {
        let driver = IndicatorDriver::new(MockLighting::new());
        driver.set(1, Rgb::GREEN);
        driver.set(2, Rgb::RED);
        driver.blank([1, 2]);
        assert_eq!(driver.device().last_color(1), Some(Rgb::BLACK));
        assert_eq!(driver.device().last_color(2), Some(Rgb::BLACK));
    }

    #[test]
    fn device_missing_display() {
        let e = LightingError::DeviceMissing { index: 3, count: 2 };
        assert_eq!(
            e.to_string(),
            "Lighting device 3 not found (server reports 2 devices)"
        );
    }
}
