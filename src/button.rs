use log::{debug, info};

use crate::calibration::PressLatch;
use crate::config::{BUTTON_DEAD_TIME, GPIO_CALIBRATION_BUTTON};
use crate::error::Result;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, InputPin, Trigger};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_gpio::{Gpio, InputPin, Trigger};

/// Push button stepping through calibration.
///
/// Rising edges are delivered on rppal's interrupt thread, which only bumps
/// the shared [`PressLatch`]. Edges within [`BUTTON_DEAD_TIME`] of the last
/// one are dropped by the debounce filter.
pub struct CalibrationButton {
    // kept alive so the interrupt stays registered
    _pin: InputPin,
    presses: PressLatch,
}

impl CalibrationButton {
    pub fn new() -> Result<Self> {
        Self::with_pin(GPIO_CALIBRATION_BUTTON)
    }

    pub fn with_pin(pin: u8) -> Result<Self> {
        let gpio = Gpio::new()?;
        let mut input = gpio.get(pin)?.into_input_pulldown();

        let presses = PressLatch::new();
        let latch = presses.clone();
        input.set_async_interrupt(Trigger::RisingEdge, Some(BUTTON_DEAD_TIME), move |_event| {
            latch.record();
        })?;

        info!("Calibration button armed on GPIO {}", pin);
        Ok(Self {
            _pin: input,
            presses,
        })
    }

    /// Presses since the last call.
    pub fn take_presses(&self) -> u32 {
        let presses = self.presses.take();
        if presses > 0 {
            debug!("{} button press(es) pending", presses);
        }
        presses
    }

    pub fn latch(&self) -> &PressLatch {
        &self.presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::mock_gpio;
    use std::error::Error;

    #[test]
    fn test_rising_edge_with_dead_time() -> Result<(), Box<dyn Error>> {
        mock_gpio::reset_mock_pins();

        let _button = CalibrationButton::new()?;
        assert_eq!(
            mock_gpio::mock_interrupt_config(GPIO_CALIBRATION_BUTTON),
            Some((Trigger::RisingEdge, Some(BUTTON_DEAD_TIME)))
        );
        Ok(())
    }

    #[test]
    fn test_interrupt_only_counts() -> Result<(), Box<dyn Error>> {
        mock_gpio::reset_mock_pins();

        let button = CalibrationButton::new()?;
        assert_eq!(button.take_presses(), 0);

        mock_gpio::trigger_mock_interrupt(GPIO_CALIBRATION_BUTTON);
        mock_gpio::trigger_mock_interrupt(GPIO_CALIBRATION_BUTTON);
        assert_eq!(button.latch().pending(), 2);
        assert_eq!(button.take_presses(), 2);
        assert_eq!(button.take_presses(), 0);
        Ok(())
    }
}
