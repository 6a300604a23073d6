use log::{debug, info};

use crate::config::{GPIO_LEFT_MOTOR_DIR, GPIO_RIGHT_MOTOR_DIR, MOTOR_PWM_FREQUENCY_HZ};
use crate::correction::MotorCommand;
use crate::error::Result;

// Use rppal in production
#[cfg(not(test))]
use rppal::{
    gpio::{Gpio, OutputPin},
    pwm::{Channel, Polarity, Pwm},
};

// Mock PWM and GPIO for testing
#[cfg(test)]
use crate::mocks::{
    mock_gpio::{Gpio, OutputPin},
    mock_pwm::{Channel, Polarity, Pwm},
};

/// Hardware PWM channel for each motor.
/// Channel 0 is on GPIO 18 (or 12), channel 1 on GPIO 19 (or 13),
/// depending on the pwm-2chan overlay.
const RIGHT_MOTOR_CHANNEL: Channel = Channel::Pwm0;
const LEFT_MOTOR_CHANNEL: Channel = Channel::Pwm1;

/// Both drive motors of the H-bridge.
pub struct MotorDriver {
    right: Pwm,
    left: Pwm,
    // direction-sense lines, held low for forward travel
    _right_dir: OutputPin,
    _left_dir: OutputPin,
}

impl MotorDriver {
    /// Starts both channels at 1 kHz with zero duty.
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new()?;
        let right_dir = gpio.get(GPIO_RIGHT_MOTOR_DIR)?.into_output_low();
        let left_dir = gpio.get(GPIO_LEFT_MOTOR_DIR)?.into_output_low();

        let right = Pwm::with_frequency(
            RIGHT_MOTOR_CHANNEL,
            MOTOR_PWM_FREQUENCY_HZ,
            0.0,
            Polarity::Normal,
            true,
        )?;
        let left = Pwm::with_frequency(
            LEFT_MOTOR_CHANNEL,
            MOTOR_PWM_FREQUENCY_HZ,
            0.0,
            Polarity::Normal,
            true,
        )?;

        info!("Motor PWM initialized at {} Hz", MOTOR_PWM_FREQUENCY_HZ);
        Ok(Self {
            right,
            left,
            _right_dir: right_dir,
            _left_dir: left_dir,
        })
    }

    /// Applies a duty cycle pair. Values are clamped to 0.0..=1.0.
    pub fn set_duty_cycle(&mut self, command: MotorCommand) -> Result<()> {
        let command = MotorCommand::new(command.left, command.right);
        self.right.set_duty_cycle(command.right)?;
        self.left.set_duty_cycle(command.left)?;
        debug!("Motors set to {}", command);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.set_duty_cycle(MotorCommand::STOP)
    }

    /// Disable PWM output
    pub fn disable(&mut self) -> Result<()> {
        self.right.disable()?;
        self.left.disable()?;
        Ok(())
    }
}

impl Drop for MotorDriver {
    fn drop(&mut self) {
        // Ensure the motors stop when the driver goes away
        let _ = self.stop();
        let _ = self.disable();
    }
}
