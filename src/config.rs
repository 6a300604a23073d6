use std::time::Duration;

use log::warn;

use crate::correction::CorrectionProfile;
use crate::direction::ClassifierMode;

// ** SENSOR CONFIGURATION ** //

/// Number of photoresistor lines under the chassis, left to right.
pub const SENSOR_COUNT: usize = 6;
/// BCM pin numbers of the sensor lines, leftmost first.
pub const SENSOR_PINS: [u8; SENSOR_COUNT] = [17, 27, 22, 23, 24, 25];
/// Time the sensor capacitors are held high before each measurement.
pub const CHARGE_TIME_US: u64 = 10;
/// Give up on a line that has not discharged after this long (microseconds).
/// The unlatched line is reported with this value.
pub const ACQUISITION_TIMEOUT_US: u32 = 3000;
/// Threshold used until a calibration has been completed (microseconds).
pub const DEFAULT_THRESHOLD_US: u32 = 800;

// ** MOTOR CONFIGURATION ** //

/// Hardware PWM runs both motors at 1 kHz (1 ms period).
pub const MOTOR_PWM_FREQUENCY_HZ: f64 = 1000.0;
/// Direction-sense outputs of the H-bridge. Held low: forward only.
pub const GPIO_RIGHT_MOTOR_DIR: u8 = 5;
pub const GPIO_LEFT_MOTOR_DIR: u8 = 6;

/// Number of control cycles spent in the strong correction band.
pub const STRONG_PHASE_CYCLES: u32 = 40;
/// Length of a full strong + weak correction period.
pub const CORRECTION_PERIOD_CYCLES: u32 = 50;

// ** CALIBRATION CONFIGURATION ** //

/// Push button that steps through calibration.
pub const GPIO_CALIBRATION_BUTTON: u8 = 26;
/// Edges closer together than this are treated as one press.
pub const BUTTON_DEAD_TIME: Duration = Duration::from_secs(1);
/// Pause between a completed calibration and the robot driving off.
pub const LAUNCH_DELAY: Duration = Duration::from_secs(2);

// ** MAIN CONFIGURATION ** //

/// Idle sleep of the main loop while waiting for calibration presses.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Tunables of the line follower. `Default` reproduces the constants above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFollowerConfig {
    pub default_threshold_us: u32,
    /// `None` waits forever for every line to discharge.
    pub acquisition_timeout_us: Option<u32>,
    pub classifier_mode: ClassifierMode,
    pub profile: CorrectionProfile,
    pub launch_delay: Duration,
}

impl Default for LineFollowerConfig {
    fn default() -> Self {
        Self {
            default_threshold_us: DEFAULT_THRESHOLD_US,
            acquisition_timeout_us: Some(ACQUISITION_TIMEOUT_US),
            classifier_mode: ClassifierMode::Pairwise,
            profile: CorrectionProfile::SHARP,
            launch_delay: LAUNCH_DELAY,
        }
    }
}

impl LineFollowerConfig {
    /// Applies the robot binary's command line flags.
    pub fn from_args<I, S>(args: I) -> (Self, bool)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut skip_calibration = false;

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--skip-calibration" {
                skip_calibration = true;
            } else if !config.apply_flag(arg) {
                warn!("Ignoring unknown argument {:?}", arg);
            }
        }

        (config, skip_calibration)
    }

    /// Returns false for flags this config does not know.
    fn apply_flag(&mut self, flag: &str) -> bool {
        match flag {
            "--strict" => self.classifier_mode = ClassifierMode::StrictMask,
            "--cruise" => self.profile = CorrectionProfile::CRUISE,
            "--no-timeout" => self.acquisition_timeout_us = None,
            _ => return false,
        }
        true
    }
}
