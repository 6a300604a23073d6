use log::{debug, trace};

use crate::calibration::{CalibrationController, PressOutcome};
use crate::config::LineFollowerConfig;
use crate::correction::{MotorCommand, MotorCorrectionController};
use crate::direction::{Direction, DirectionClassifier};
use crate::error::Result;
use crate::sensors::SensorReading;

/// All state carried from one control cycle to the next.
pub struct LineFollower {
    calibration: CalibrationController,
    classifier: DirectionClassifier,
    correction: MotorCorrectionController,
}

impl LineFollower {
    /// A follower that waits for the calibration presses before driving.
    pub fn new(config: &LineFollowerConfig) -> Result<Self> {
        Self::with_calibration(config, CalibrationController::new(config.default_threshold_us))
    }

    /// A follower that drives straight away on the default threshold.
    pub fn uncalibrated(config: &LineFollowerConfig) -> Result<Self> {
        Self::with_calibration(
            config,
            CalibrationController::skipped(config.default_threshold_us),
        )
    }

    fn with_calibration(
        config: &LineFollowerConfig,
        calibration: CalibrationController,
    ) -> Result<Self> {
        Ok(Self {
            calibration,
            classifier: DirectionClassifier::new(config.classifier_mode),
            correction: MotorCorrectionController::new(config.profile)?,
        })
    }

    pub fn calibration(&self) -> &CalibrationController {
        &self.calibration
    }

    pub fn is_ready(&self) -> bool {
        self.calibration.is_active()
    }

    pub fn threshold_us(&self) -> u32 {
        self.calibration.threshold_us()
    }

    pub fn handle_press<F>(&mut self, acquire: F) -> PressOutcome
    where
        F: FnOnce() -> SensorReading,
    {
        self.calibration.on_press(acquire)
    }

    /// One control cycle: classify the reading and pick the duty cycles.
    pub fn follow_line(&mut self, reading: &SensorReading) -> (Direction, MotorCommand) {
        let threshold = self.calibration.threshold_us();
        let direction = self.classifier.classify(reading, threshold);
        let band = self.correction.phase().band();
        let command = self.correction.step(direction);

        trace!("{} @ {}us -> {}", reading, threshold, direction);
        debug!("Steering {} ({:?} band): {}", direction, band, command);

        (direction, command)
    }
}
