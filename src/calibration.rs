//! Button-driven learning of the line/background threshold.
//!
//! First press: sample over the track surface and keep the fastest time.
//! Second press: sample over the line and keep the slowest time. The
//! threshold is the midpoint of the two.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{info, warn};

use crate::error::{LineBotError, Result};
use crate::sensors::SensorReading;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationStage {
    Idle,
    BlackRecorded,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationState {
    /// Fastest discharge seen over the track surface.
    pub min_time_us: Option<u32>,
    /// Slowest discharge seen over the line.
    pub max_time_us: Option<u32>,
    pub threshold_us: u32,
}

/// What a button press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    BlackRecorded { min_time_us: u32 },
    ThresholdSet { threshold_us: u32 },
    /// Line sample rejected; the previous threshold is still in force.
    Rejected,
    Ignored,
}

pub struct CalibrationController {
    stage: CalibrationStage,
    state: CalibrationState,
}

impl CalibrationController {
    pub fn new(default_threshold_us: u32) -> Self {
        Self {
            stage: CalibrationStage::Idle,
            state: CalibrationState {
                min_time_us: None,
                max_time_us: None,
                threshold_us: default_threshold_us,
            },
        }
    }

    /// A controller that starts out active with the default threshold.
    pub fn skipped(default_threshold_us: u32) -> Self {
        Self {
            stage: CalibrationStage::Active,
            ..Self::new(default_threshold_us)
        }
    }

    pub fn stage(&self) -> CalibrationStage {
        self.stage
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn threshold_us(&self) -> u32 {
        self.state.threshold_us
    }

    pub fn is_active(&self) -> bool {
        self.stage == CalibrationStage::Active
    }

    /// Stores the track-surface reference from a reading taken off the line.
    pub fn record_black(&mut self, reading: &SensorReading) -> u32 {
        warn_on_timeouts("track", reading);
        let min_time_us = reading.min();
        self.state.min_time_us = Some(min_time_us);
        self.stage = CalibrationStage::BlackRecorded;
        info!("Track sample recorded: fastest discharge {}us", min_time_us);
        min_time_us
    }

    /// Stores the line reference and derives the threshold.
    ///
    /// The slowest line reading has to be faster than the fastest track
    /// reading, otherwise the surfaces overlap and the sample is rejected.
    pub fn record_white(&mut self, reading: &SensorReading) -> Result<u32> {
        warn_on_timeouts("line", reading);
        let max_time_us = reading.max();
        let Some(min_time_us) = self.state.min_time_us else {
            return Err(LineBotError::MissingTrackSample);
        };

        if max_time_us >= min_time_us {
            return Err(LineBotError::DegenerateCalibration {
                min_time_us,
                max_time_us,
            });
        }

        let threshold_us = min_time_us.midpoint(max_time_us);
        self.state.max_time_us = Some(max_time_us);
        self.state.threshold_us = threshold_us;
        self.stage = CalibrationStage::Active;
        info!(
            "Line sample recorded: slowest discharge {}us, threshold set to {}us",
            max_time_us, threshold_us
        );
        Ok(threshold_us)
    }

    /// Handles one button press. `acquire` is only called when the press
    /// needs a sample.
    pub fn on_press<F>(&mut self, acquire: F) -> PressOutcome
    where
        F: FnOnce() -> SensorReading,
    {
        match self.stage {
            CalibrationStage::Idle => {
                let min_time_us = self.record_black(&acquire());
                PressOutcome::BlackRecorded { min_time_us }
            }
            CalibrationStage::BlackRecorded => match self.record_white(&acquire()) {
                Ok(threshold_us) => PressOutcome::ThresholdSet { threshold_us },
                Err(e) => {
                    warn!("{}; keeping threshold {}us", e, self.state.threshold_us);
                    PressOutcome::Rejected
                }
            },
            CalibrationStage::Active => PressOutcome::Ignored,
        }
    }
}

fn warn_on_timeouts(surface: &str, reading: &SensorReading) {
    let timed_out = reading.timed_out_sensors();
    if !timed_out.is_empty() {
        warn!(
            "Sensors {:?} timed out during the {} sample; their {}us carries no surface information",
            timed_out,
            surface,
            reading.max()
        );
    }
}

/// Press counter shared between the button interrupt and the control loop.
///
/// The interrupt side only increments; everything else happens when the
/// control loop drains the count.
#[derive(Clone, Debug, Default)]
pub struct PressLatch(Arc<AtomicU32>);

impl PressLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }

    /// Returns the presses since the last call and clears them.
    pub fn take(&self) -> u32 {
        self.0.swap(0, Ordering::Acquire)
    }

    pub fn pending(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}
