//! Two-stage steering correction.
//!
//! Every correction period starts with a strong band, where the inner wheel
//! slows sharply to pull the robot back over the line, followed by a short
//! weak band with gentler duty cycles that lets the chassis settle instead of
//! overshooting. The band in force is chosen by a cycle counter owned by the
//! controller.

use std::fmt;

use crate::config::{CORRECTION_PERIOD_CYCLES, STRONG_PHASE_CYCLES};
use crate::direction::Direction;
use crate::error::{LineBotError, Result};

/// Duty cycles handed to the motor driver for one control cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L {:.2} / R {:.2}", self.left, self.right)
    }
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand {
        left: 0.0,
        right: 0.0,
    };

    /// Builds a command with both duties clamped to 0.0..=1.0.
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
        }
    }
}

/// Which duty table the current cycle uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Strong,
    Weak,
}

/// Position inside the strong/weak correction period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrectionPhase {
    cycle: u32,
}

impl CorrectionPhase {
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn band(&self) -> Band {
        if self.cycle < STRONG_PHASE_CYCLES {
            Band::Strong
        } else {
            Band::Weak
        }
    }

    fn advance(&mut self) {
        self.cycle += 1;
        if self.cycle >= CORRECTION_PERIOD_CYCLES {
            self.cycle = 0;
        }
    }
}

/// `(left, right)` duty per direction, hard left first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandTable([(f64, f64); 7]);

impl BandTable {
    pub const fn new(duties: [(f64, f64); 7]) -> Self {
        Self(duties)
    }

    pub fn command(&self, direction: Direction) -> MotorCommand {
        let (left, right) = self.0[direction.index()];
        MotorCommand::new(left, right)
    }

    fn validate(&self) -> Result<()> {
        for (direction, (left, right)) in Direction::ALL.iter().zip(self.0.iter()) {
            for duty in [*left, *right] {
                if !(0.0..=1.0).contains(&duty) {
                    return Err(LineBotError::InvalidDutyCycle {
                        direction: direction.offset(),
                        duty,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Strong and weak duty tables for one robot tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectionProfile {
    pub strong: BandTable,
    pub weak: BandTable,
}

impl CorrectionProfile {
    /// Tuned for the bare chassis: the inner wheel stops on the sharpest turns.
    pub const SHARP: CorrectionProfile = CorrectionProfile {
        strong: BandTable::new([
            (0.0, 0.4),
            (0.1, 0.5),
            (0.4, 0.7),
            (0.6, 0.6),
            (0.7, 0.4),
            (0.5, 0.1),
            (0.4, 0.0),
        ]),
        weak: BandTable::new([
            (0.2, 0.5),
            (0.2, 0.6),
            (0.6, 0.7),
            (0.6, 0.6),
            (0.7, 0.6),
            (0.6, 0.2),
            (0.5, 0.2),
        ]),
    };

    /// Faster base speed with gentle corrections, used with a calibrated threshold.
    pub const CRUISE: CorrectionProfile = CorrectionProfile {
        strong: BandTable::new([
            (0.4, 0.8),
            (0.5, 0.8),
            (0.7, 0.8),
            (0.8, 0.8),
            (0.8, 0.7),
            (0.8, 0.5),
            (0.8, 0.4),
        ]),
        weak: BandTable::new([
            (0.65, 0.8),
            (0.7, 0.8),
            (0.75, 0.8),
            (0.8, 0.8),
            (0.8, 0.75),
            (0.8, 0.7),
            (0.8, 0.65),
        ]),
    };

    pub fn table(&self, band: Band) -> &BandTable {
        match band {
            Band::Strong => &self.strong,
            Band::Weak => &self.weak,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.strong.validate()?;
        self.weak.validate()
    }
}

impl Default for CorrectionProfile {
    fn default() -> Self {
        Self::SHARP
    }
}

pub struct MotorCorrectionController {
    profile: CorrectionProfile,
    phase: CorrectionPhase,
}

impl MotorCorrectionController {
    pub fn new(profile: CorrectionProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            profile,
            phase: CorrectionPhase::default(),
        })
    }

    pub fn phase(&self) -> CorrectionPhase {
        self.phase
    }

    /// Picks the duty pair for `direction` from the current band, then
    /// advances the phase.
    pub fn step(&mut self, direction: Direction) -> MotorCommand {
        let command = self.profile.table(self.phase.band()).command(direction);
        self.phase.advance();
        command
    }
}
