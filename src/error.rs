use thiserror::Error;

pub type Result<T, E = LineBotError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LineBotError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// The line sample is not faster than the background sample, so no
    /// threshold can separate them.
    #[error(
        "degenerate calibration: slowest line reading {max_time_us}us is not below fastest background reading {min_time_us}us"
    )]
    DegenerateCalibration { min_time_us: u32, max_time_us: u32 },

    #[error("line sample taken before a track sample")]
    MissingTrackSample,

    #[error("duty cycle {duty} for direction {direction} is outside 0.0..=1.0")]
    InvalidDutyCycle { direction: i8, duty: f64 },
}
