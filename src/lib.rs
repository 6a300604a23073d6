pub mod button;
pub mod calibration;
pub mod config;
pub mod correction;
pub mod direction;
pub mod error;
pub mod follower;
pub mod logger;
pub mod motor_driver;
pub mod sensors;

// Re-export commonly used types
pub use correction::MotorCommand;
pub use direction::Direction;
pub use error::LineBotError;
pub use follower::LineFollower;
pub use sensors::SensorReading;

#[cfg(test)]
pub(crate) mod mocks;
