use std::thread;

use log::{error, info, warn};

use linebot::button::CalibrationButton;
use linebot::calibration::PressOutcome;
use linebot::config::{IDLE_POLL_INTERVAL, LineFollowerConfig};
use linebot::logger;
use linebot::motor_driver::MotorDriver;
use linebot::sensors::SensorBank;
use linebot::LineFollower;

// Usage:
//  linebot                     calibrate with the button, then follow the line
//  linebot --skip-calibration  follow the line straight away on the default threshold
//  linebot --strict            every sensor must match a pattern before steering changes
//  linebot --cruise            faster, gentler correction profile
//  linebot --no-timeout        wait forever for every sensor to discharge
//
// Calibration: 1st press over the track surface, 2nd press over the line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init(logger::level_from_env())?;

    let (config, skip_calibration) = LineFollowerConfig::from_args(std::env::args().skip(1));
    info!("Starting line follower: {:?}", config.classifier_mode);

    let mut sensors = SensorBank::new(config.acquisition_timeout_us)?;
    match sensors.timeout_us() {
        Some(timeout) => info!("Sensor acquisition gives up after {}us", timeout),
        None => warn!("Sensor acquisition has no timeout, a dead sensor stalls the robot"),
    }
    let mut motors = MotorDriver::new()?;

    let mut follower = if skip_calibration {
        info!(
            "Calibration skipped, using default threshold {}us",
            config.default_threshold_us
        );
        LineFollower::uncalibrated(&config)?
    } else {
        LineFollower::new(&config)?
    };

    if !follower.is_ready() {
        let button = CalibrationButton::new()?;
        info!("Place the robot over the track surface and press the button");

        while !follower.is_ready() {
            for _ in 0..button.take_presses() {
                match follower.handle_press(|| sensors.acquire()) {
                    PressOutcome::BlackRecorded { .. } => {
                        info!("Now place the robot over the line and press again")
                    }
                    PressOutcome::ThresholdSet { threshold_us } => {
                        info!("Calibrated, threshold {}us", threshold_us)
                    }
                    PressOutcome::Rejected => {
                        warn!("Line sample rejected, press again over the line")
                    }
                    PressOutcome::Ignored => {}
                }
            }
            thread::sleep(IDLE_POLL_INTERVAL);
        }

        let state = follower.calibration().state();
        info!(
            "Track {:?}us, line {:?}us, starting in {:?}",
            state.min_time_us, state.max_time_us, config.launch_delay
        );
        thread::sleep(config.launch_delay);
    }

    info!("Main control loop started.");
    loop {
        let reading = sensors.acquire();
        let (_, command) = follower.follow_line(&reading);

        if let Err(e) = motors.set_duty_cycle(command) {
            error!("Failed to update motors: {}", e);
            motors.stop()?;
            return Err(e.into());
        }
    }
}
