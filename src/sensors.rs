//! RC-timing acquisition of the six line sensors.
//!
//! Each photoresistor sits in an RC network on a GPIO line. A measurement
//! charges every capacitor by driving the lines high, flips the lines to
//! inputs and times how long each one takes to fall to a logic low. Light
//! surfaces discharge faster than dark ones.

use std::fmt;
use std::time::{Duration, Instant};

use log::{trace, warn};

use crate::config::{CHARGE_TIME_US, SENSOR_COUNT, SENSOR_PINS};
use crate::error::Result;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, IoPin, Level, Mode};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_gpio::{Gpio, IoPin, Level, Mode};

/// Discharge times of one acquisition cycle in microseconds, leftmost sensor first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorReading {
    times_us: [u32; SENSOR_COUNT],
    timed_out: u8,
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, time) in self.times_us.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{time}us")?;
            if self.is_timed_out(i) {
                write!(f, "*")?;
            }
        }
        write!(f, "]")
    }
}

impl SensorReading {
    pub fn new(times_us: [u32; SENSOR_COUNT]) -> Self {
        Self {
            times_us,
            timed_out: 0,
        }
    }

    pub fn times_us(&self) -> &[u32; SENSOR_COUNT] {
        &self.times_us
    }

    pub fn get(&self, sensor: usize) -> u32 {
        self.times_us[sensor]
    }

    pub fn min(&self) -> u32 {
        self.times_us.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> u32 {
        self.times_us.iter().copied().max().unwrap_or(0)
    }

    /// Strictly faster than the threshold, i.e. over the line.
    pub fn is_below(&self, sensor: usize, threshold: u32) -> bool {
        self.times_us[sensor] < threshold
    }

    /// Bit `i` is set when sensor `i` is below the threshold.
    pub fn line_mask(&self, threshold: u32) -> u8 {
        (0..SENSOR_COUNT)
            .filter(|&i| self.is_below(i, threshold))
            .fold(0, |mask, i| mask | (1 << i))
    }

    /// Whether the sensor was given the timeout value instead of a measurement.
    pub fn is_timed_out(&self, sensor: usize) -> bool {
        self.timed_out & (1 << sensor) != 0
    }

    pub fn timed_out_sensors(&self) -> Vec<usize> {
        (0..SENSOR_COUNT).filter(|&i| self.is_timed_out(i)).collect()
    }
}

/// Scans the lines until every one of them has discharged.
///
/// `is_discharged(i)` samples line `i`; `elapsed_us()` reads the timer started
/// when the lines were released. With `timeout_us` set, lines still high once
/// the timer reaches the limit are reported with the limit itself and flagged
/// as timed out. Without it the loop spins until every line has fallen.
pub fn latch_discharge_times<R, C>(
    mut is_discharged: R,
    mut elapsed_us: C,
    timeout_us: Option<u32>,
) -> SensorReading
where
    R: FnMut(usize) -> bool,
    C: FnMut() -> u32,
{
    let mut times_us = [0u32; SENSOR_COUNT];
    let mut latched = [false; SENSOR_COUNT];
    let mut remaining = SENSOR_COUNT;
    let mut timed_out = 0u8;

    while remaining > 0 {
        for (i, (time, done)) in times_us.iter_mut().zip(latched.iter_mut()).enumerate() {
            if !*done && is_discharged(i) {
                *time = elapsed_us();
                *done = true;
                remaining -= 1;
            }
        }

        if let Some(limit) = timeout_us
            && remaining > 0
            && elapsed_us() >= limit
        {
            for (i, (time, done)) in times_us.iter_mut().zip(latched.iter()).enumerate() {
                if !*done {
                    *time = limit;
                    timed_out |= 1 << i;
                }
            }
            break;
        }
    }

    SensorReading {
        times_us,
        timed_out,
    }
}

/// The six sensor lines, switched between output and input on every cycle.
pub struct SensorBank {
    pins: Vec<IoPin>,
    timeout_us: Option<u32>,
}

impl SensorBank {
    pub fn new(timeout_us: Option<u32>) -> Result<Self> {
        Self::with_pins(SENSOR_PINS, timeout_us)
    }

    pub fn with_pins(pins: [u8; SENSOR_COUNT], timeout_us: Option<u32>) -> Result<Self> {
        let gpio = Gpio::new()?;

        let mut lines = Vec::with_capacity(SENSOR_COUNT);
        for pin in pins {
            lines.push(gpio.get(pin)?.into_io(Mode::Input));
        }

        Ok(Self {
            pins: lines,
            timeout_us,
        })
    }

    pub fn timeout_us(&self) -> Option<u32> {
        self.timeout_us
    }

    /// Runs one full charge/discharge cycle. Blocks until every line has
    /// discharged or the timeout expires.
    pub fn acquire(&mut self) -> SensorReading {
        self.charge();
        self.release();

        let start = Instant::now();
        let pins = &self.pins;
        let reading = latch_discharge_times(
            |i| pins[i].read() == Level::Low,
            || u32::try_from(start.elapsed().as_micros()).unwrap_or(u32::MAX),
            self.timeout_us,
        );

        if reading.timed_out != 0 {
            warn!(
                "Sensors {:?} did not discharge within {}us",
                reading.timed_out_sensors(),
                reading.max()
            );
        }
        trace!("Discharge times: {}", reading);

        reading
    }

    fn charge(&mut self) {
        for pin in self.pins.iter_mut() {
            pin.set_mode(Mode::Output);
            pin.set_high();
        }

        // sleep() overshoots by tens of microseconds on Linux, so spin instead
        let charge_time = Duration::from_micros(CHARGE_TIME_US);
        let start = Instant::now();
        while start.elapsed() < charge_time {
            std::hint::spin_loop();
        }
    }

    fn release(&mut self) {
        for pin in self.pins.iter_mut() {
            pin.set_mode(Mode::Input);
        }
    }
}
