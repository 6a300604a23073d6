// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pwm0,
    Pwm1,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Polarity {
    Normal,
}

thread_local! {
    static MOCK_PWM_DUTY: RefCell<HashMap<Channel, f64>> = RefCell::new(HashMap::new());
    static MOCK_PWM_ENABLED: RefCell<HashMap<Channel, bool>> = RefCell::new(HashMap::new());
    static MOCK_PWM_FREQUENCY: RefCell<HashMap<Channel, f64>> = RefCell::new(HashMap::new());
}

pub struct Pwm {
    channel: Channel,
}

impl Pwm {
    pub fn with_frequency(
        channel: Channel,
        frequency: f64,
        duty_cycle: f64,
        _polarity: Polarity,
        enabled: bool,
    ) -> Result<Self, rppal::pwm::Error> {
        MOCK_PWM_FREQUENCY.with(|f| f.borrow_mut().insert(channel, frequency));
        MOCK_PWM_DUTY.with(|d| d.borrow_mut().insert(channel, duty_cycle));
        MOCK_PWM_ENABLED.with(|e| e.borrow_mut().insert(channel, enabled));
        Ok(Pwm { channel })
    }

    pub fn set_duty_cycle(&self, duty_cycle: f64) -> Result<(), rppal::pwm::Error> {
        MOCK_PWM_DUTY.with(|d| {
            d.borrow_mut().insert(self.channel, duty_cycle);
        });
        Ok(())
    }

    pub fn disable(&self) -> Result<(), rppal::pwm::Error> {
        MOCK_PWM_ENABLED.with(|e| {
            e.borrow_mut().insert(self.channel, false);
        });
        Ok(())
    }
}

// Test helpers
pub fn get_mock_duty_cycle(channel: Channel) -> Option<f64> {
    MOCK_PWM_DUTY.with(|d| d.borrow().get(&channel).copied())
}

pub fn is_mock_enabled(channel: Channel) -> bool {
    MOCK_PWM_ENABLED.with(|e| e.borrow().get(&channel).copied().unwrap_or(false))
}

pub fn get_mock_frequency(channel: Channel) -> Option<f64> {
    MOCK_PWM_FREQUENCY.with(|f| f.borrow().get(&channel).copied())
}

pub fn reset_mock_pwm() {
    MOCK_PWM_DUTY.with(|d| d.borrow_mut().clear());
    MOCK_PWM_ENABLED.with(|e| e.borrow_mut().clear());
    MOCK_PWM_FREQUENCY.with(|f| f.borrow_mut().clear());
}
