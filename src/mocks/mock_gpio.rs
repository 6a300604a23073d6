// This file is only compiled during tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    RisingEdge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub trigger: Trigger,
}

type Callback = Box<dyn FnMut(Event) + Send + 'static>;

thread_local! {
    static MOCK_PINS: RefCell<HashMap<u8, Level>> = RefCell::new(HashMap::new());
    static MOCK_MODES: RefCell<HashMap<u8, Mode>> = RefCell::new(HashMap::new());
    // reads a released line stays high for; None never falls
    static MOCK_DISCHARGE: RefCell<HashMap<u8, Option<u32>>> = RefCell::new(HashMap::new());
    static MOCK_CHARGES: RefCell<HashMap<u8, u32>> = RefCell::new(HashMap::new());
    // mode each line was in when it was last driven high
    static MOCK_CHARGE_MODES: RefCell<HashMap<u8, Mode>> = RefCell::new(HashMap::new());
    static MOCK_INTERRUPTS: RefCell<HashMap<u8, (Trigger, Option<Duration>, Callback)>> =
        RefCell::new(HashMap::new());
}

pub struct Gpio;

impl Gpio {
    pub fn new() -> Result<Self, rppal::gpio::Error> {
        Ok(Gpio)
    }

    pub fn get(&self, pin: u8) -> Result<Pin, rppal::gpio::Error> {
        Ok(Pin { pin })
    }
}

pub struct Pin {
    pin: u8,
}

impl Pin {
    pub fn into_input_pulldown(self) -> InputPin {
        MOCK_PINS.with(|pins| {
            pins.borrow_mut().insert(self.pin, Level::Low);
        });
        InputPin { pin: self.pin }
    }

    pub fn into_output_low(self) -> OutputPin {
        MOCK_PINS.with(|pins| {
            pins.borrow_mut().insert(self.pin, Level::Low);
        });
        OutputPin { _pin: self.pin }
    }

    pub fn into_io(self, mode: Mode) -> IoPin {
        MOCK_MODES.with(|modes| {
            modes.borrow_mut().insert(self.pin, mode);
        });
        IoPin {
            pin: self.pin,
            mode,
            reads: Cell::new(0),
        }
    }
}

pub struct InputPin {
    pin: u8,
}

impl InputPin {
    pub fn set_async_interrupt<C>(
        &mut self,
        trigger: Trigger,
        debounce: Option<Duration>,
        callback: C,
    ) -> Result<(), rppal::gpio::Error>
    where
        C: FnMut(Event) + Send + 'static,
    {
        MOCK_INTERRUPTS.with(|irqs| {
            irqs.borrow_mut()
                .insert(self.pin, (trigger, debounce, Box::new(callback)));
        });
        Ok(())
    }
}

pub struct OutputPin {
    _pin: u8,
}

pub struct IoPin {
    pin: u8,
    mode: Mode,
    reads: Cell<u32>,
}

impl IoPin {
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == Mode::Output && mode == Mode::Input {
            self.reads.set(0);
        }
        self.mode = mode;
        MOCK_MODES.with(|modes| {
            modes.borrow_mut().insert(self.pin, mode);
        });
    }

    pub fn set_high(&mut self) {
        MOCK_CHARGES.with(|charges| {
            *charges.borrow_mut().entry(self.pin).or_insert(0) += 1;
        });
        MOCK_CHARGE_MODES.with(|modes| {
            modes.borrow_mut().insert(self.pin, self.mode);
        });
    }

    pub fn read(&self) -> Level {
        let reads = self.reads.get();
        self.reads.set(reads + 1);

        let schedule = MOCK_DISCHARGE.with(|d| d.borrow().get(&self.pin).copied().unwrap_or(Some(0)));
        match schedule {
            Some(high_reads) if reads >= high_reads => Level::Low,
            _ => Level::High,
        }
    }
}

pub fn mock_pin_level(pin: u8) -> Option<Level> {
    MOCK_PINS.with(|pins| pins.borrow().get(&pin).copied())
}

pub fn mock_pin_mode(pin: u8) -> Option<Mode> {
    MOCK_MODES.with(|modes| modes.borrow().get(&pin).copied())
}

// test helper: how many reads a released sensor line stays high for
pub fn set_mock_discharge_reads(pin: u8, reads: Option<u32>) {
    MOCK_DISCHARGE.with(|d| {
        d.borrow_mut().insert(pin, reads);
    });
}

pub fn mock_charge_count(pin: u8) -> u32 {
    MOCK_CHARGES.with(|charges| charges.borrow().get(&pin).copied().unwrap_or(0))
}

pub fn mock_charge_mode(pin: u8) -> Option<Mode> {
    MOCK_CHARGE_MODES.with(|modes| modes.borrow().get(&pin).copied())
}

pub fn mock_interrupt_config(pin: u8) -> Option<(Trigger, Option<Duration>)> {
    MOCK_INTERRUPTS.with(|irqs| irqs.borrow().get(&pin).map(|(t, d, _)| (*t, *d)))
}

// test helper: fire the interrupt callback registered on a pin
pub fn trigger_mock_interrupt(pin: u8) {
    MOCK_INTERRUPTS.with(|irqs| {
        if let Some((trigger, _, callback)) = irqs.borrow_mut().get_mut(&pin) {
            callback(Event { trigger: *trigger });
        }
    });
}

// test helper to reset all pins
pub fn reset_mock_pins() {
    MOCK_PINS.with(|pins| pins.borrow_mut().clear());
    MOCK_MODES.with(|modes| modes.borrow_mut().clear());
    MOCK_DISCHARGE.with(|d| d.borrow_mut().clear());
    MOCK_CHARGES.with(|charges| charges.borrow_mut().clear());
    MOCK_CHARGE_MODES.with(|modes| modes.borrow_mut().clear());
    MOCK_INTERRUPTS.with(|irqs| irqs.borrow_mut().clear());
}
