//! Turns six discharge times into a discrete steering decision.

use crate::sensors::SensorReading;

/// Steering decision. Negative offsets steer left, positive steer right,
/// the magnitude is how hard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    HardLeft,
    Left,
    SlightLeft,
    #[default]
    Straight,
    SlightRight,
    Right,
    HardRight,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:+})", self.name(), self.offset())
    }
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::HardLeft,
        Direction::Left,
        Direction::SlightLeft,
        Direction::Straight,
        Direction::SlightRight,
        Direction::Right,
        Direction::HardRight,
    ];

    pub fn name(&self) -> &str {
        match self {
            Direction::HardLeft => "hard left",
            Direction::Left => "left",
            Direction::SlightLeft => "slight left",
            Direction::Straight => "straight",
            Direction::SlightRight => "slight right",
            Direction::Right => "right",
            Direction::HardRight => "hard right",
        }
    }

    /// Signed severity in -3..=3.
    pub fn offset(&self) -> i8 {
        match self {
            Direction::HardLeft => -3,
            Direction::Left => -2,
            Direction::SlightLeft => -1,
            Direction::Straight => 0,
            Direction::SlightRight => 1,
            Direction::Right => 2,
            Direction::HardRight => 3,
        }
    }

    pub fn from_offset(offset: i8) -> Option<Self> {
        match offset {
            -3 => Some(Direction::HardLeft),
            -2 => Some(Direction::Left),
            -1 => Some(Direction::SlightLeft),
            0 => Some(Direction::Straight),
            1 => Some(Direction::SlightRight),
            2 => Some(Direction::Right),
            3 => Some(Direction::HardRight),
            _ => None,
        }
    }

    /// Position in [`Direction::ALL`], used to index duty tables.
    pub fn index(&self) -> usize {
        (self.offset() + 3) as usize
    }
}

/// Which rule set the classifier evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClassifierMode {
    /// Looks at a sensor and its neighbours only; far sensors are ignored.
    #[default]
    Pairwise,
    /// All six sensors must match the pattern exactly.
    StrictMask,
}

/// One classification rule. The rule matches when the sensors selected by
/// `care` are below threshold exactly where `line` has a bit set.
#[derive(Clone, Copy, Debug)]
struct Rule {
    care: u8,
    line: u8,
    direction: Direction,
}

const fn bits(sensors: &[usize]) -> u8 {
    let mut mask = 0;
    let mut i = 0;
    while i < sensors.len() {
        mask |= 1 << sensors[i];
        i += 1;
    }
    mask
}

const fn rule(care: &[usize], line: &[usize], direction: Direction) -> Rule {
    Rule {
        care: bits(care),
        line: bits(line),
        direction,
    }
}

// Evaluated in order, first match wins.
const PAIRWISE_RULES: [Rule; 7] = [
    rule(&[2, 3], &[2, 3], Direction::Straight),
    rule(&[1, 2], &[2], Direction::SlightLeft),
    rule(&[0, 1, 2], &[1], Direction::Left),
    rule(&[0, 1], &[0], Direction::HardLeft),
    rule(&[3, 4], &[3], Direction::SlightRight),
    rule(&[3, 4, 5], &[4], Direction::Right),
    rule(&[4, 5], &[5], Direction::HardRight),
];

const ALL_SENSORS: &[usize] = &[0, 1, 2, 3, 4, 5];

const STRICT_RULES: [Rule; 7] = [
    rule(ALL_SENSORS, &[2, 3], Direction::Straight),
    rule(ALL_SENSORS, &[2], Direction::SlightLeft),
    rule(ALL_SENSORS, &[1], Direction::Left),
    rule(ALL_SENSORS, &[0], Direction::HardLeft),
    rule(ALL_SENSORS, &[3], Direction::SlightRight),
    rule(ALL_SENSORS, &[4], Direction::Right),
    rule(ALL_SENSORS, &[5], Direction::HardRight),
];

/// Classifies readings and remembers the last decision, which is returned
/// again whenever no rule matches (for example with every sensor off the line).
#[derive(Debug, Clone)]
pub struct DirectionClassifier {
    mode: ClassifierMode,
    last: Direction,
}

impl DirectionClassifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self {
            mode,
            last: Direction::Straight,
        }
    }

    pub fn last_direction(&self) -> Direction {
        self.last
    }

    pub fn classify(&mut self, reading: &SensorReading, threshold: u32) -> Direction {
        let mask = reading.line_mask(threshold);
        let rules: &[Rule] = match self.mode {
            ClassifierMode::Pairwise => &PAIRWISE_RULES,
            ClassifierMode::StrictMask => &STRICT_RULES,
        };

        if let Some(rule) = rules.iter().find(|r| mask & r.care == r.line) {
            self.last = rule.direction;
        }
        self.last
    }
}
