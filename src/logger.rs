//! Console logger for the robot binaries.
//!
//! Implements the [`log`] facade and writes one line per record to stderr:
//!
//! ```text
//! INFO [1m 12s 40ms] linebot::calibration - Line sample recorded: slowest discharge 130us, threshold set to 512us
//! ```
//!
//! The level comes from the `LINEBOT_LOG` environment variable
//! (`error`, `warn`, `info`, `debug` or `trace`), `info` when unset.

use std::io::Write;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use humantime::format_duration;
use log::{LevelFilter, Metadata, Record};

use crate::error::Result;

pub const LOG_LEVEL_ENV: &str = "LINEBOT_LOG";

pub struct LineBotLogger {
    started: Instant,
}

impl log::Log for LineBotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_line(record, self.started.elapsed());
            let _ = std::io::stderr().lock().write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<LineBotLogger> = OnceLock::new();

/// Installs the logger. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<()> {
    let logger = LOGGER.get_or_init(|| LineBotLogger {
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Reads the level from `LINEBOT_LOG`.
pub fn level_from_env() -> LevelFilter {
    parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref())
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn format_line(record: &Record, uptime: Duration) -> String {
    // millisecond resolution keeps the lines short
    let uptime = Duration::from_millis(uptime.as_millis() as u64);
    format!(
        "{} [{}] {} - {}\n",
        record.level(),
        format_duration(uptime),
        record.target(),
        record.args()
    )
}
