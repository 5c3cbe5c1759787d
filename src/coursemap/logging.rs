//! Logging bootstrap for the binary.
//!
//! The library only talks to the `log` facade. Messages use an
//! `event=<name> module=<area> key=value` layout so they can be grepped.
//! `init_logging` starts `flexi_logger` on stderr once per process; later calls
//! are no-ops. `RUST_LOG`, when set, wins over the verbosity flag.

use crate::error::{CourseMapError, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use std::sync::OnceLock;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Log level for a `-v` count: warn, then info, then debug.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init_logging(verbosity: u8) -> Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let level = level_for(verbosity);
    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| CourseMapError::Logging(format!("invalid log level `{}`: {}", level, err)))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| CourseMapError::Logging(format!("failed to start logger: {}", err)))?;

    // A concurrent caller may have won the race; its handle is kept.
    let _ = LOGGER.set(handle);
    debug!("event=logging_ready module=logging level={}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(0).unwrap();
        init_logging(2).unwrap();
        assert!(LOGGER.get().is_some());
    }
}
