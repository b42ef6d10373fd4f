//! Explicit diagnostic sink.
//!
//! The pipeline never reaches for a process-wide logger. Callers hand it any
//! [`log::Log`] implementation (an `env_logger::Logger`, `log::logger()`, or a
//! capturing logger in tests) wrapped in [`Diagnostics`].

use std::fmt;

use log::{Level, Log, Record};

pub const TARGET: &str = "tempconv";

#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
    logger: &'a dyn Log,
}

impl<'a> Diagnostics<'a> {
    pub fn new(logger: &'a dyn Log) -> Self {
        Self { logger }
    }

    /// Routes through whatever logger is installed globally, if any.
    pub fn global() -> Diagnostics<'static> {
        Diagnostics::new(log::logger())
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let record = Record::builder()
            .args(args)
            .level(level)
            .target(TARGET)
            .module_path_static(Some(module_path!()))
            .build();
        if self.logger.enabled(record.metadata()) {
            self.logger.log(&record);
        }
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn flush(&self) {
        self.logger.flush();
    }
}

impl fmt::Debug for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}
