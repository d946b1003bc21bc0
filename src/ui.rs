use std::fmt::Display;

use log::{Level, LevelFilter, Log, SetLoggerError};

static LOGGER: Logger = Logger;

/// Prints log records to stderr, keeping stdout free for command output.
pub struct Logger;

impl Logger {
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }

    fn prefix(level: Level) -> impl Display {
        match level {
            Level::Trace => console::style(".").bold().white(),
            Level::Debug => console::style("?").bold().cyan(),
            Level::Info => console::style(">").bold().blue(),
            Level::Warn => console::style("!").bold().yellow(),
            Level::Error => console::style("X").bold().red(),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("{}", record.args());
        let mut lines = message.lines();

        if let Some(line) = lines.next() {
            eprintln!("{} {line}", Self::prefix(record.level()));
        }

        for line in lines {
            eprintln!("  {line}");
        }
    }

    fn flush(&self) {}
}
