use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::{self, Write};

static LOGGER: Logger = Logger;

/// Writes `[<level>] <message>` records to standard error.
pub struct Logger;

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

fn level_char(level: Level) -> char {
    match level {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => '*',
        Level::Debug => 'D',
        Level::Trace => 'T',
    }
}

fn write_record(out: &mut dyn Write, record: &Record) -> io::Result<()> {
    writeln!(out, "[{}] {}", level_char(record.level()), record.args())
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Nowhere left to report a failing stderr.
            let _ = write_record(&mut io::stderr().lock(), record);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
