//! Minimal `log` backend writing `[LEVEL] message` lines to stderr

use std::io::Write;
use std::sync::Mutex;

use log::{LevelFilter, Log};

pub static LOGGER: StderrLogger = StderrLogger::new();

pub struct StderrLogger {
    lock: Mutex<()>,
}

impl StderrLogger {
    const fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // keep lines from different threads whole
        let _guard = self.lock.lock();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{}] {}",
            record.level().as_str(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger; later calls only change the level
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Map `-v`/`-q` counts onto a level, `Info` being the default
pub fn level_from_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
