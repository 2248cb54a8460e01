use log::{Level, Log, Metadata, Record};

/// Writes records to stderr, leaving stdout to the tool's own output.
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error | Level::Warn => {
                eprintln!("{:<5} {}", record.level(), record.args())
            }
            _ => eprintln!("{:<5} [{}] {}", record.level(), record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}
