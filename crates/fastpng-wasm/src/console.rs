//! `log` backend that writes to the browser console.
//!
//! fastpng-core reports every recoverable warning and fatal error through the
//! `log` facade. Installing this logger routes them to `console.warn` and
//! `console.error` so they show up next to the calling script's output.

use log::{Level, LevelFilter, Log, Metadata, Record};

const PREFIX: &str = "fastpng";

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_console(record.level(), &format_line(record));
    }

    fn flush(&self) {}
}

fn format_line(record: &Record) -> String {
    format!("{PREFIX}: {}", record.args())
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

// Native builds (tests) have no console to write to.
#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, _line: &str) {}

/// Install the console logger. Later calls, or a logger installed by the host
/// page, take precedence and leave it untouched.
pub(crate) fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_levels() {
        let logger = ConsoleLogger;
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_format_line() {
        let line = format_line(
            &Record::builder()
                .args(format_args!("ignoring 3 trailing bytes"))
                .level(Level::Warn)
                .build(),
        );
        assert_eq!(line, "fastpng: ignoring 3 trailing bytes");
    }

    #[test]
    fn test_install_twice_is_harmless() {
        install();
        install();
        log::warn!("still routed");
    }
}
