use std::io::Write;
use std::time::Instant;

use anstyle::{AnsiColor, Reset, Style};
use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

struct CliLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    color: bool,
    start: Instant,
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.start.elapsed().as_secs_f64();
        let level = if self.color {
            let style = level_style(record.level());
            format!("{style}{}{Reset}", record.level())
        } else {
            record.level().to_string()
        };
        eprintln!(
            "[{elapsed:.3}s] [{level}] {} — {}",
            record.target(),
            record.args()
        );

        if let Some(ref file) = self.file {
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} — {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Parse a `RUST_LOG`-style level, falling back to `Warn`.
#[must_use]
pub fn parse_filter(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::LevelFilter::Warn)
}

/// Initialize the global logger. Must be called once before any logging.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>, color: bool) {
    let filter = parse_filter(std::env::var("RUST_LOG").ok().as_deref());

    let logger = CliLogger {
        file: log_file.map(Mutex::new),
        filter,
        color,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}

/// Style used for a level tag on stderr.
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Blue,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}
