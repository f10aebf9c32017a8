//! Logging backend for scratchpad
//!
//! Routes every `log::info!()` etc. to a debug file in the system temp
//! directory (`scratchpad_debug.log`), keeping stdout free for command
//! output. When `RUST_LOG` is set, records are mirrored to stderr too.
//!
//! Level precedence: `--log-level` on the command line, then `RUST_LOG`,
//! then the `log_level` config field (applied after config is loaded).

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use scratchpad_config::LogLevel;

const LOG_FILE_NAME: &str = "scratchpad_debug.log";

/// Set when the level came from the CLI or `RUST_LOG`; config may not lower it
static LEVEL_LOCKED: AtomicBool = AtomicBool::new(false);

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

struct DebugLogger {
    file: Mutex<Option<std::fs::File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(mirror_stderr: bool) -> Self {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();

        let logger = DebugLogger {
            file: Mutex::new(file),
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "\n{}\nscratchpad debug session started at {}\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&self, msg: &str) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &get_timestamp(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_line(timestamp: &str, level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", timestamp, level, target, msg)
}

/// Parse a `RUST_LOG`-style value. Only a bare level is understood; module
/// filters are ignored.
fn parse_env_level(value: &str) -> Option<LevelFilter> {
    let first = value.split(',').next()?.trim();
    let level = first.rsplit('=').next()?;
    LogLevel::from_name(level).map(LogLevel::to_level_filter)
}

/// Decide the startup level and whether config may override it later
fn resolve_level(cli: Option<LevelFilter>, env: Option<&str>) -> (LevelFilter, bool) {
    if let Some(level) = cli {
        return (level, true);
    }
    if let Some(level) = env.and_then(parse_env_level) {
        return (level, true);
    }
    (LevelFilter::Off, false)
}

/// Install the logger. Safe to call more than once; later calls only
/// adjust the level.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env = std::env::var("RUST_LOG").ok();
    let (level, locked) = resolve_level(cli_level, env.as_deref());

    let logger = LOGGER.get_or_init(|| DebugLogger::new(env.is_some()));
    if log::set_logger(logger).is_err() {
        // Another logger is already installed (e.g. in tests)
        return;
    }
    log::set_max_level(level);
    LEVEL_LOCKED.store(locked, Ordering::Relaxed);
}

/// Apply the level from config, unless the CLI or `RUST_LOG` already chose one
pub fn set_log_level(level: LevelFilter) {
    if LEVEL_LOCKED.load(Ordering::Relaxed) {
        log::debug!("Ignoring config log level {}: overridden at startup", level);
        return;
    }
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins() {
        assert_eq!(
            resolve_level(Some(LevelFilter::Warn), Some("trace")),
            (LevelFilter::Warn, true)
        );
    }

    #[test]
    fn env_level_used_without_cli() {
        assert_eq!(
            resolve_level(None, Some("debug")),
            (LevelFilter::Debug, true)
        );
        assert_eq!(
            resolve_level(None, Some("scratchpad=info,other=warn")),
            (LevelFilter::Info, true)
        );
    }

    #[test]
    fn env_level_accepts_config_aliases() {
        assert_eq!(
            resolve_level(None, Some("WARNING")),
            (LevelFilter::Warn, true)
        );
        assert_eq!(resolve_level(None, Some("none")), (LevelFilter::Off, true));
    }

    #[test]
    fn unparseable_env_leaves_config_in_charge() {
        assert_eq!(resolve_level(None, Some("loud")), (LevelFilter::Off, false));
        assert_eq!(resolve_level(None, None), (LevelFilter::Off, false));
    }

    #[test]
    fn line_format() {
        let line = format_line("12.000001", log::Level::Info, "scratchpad", "hello");
        assert_eq!(line, "[12.000001] [INFO ] [scratchpad] hello\n");
    }
}
