// File-based logging: every `log` record goes to stderr and to a timestamped log file.
//
// Creates a new log file on every launch:
//   <data dir>/com.portfolio.app/logs/portfolio-2026-03-01_14-30-00.log
//
// Keeps the most recent files only (settings.logging.keep_files).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

const LOG_PREFIX: &str = "portfolio-";
const LOG_EXTENSION: &str = "log";

/// Initialize logging. Call once at startup; later calls are ignored.
///
/// `level` uses env_logger filter syntax (`info`, `debug`,
/// `portfolio_app_lib=trace`). If the log file cannot be set up, logging
/// still goes to stderr.
pub fn init(logs_dir: &Path, level: &str, keep_files: usize) {
    INIT.call_once(|| {
        if let Err(e) = setup_logging(logs_dir, level, keep_files) {
            let _ = env_logger::Builder::new()
                .parse_filters(level)
                .format(format_record)
                .try_init();
            log::warn!("Logging: Failed to initialize file logging: {}", e);
        }
    });
}

fn setup_logging(
    logs_dir: &Path,
    level: &str,
    keep_files: usize,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(logs_dir)?;

    // Make room for the file created below.
    rotate_logs(logs_dir, keep_files.saturating_sub(1))?;

    let log_file_path = logs_dir.join(log_file_name(&chrono::Local::now()));
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    env_logger::Builder::new()
        .parse_filters(level)
        .format(format_record)
        .target(env_logger::Target::Pipe(Box::new(TeeWriter {
            stderr: io::stderr(),
            file: log_file,
        })))
        .try_init()?;

    log::info!("Logging: Writing to {}", log_file_path.display());
    Ok(log_file_path)
}

fn format_record(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> io::Result<()> {
    writeln!(
        buf,
        "[{}] {:<5} {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

/// `portfolio-YYYY-MM-DD_HH-MM-SS.log`; names sort in creation order.
fn log_file_name<Tz>(now: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}.{}",
        LOG_PREFIX,
        now.format("%Y-%m-%d_%H-%M-%S"),
        LOG_EXTENSION
    )
}

/// Writes every line to the terminal and the log file.
struct TeeWriter {
    stderr: io::Stderr,
    file: fs::File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = self.stderr.write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = self.stderr.flush();
        self.file.flush()
    }
}

/// Delete old log files, keeping the most recent `keep` files.
///
/// Only files named like `portfolio-*.log` are considered.
fn rotate_logs(logs_dir: &Path, keep: usize) -> Result<(), io::Error> {
    let mut log_files: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(logs_dir)? {
        let path = entry?.path();
        let is_ours = path.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION)
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(LOG_PREFIX))
                .unwrap_or(false);
        if is_ours {
            log_files.push(path);
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

    for path in log_files.iter().skip(keep) {
        log::debug!("Logging: Removing old log {}", path.display());
        let _ = fs::remove_file(path);
    }

    Ok(())
}

/// Get the logs directory path.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("com.portfolio.app").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name_format() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 0).unwrap();
        assert_eq!(log_file_name(&at), "portfolio-2026-03-01_14-30-00.log");
    }

    #[test]
    fn test_rotate_logs_keeps_newest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let names = [
            "portfolio-2026-01-01_10-00-00.log",
            "portfolio-2026-01-02_10-00-00.log",
            "portfolio-2026-01-03_10-00-00.log",
            "portfolio-2026-01-04_10-00-00.log",
        ];
        for name in &names {
            fs::write(temp_dir.path().join(name), b"line\n").unwrap();
        }
        fs::write(temp_dir.path().join("notes.txt"), b"keep me").unwrap();
        fs::write(temp_dir.path().join("other-2020.log"), b"keep me").unwrap();

        rotate_logs(temp_dir.path(), 2).unwrap();

        assert!(!temp_dir.path().join(names[0]).exists());
        assert!(!temp_dir.path().join(names[1]).exists());
        assert!(temp_dir.path().join(names[2]).exists());
        assert!(temp_dir.path().join(names[3]).exists());
        assert!(temp_dir.path().join("notes.txt").exists());
        assert!(temp_dir.path().join("other-2020.log").exists());
    }

    #[test]
    fn test_tee_writer_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tee.log");
        let mut tee = TeeWriter {
            stderr: io::stderr(),
            file: fs::File::create(&path).unwrap(),
        };

        tee.write_all(b"hello\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
