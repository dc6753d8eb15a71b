//! Session log for the editing engine.
//!
//! The library reports saves, loads and sheet work through `log_info!`,
//! `log_warn!` and `log_err!`. Nothing is written until a host installs a
//! sink with [`init`] or [`init_at`]; embedding the crate without a log is
//! the default.
//!
//! Each session truncates its file. The default file is
//! `<data dir>/PixelForge/pixelforge.log`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a log line. Lines below the sink's minimum level are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

struct LogSink {
    file: Mutex<File>,
    path: PathBuf,
    min_level: Level,
}

static SINK: OnceLock<LogSink> = OnceLock::new();

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*));
    };
}

/// Open the session log at the platform default location.
pub fn init(min_level: Level) -> io::Result<PathBuf> {
    let path = default_log_path();
    init_at(&path, min_level)?;
    Ok(path)
}

/// Open (truncate) `path` as the session log. A second call is a no-op:
/// the first sink stays installed for the life of the process.
pub fn init_at(path: &Path, min_level: Level) -> io::Result<()> {
    if SINK.get().is_some() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let _ = SINK.set(LogSink {
        file: Mutex::new(file),
        path: path.to_path_buf(),
        min_level,
    });
    write_line(&format!(
        "=== PixelForge session started (unix {}) ===",
        unix_seconds().unwrap_or(0)
    ));
    Ok(())
}

/// Mirror panics into the log before the previous hook runs.
pub fn install_panic_hook() {
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write_line(&format!("[{}] [PANIC] {}", timestamp(), info));
        prev(info);
    }));
}

/// Path of the installed log, if any.
pub fn log_path() -> Option<&'static Path> {
    SINK.get().map(|s| s.path.as_path())
}

pub fn is_enabled(level: Level) -> bool {
    SINK.get().is_some_and(|s| level >= s.min_level)
}

/// Write a timestamped, level-tagged line. I/O errors are ignored.
pub fn write(level: Level, msg: &str) {
    if !is_enabled(level) {
        return;
    }
    write_line(&format!("[{}] [{}] {}", timestamp(), level.as_str(), msg));
}

fn write_line(line: &str) {
    if let Some(sink) = SINK.get()
        && let Ok(mut file) = sink.file.lock()
    {
        let _ = writeln!(file, "{}", line);
    }
}

fn default_log_path() -> PathBuf {
    data_dir().join("PixelForge").join("pixelforge.log")
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library").join("Application Support");
        }
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn unix_seconds() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

/// HH:MM:SS (UTC).
fn timestamp() -> String {
    match unix_seconds() {
        Some(secs) => format!(
            "{:02}:{:02}:{:02}",
            (secs % 86400) / 3600,
            (secs % 3600) / 60,
            secs % 60
        ),
        None => "??:??:??".to_string(),
    }
}
