use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug)]
struct FileLogger {
    log_path: PathBuf,
    level: Level,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {} - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Routes the `log` macros to `<dir>/log.txt`. The terminal belongs to the UI,
/// so nothing is printed.
pub fn init(dir: PathBuf, debug_mode: bool) -> Result<()> {
    create_dir_all(&dir)?;

    let level = if debug_mode { Level::Debug } else { Level::Info };
    let logger = LOGGER.get_or_init(|| FileLogger {
        log_path: dir.join("log.txt"),
        level,
    });

    log::set_logger(logger)?;
    log::set_max_level(level_filter(logger.level));
    Ok(())
}

fn level_filter(level: Level) -> LevelFilter {
    match level {
        Level::Debug => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}
