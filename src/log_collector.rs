//! Decoupled logging pipeline.
//!
//! ```text
//! log::info!() / log_parsed!()
//!     |
//! [LogCollector] (log::Log impl, never blocks)
//!     | (crossbeam unbounded channel)
//!     v
//! [writer thread] ---> logs/full/<ts>_full.log      (every line)
//!                 ---> logs/parsed/<ts>_parsed.log  (target "parsed" only)
//!                 ---> optional UI sink (try_send, dropped when full)
//! ```
//!
//! The writer is an OS thread, so it works the same from inside or outside a
//! tokio runtime. `wait_for_empty` pushes a flush marker and waits for it.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log a high-level event on the `parsed` target.
#[macro_export]
macro_rules! log_parsed {
    ($($arg:tt)*) => {{
        log::info!(target: "parsed", $($arg)*);
    }}
}

/// Which file(s) a line ends up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogChannel {
    /// Full log only
    Full,
    /// Both the parsed and the full log
    Parsed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub channel: LogChannel,
    pub message: String,
    /// Wall-clock time the line was queued, `HH:MM:SS.mmm`
    pub at: String,
}

impl LogLine {
    fn stamped(channel: LogChannel, message: impl Into<String>) -> Self {
        LogLine {
            channel,
            message: message.into(),
            at: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn full(message: impl Into<String>) -> Self {
        Self::stamped(LogChannel::Full, message)
    }

    pub fn parsed(message: impl Into<String>) -> Self {
        Self::stamped(LogChannel::Parsed, message)
    }

    fn render(&self) -> String {
        format!("[{}] {}\n", self.at, self.message)
    }
}

enum WriterCommand {
    Write(LogLine),
    Drain(std::sync::mpsc::Sender<()>),
}

/// Unified logger: disk persistence plus an optional UI sink.
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<WriterCommand>,
    log_dir: PathBuf,
    level: LevelFilter,
}

impl LogCollector {
    /// Create the `full/` and `parsed/` directories and start the writer thread.
    pub fn new(
        log_dir: PathBuf,
        ui_tx: Option<tokio::sync::mpsc::Sender<LogLine>>,
    ) -> Result<Self, String> {
        let full_dir = log_dir.join("full");
        let parsed_dir = log_dir.join("parsed");
        std::fs::create_dir_all(&full_dir)
            .map_err(|e| format!("cannot create {}: {}", full_dir.display(), e))?;
        std::fs::create_dir_all(&parsed_dir)
            .map_err(|e| format!("cannot create {}: {}", parsed_dir.display(), e))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut full = open_log(&full_dir.join(format!("{}_full.log", stamp)))?;
        let mut parsed = open_log(&parsed_dir.join(format!("{}_parsed.log", stamp)))?;

        let (tx, rx) = unbounded::<WriterCommand>();
        std::thread::spawn(move || {
            for command in rx.iter() {
                match command {
                    WriterCommand::Write(line) => {
                        let rendered = line.render();
                        let _ = full.write_all(rendered.as_bytes());
                        if line.channel == LogChannel::Parsed {
                            let _ = parsed.write_all(rendered.as_bytes());
                        }
                        if let Some(ui) = &ui_tx {
                            let _ = ui.try_send(line);
                        }
                    }
                    WriterCommand::Drain(done) => {
                        let _ = full.flush().and(parsed.flush());
                        let _ = done.send(());
                    }
                }
            }
        });

        Ok(LogCollector {
            tx,
            log_dir,
            level: LevelFilter::Info,
        })
    }

    /// Set the maximum level accepted through the `log` facade.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Queue a line (non-blocking).
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(WriterCommand::Write(line));
    }

    pub fn log_str(&self, message: impl Into<String>) {
        self.log_line(LogLine::full(message));
    }

    pub fn log_parsed(&self, message: impl Into<String>) {
        self.log_line(LogLine::parsed(message));
    }

    /// Register as the global `log` backend.
    pub fn install(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.level);
        Ok(())
    }

    /// Wait until every line queued before this call is on disk.
    pub async fn wait_for_empty(&self) -> Result<(), String> {
        let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(WriterCommand::Drain(done_tx))
            .map_err(|_| "log writer has stopped".to_string())?;
        tokio::task::spawn_blocking(move || done_rx.recv())
            .await
            .map_err(|e| format!("Flush task failed: {}", e))?
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("[{}] {}", record.level(), record.args());
        if record.target() == "parsed" {
            self.log_parsed(message);
        } else {
            self.log_str(message);
        }
    }

    fn flush(&self) {}
}

fn open_log(path: &Path) -> Result<File, String> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read_single(dir: &Path) -> String {
        let entry = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.path().extension().map_or(false, |ext| ext == "log"))
            .expect("log file present");
        fs::read_to_string(entry.path()).unwrap()
    }

    #[tokio::test]
    async fn test_lines_routed_by_type() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), None).unwrap();

        collector.log_str("detail line");
        collector.log_parsed("SIGN-IN: guest");
        collector.wait_for_empty().await.unwrap();

        let full = read_single(&temp_dir.path().join("full"));
        let parsed = read_single(&temp_dir.path().join("parsed"));
        assert!(full.contains("detail line"));
        assert!(full.contains("SIGN-IN: guest"));
        assert!(!parsed.contains("detail line"));
        assert!(parsed.contains("SIGN-IN: guest"));
    }

    #[tokio::test]
    async fn test_ui_sink_receives_lines() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let (ui_tx, mut ui_rx) = tokio::sync::mpsc::channel(8);
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), Some(ui_tx)).unwrap();

        collector.log_parsed("hello");
        collector.wait_for_empty().await.unwrap();

        let line = ui_rx.recv().await.unwrap();
        assert_eq!(line.message, "hello");
        assert_eq!(line.channel, LogChannel::Parsed);
    }

    #[test]
    fn test_level_filter() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), None)
            .unwrap()
            .with_level(LevelFilter::Warn);
        let info = Metadata::builder().level(log::Level::Info).build();
        let warn = Metadata::builder().level(log::Level::Warn).build();
        assert!(!collector.enabled(&info));
        assert!(collector.enabled(&warn));
    }
}
