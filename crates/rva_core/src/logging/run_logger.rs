//! Per-run logger.
//!
//! Each production run can narrate its stages to:
//! - a dedicated log file (optional; detached loggers have none)
//! - a callback (optional)
//! - `tracing`, always
//!
//! Compact mode keeps per-layer detail lines out of the main output and in a
//! tail buffer that is dumped when a run fails.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Logger for one timeline production run.
pub struct RunLogger {
    run_name: String,
    log_path: Option<PathBuf>,
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    callback: Arc<Mutex<Option<LogCallback>>>,
    config: LogConfig,
    tail_buffer: Arc<Mutex<VecDeque<String>>>,
    warning_count: Arc<Mutex<usize>>,
}

impl RunLogger {
    /// Create a logger writing to `<log_dir>/<run_name>.log`.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let file = File::create(&log_path)?;

        let mut logger = Self::detached(run_name, config);
        logger.log_path = Some(log_path);
        logger.file_writer = Arc::new(Mutex::new(Some(BufWriter::new(file))));
        logger.callback = Arc::new(Mutex::new(callback));
        Ok(logger)
    }

    /// Create a logger without a file sink; lines only reach `tracing`.
    pub fn detached(run_name: impl Into<String>, config: LogConfig) -> Self {
        let capacity = config.error_tail.max(1);
        Self {
            run_name: run_name.into(),
            log_path: None,
            file_writer: Arc::new(Mutex::new(None)),
            callback: Arc::new(Mutex::new(None)),
            config,
            tail_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            warning_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Attach a callback after construction.
    pub fn with_callback(self, callback: LogCallback) -> Self {
        *self.callback.lock() = Some(callback);
        self
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Number of warnings and skips logged so far.
    pub fn warning_count(&self) -> usize {
        *self.warning_count.lock()
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        forward_to_tracing(level, &self.run_name, message);

        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        *self.warning_count.lock() += 1;
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    pub fn validation(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Validation.format(message));
    }

    /// Log a recoverable skip.
    pub fn skip(&self, message: &str) {
        *self.warning_count.lock() += 1;
        self.log(LogLevel::Warn, &MessagePrefix::Skip.format(message));
    }

    /// Record a detail line (one placed layer, one estimate).
    ///
    /// Always kept in the tail buffer; printed only outside compact mode.
    pub fn detail(&self, line: &str) {
        {
            let mut buffer = self.tail_buffer.lock();
            if buffer.len() >= self.config.error_tail.max(1) {
                buffer.pop_front();
            }
            buffer.push_back(line.to_string());
        }

        tracing::trace!(run = %self.run_name, "{}", line);
        if self.config.compact {
            return;
        }
        self.output(&self.format_message(line));
    }

    /// Dump the tail buffer (typically after a failure).
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the file sink.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = *self.callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

fn forward_to_tracing(level: LogLevel, run: &str, message: &str) {
    match level {
        LogLevel::Trace => tracing::trace!(run, "{}", message),
        LogLevel::Debug => tracing::debug!(run, "{}", message),
        LogLevel::Info => tracing::info!(run, "{}", message),
        LogLevel::Warn => tracing::warn!(run, "{}", message),
        LogLevel::Error => tracing::error!(run, "{}", message),
    }
}

/// Make a run name safe for use as a file name.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn quiet() -> LogConfig {
        LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn writes_phase_lines_to_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run 1", dir.path(), quiet(), None).unwrap();

        logger.phase("Build Timeline");
        logger.flush();

        let path = logger.log_path().unwrap().to_path_buf();
        assert!(path.ends_with("run_1.log"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("=== Build Timeline ==="));
    }

    #[test]
    fn detached_logger_calls_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let logger = RunLogger::detached("run", quiet()).with_callback(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        logger.info("one");
        logger.debug("filtered by level");
        logger.warn("two");

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(logger.warning_count(), 1);
        assert!(logger.log_path().is_none());
    }

    #[test]
    fn compact_mode_keeps_details_in_tail_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let config = LogConfig {
            error_tail: 3,
            ..quiet()
        };
        let logger = RunLogger::detached("run", config).with_callback(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        for i in 0..5 {
            logger.detail(&format!("layer {}", i));
        }

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(logger.get_tail(), vec!["layer 2", "layer 3", "layer 4"]);

        logger.show_tail("build");
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c d"), "a_b_c_d");
    }
}
