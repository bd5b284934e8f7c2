use crate::core::message::MessageEntry;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Appends every conversation entry to a plain-text file while active.
#[derive(Debug, Default)]
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl TranscriptLog {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Start logging to `log_file` right away when one is given.
    pub fn new(log_file: Option<PathBuf>) -> std::io::Result<Self> {
        let mut log = Self::disabled();
        if let Some(path) = log_file {
            log.set_log_file(path)?;
        }
        Ok(log)
    }

    pub fn set_log_file(&mut self, path: PathBuf) -> std::io::Result<String> {
        self.test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;
        self.write_session_header("Session started");

        Ok(format!("Logging enabled to: {}", path.display()))
    }

    pub fn toggle(&mut self) -> Result<String, String> {
        let Some(path) = self.file_path.clone() else {
            return Err("No log file configured. Start with --log <FILE>.".to_string());
        };

        if self.is_active {
            self.write_session_header("Logging paused");
            self.is_active = false;
            Ok(format!("Logging paused (file: {})", path.display()))
        } else {
            self.is_active = true;
            self.write_session_header("Logging resumed");
            Ok(format!("Logging resumed to: {}", path.display()))
        }
    }

    /// Write one entry. Failures are reported through tracing and otherwise
    /// ignored; the conversation never depends on the log.
    pub fn log_entry(&self, entry: &MessageEntry) {
        if !self.is_active {
            return;
        }
        if let Err(err) = self.write_to_log(&entry.text) {
            warn!(error = %err, "failed to write transcript entry");
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn status_string(&self) -> String {
        let file_name = |path: &Path| {
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }

    fn write_session_header(&self, label: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Err(err) = self.write_to_log(&format!("## {label} {stamp}")) {
            warn!(error = %err, "failed to write transcript header");
        }
    }

    fn write_to_log(&self, content: &str) -> std::io::Result<()> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries, as on screen.
        writeln!(writer)?;

        writer.flush()
    }

    fn test_file_access(&self, path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()
    }
}
