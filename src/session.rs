use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::sink::LogEntry;

pub const HEADER_TITLE: &str = "=== Deep Packet Logger ===";
pub const HEADER_FORMAT: &str = "Format: [TIME] [DIRECTION] PacketName {deep_data}";
pub const HEADER_RULE: &str = "==========================================";

/// One open session log file: `packets_<id>_<target>.log`.
pub struct Session {
    id: String,
    target: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl Session {
    /// Creates the file (and the directory) and writes the header. An
    /// existing file with the same name is never overwritten; a numeric
    /// suffix is added instead.
    pub fn create(
        id: impl Into<String>,
        target: impl Into<String>,
        log_dir: impl AsRef<Path>,
    ) -> Result<Self, std::io::Error> {
        let id = id.into();
        let target = target.into();
        let log_dir = log_dir.as_ref();

        std::fs::create_dir_all(log_dir)?;

        let stem = format!("packets_{}_{}", id, target);
        let mut path = log_dir.join(format!("{}.log", stem));
        let mut suffix = 0;
        let file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    suffix += 1;
                    path = log_dir.join(format!("{}_{}.log", stem, suffix));
                }
                Err(e) => return Err(e),
            }
        };

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", HEADER_TITLE)?;
        writeln!(writer, "Session: {}", id)?;
        writeln!(writer, "World: {}", target)?;
        writeln!(writer, "{}", HEADER_FORMAT)?;
        writeln!(writer, "{}", HEADER_RULE)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(Self {
            id,
            target,
            path,
            writer: Some(writer),
        })
    }

    pub fn append(&mut self, entry: &LogEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            // Whole line per write so readers never see half an entry.
            let line = format!("{}\n", entry.line());
            writer.write_all(line.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Writes the trailer and closes the file.
    pub fn end(mut self, ended_at: &str) -> Result<(), std::io::Error> {
        if let Some(mut writer) = self.writer.take() {
            writeln!(writer)?;
            writeln!(writer, "=== Session ended: {} ===", ended_at)?;
            writer.flush()?;
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Session ids are the local start time, e.g. `2024-05-01_12-00-00`.
pub fn new_session_id() -> String {
    Local::now().format(crate::sink::SESSION_ID_FORMAT).to_string()
}
