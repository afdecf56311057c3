//! Output side of the logger: a rendered packet becomes a [`LogEntry`] and is
//! routed to the chat surface or the session log file.

mod chat;
mod file;

pub use chat::{preview, ChatColor, ChatLine, ChatSink, ChatSurface, Segment, TerminalSurface};
pub use file::{sanitize_target, FileSink, SESSION_ID_FORMAT};

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::OutputMode;

pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Server to client.
    Inbound,
    /// Client to server.
    Outbound,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Inbound => "S2C",
            Direction::Outbound => "C2S",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "S2C" => Some(Direction::Inbound),
            "C2S" => Some(Direction::Outbound),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub direction: Direction,
    pub type_name: String,
    pub text: String,
}

impl LogEntry {
    pub fn new(direction: Direction, type_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            direction,
            type_name: type_name.into(),
            text: text.into(),
        }
    }

    /// `HH:MM:SS.mmm`
    pub fn time_label(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }

    /// The durable line, without a trailing newline:
    /// `[12:00:01.250] [S2C] BlockUpdateS2CPacket {...}`.
    pub fn line(&self) -> String {
        format!(
            "[{}] [{}] {} {}",
            self.time_label(),
            self.direction,
            self.type_name,
            self.text
        )
    }
}

/// Sends entries to the transient or durable sink depending on the mode.
pub struct Router {
    chat: ChatSink,
    file: FileSink,
}

impl Router {
    pub fn new(chat: ChatSink, file: FileSink) -> Self {
        Self { chat, file }
    }

    /// Never fails: chat problems are dropped, file problems are logged.
    pub fn route(&self, mode: OutputMode, entry: &LogEntry, log_dir: &Path, preview_chars: usize) {
        match mode {
            OutputMode::Chat => self.chat.send(entry, preview_chars),
            OutputMode::File => {
                if let Err(e) = self.file.write(entry, log_dir) {
                    error!("Error writing to log file: {}", e);
                }
            }
        }
    }

    pub fn chat(&self) -> &ChatSink {
        &self.chat
    }

    pub fn file(&self) -> &FileSink {
        &self.file
    }
}
