use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use tracing::info;

use super::LogEntry;
use crate::error::SinkError;
use crate::session::{new_session_id, Session};

pub const SESSION_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub const UNKNOWN_TARGET: &str = "unknown";
const MAX_TARGET_LEN: usize = 50;

#[derive(Default)]
struct DurableState {
    target: Option<String>,
    session: Option<Session>,
}

/// Durable sink. Opening a session and appending to it happen under the
/// same lock, so concurrent writers never create two files or interleave
/// partial lines.
#[derive(Default)]
pub struct FileSink {
    state: Mutex<DurableState>,
}

impl FileSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DurableState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends one line, starting a session in `log_dir` first if none is
    /// open.
    pub fn write(&self, entry: &LogEntry, log_dir: &Path) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.session.is_none() {
            let target = sanitize_target(state.target.as_deref());
            let session = Session::create(new_session_id(), target, log_dir)?;
            info!("Created new log file: {}", session.path().display());
            state.session = Some(session);
        }
        if let Some(session) = state.session.as_mut() {
            session.append(entry)?;
        }
        Ok(())
    }

    /// A new world or server was joined. The next write opens a fresh
    /// session named after `target`.
    pub fn on_join(&self, target: Option<&str>) {
        let mut state = self.lock();
        state.target = target.map(str::to_string);
        state.session = None;
        info!("New session started: {}", target.unwrap_or(UNKNOWN_TARGET));
    }

    /// Records the world or server name for the next session without
    /// touching the open one.
    pub fn set_target(&self, target: Option<&str>) {
        self.lock().target = target.map(str::to_string);
    }

    /// Writes the trailer of the open session, if any, and closes it.
    pub fn on_leave(&self) -> Result<(), SinkError> {
        let mut state = self.lock();
        state.target = None;
        if let Some(session) = state.session.take() {
            let ended = Local::now().format(SESSION_ID_FORMAT).to_string();
            session.end(&ended)?;
        }
        Ok(())
    }

    /// Drops the open session without a trailer; the next write starts a
    /// new one.
    pub fn invalidate(&self) {
        self.lock().session = None;
    }

    pub fn has_session(&self) -> bool {
        self.lock().session.is_some()
    }
}

/// File-name-safe form of a world or server name: characters outside
/// `[A-Za-z0-9._-]` become `_`, runs of `_` collapse, at most 50 characters.
/// Missing or empty names become `unknown`.
pub fn sanitize_target(name: Option<&str>) -> String {
    let Some(name) = name else {
        return UNKNOWN_TARGET.to_string();
    };
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.truncate(MAX_TARGET_LEN);
    if out.is_empty() {
        return UNKNOWN_TARGET.to_string();
    }
    out
}
