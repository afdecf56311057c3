use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tracing::debug;

use super::{Direction, LogEntry};
use crate::error::SinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatColor {
    Gray,
    Green,
    Red,
    Yellow,
    White,
}

impl From<ChatColor> for Color {
    fn from(color: ChatColor) -> Self {
        match color {
            ChatColor::Gray => Color::Grey,
            ChatColor::Green => Color::Green,
            ChatColor::Red => Color::Red,
            ChatColor::Yellow => Color::Yellow,
            ChatColor::White => Color::White,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: ChatColor,
}

impl Segment {
    pub fn new(text: impl Into<String>, color: ChatColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// One colored chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLine {
    pub segments: Vec<Segment>,
}

impl ChatLine {
    /// `[time] ` gray, `[S2C] ` green or `[C2S] ` red, `Name ` yellow, and the
    /// data preview white.
    pub fn from_entry(entry: &LogEntry, preview_chars: usize) -> Self {
        let direction_color = match entry.direction {
            Direction::Inbound => ChatColor::Green,
            Direction::Outbound => ChatColor::Red,
        };
        Self {
            segments: vec![
                Segment::new(format!("[{}] ", entry.time_label()), ChatColor::Gray),
                Segment::new(format!("[{}] ", entry.direction), direction_color),
                Segment::new(format!("{} ", entry.type_name), ChatColor::Yellow),
                Segment::new(preview(&entry.text, preview_chars), ChatColor::White),
            ],
        }
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// First `max_chars` characters followed by `...`, or the text unchanged if
/// it already fits.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Host display for transient lines, e.g. the in-game chat.
pub trait ChatSurface: Send + Sync {
    /// Whether the surface can take lines right now.
    fn is_ready(&self) -> bool {
        true
    }

    fn display(&self, line: &ChatLine) -> Result<(), SinkError>;
}

/// Writes colored lines to stderr.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl ChatSurface for TerminalSurface {
    fn display(&self, line: &ChatLine) -> Result<(), SinkError> {
        let mut stderr = io::stderr().lock();
        for segment in &line.segments {
            queue!(
                stderr,
                SetForegroundColor(segment.color.into()),
                Print(&segment.text)
            )?;
        }
        queue!(stderr, ResetColor, Print("\n"))?;
        stderr.flush()?;
        Ok(())
    }
}

/// Transient sink. Lines that cannot be shown are dropped.
pub struct ChatSink {
    surface: Option<Box<dyn ChatSurface>>,
}

impl ChatSink {
    pub fn new(surface: impl ChatSurface + 'static) -> Self {
        Self {
            surface: Some(Box::new(surface)),
        }
    }

    /// A sink with nothing attached; every line is dropped.
    pub fn detached() -> Self {
        Self { surface: None }
    }

    pub fn send(&self, entry: &LogEntry, preview_chars: usize) {
        if let Err(e) = self.try_send(entry, preview_chars) {
            debug!("Dropping chat line for {}: {}", entry.type_name, e);
        }
    }

    pub fn try_send(&self, entry: &LogEntry, preview_chars: usize) -> Result<(), SinkError> {
        let surface = match self.surface.as_ref() {
            Some(surface) if surface.is_ready() => surface,
            _ => return Err(SinkError::SurfaceNotReady),
        };
        surface.display(&ChatLine::from_entry(entry, preview_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        lines: Arc<Mutex<Vec<ChatLine>>>,
        ready: bool,
    }

    impl ChatSurface for Recorder {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn display(&self, line: &ChatLine) -> Result<(), SinkError> {
            self.lines.lock().unwrap().push(line.clone());
            Ok(())
        }
    }

    struct Broken;

    impl ChatSurface for Broken {
        fn display(&self, _: &ChatLine) -> Result<(), SinkError> {
            Err(SinkError::Display("hud gone".to_string()))
        }
    }

    #[test]
    fn test_preview_truncates() {
        let long = "a".repeat(301);
        let out = preview(&long, 300);
        assert_eq!(out.len(), 303);
        assert!(out.ends_with("a..."));

        let exact = "b".repeat(300);
        assert_eq!(preview(&exact, 300), exact);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("äöüß", 2), "äö...");
        assert_eq!(preview("äö", 2), "äö");
    }

    #[test]
    fn test_chat_line_colors() {
        let entry = LogEntry::new(Direction::Inbound, "BlockUpdateS2CPacket", "{x:1}");
        let line = ChatLine::from_entry(&entry, 300);
        let colors: Vec<ChatColor> = line.segments.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![ChatColor::Gray, ChatColor::Green, ChatColor::Yellow, ChatColor::White]
        );
        assert!(line.plain_text().ends_with("[S2C] BlockUpdateS2CPacket {x:1}"));

        let outbound = LogEntry::new(Direction::Outbound, "ClickSlotC2SPacket", "{}");
        assert_eq!(ChatLine::from_entry(&outbound, 300).segments[1].color, ChatColor::Red);
    }

    #[test]
    fn test_send_to_ready_surface() {
        let recorder = Recorder {
            ready: true,
            ..Default::default()
        };
        let sink = ChatSink::new(recorder.clone());
        sink.send(&LogEntry::new(Direction::Inbound, "X", "y".repeat(10)), 4);

        let lines = recorder.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].segments[3].text, "yyyy...");
    }

    #[test]
    fn test_not_ready_surface_drops() {
        let recorder = Recorder::default();
        let sink = ChatSink::new(recorder.clone());
        sink.send(&LogEntry::new(Direction::Inbound, "X", "y"), 300);
        assert!(recorder.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_try_send_reports_reason() {
        let entry = LogEntry::new(Direction::Outbound, "X", "y");
        assert!(matches!(
            ChatSink::detached().try_send(&entry, 300),
            Err(SinkError::SurfaceNotReady)
        ));
        assert!(matches!(
            ChatSink::new(Broken).try_send(&entry, 300),
            Err(SinkError::Display(_))
        ));
    }

    #[test]
    fn test_failures_are_silent() {
        ChatSink::new(Broken).send(&LogEntry::new(Direction::Outbound, "X", "y"), 300);
        ChatSink::detached().send(&LogEntry::new(Direction::Outbound, "X", "y"), 300);
    }
}
