// Reader for session log files written by the file sink.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Serialize;

use crate::filter::matches_selection;
use crate::session::{HEADER_RULE, HEADER_TITLE};
use crate::sink::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedPacket {
    /// `HH:MM:SS.mmm` as written.
    pub time: String,
    pub direction: Direction,
    pub type_name: String,
    pub data: String,
}

impl LoggedPacket {
    /// Parses `[12:00:01.250] [S2C] Name data`. The data part may be empty.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let (time, rest) = rest.split_once("] [")?;
        let (direction, rest) = rest.split_once("] ")?;
        let direction = Direction::from_label(direction)?;
        let (type_name, data) = match rest.split_once(' ') {
            Some((name, data)) => (name, data),
            None => (rest, ""),
        };
        if type_name.is_empty() {
            return None;
        }
        Some(Self {
            time: time.to_string(),
            direction,
            type_name: type_name.to_string(),
            data: data.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    pub path: PathBuf,
    pub session_id: Option<String>,
    pub world: Option<String>,
    pub ended: Option<String>,
    pub packets: Vec<LoggedPacket>,
    /// Lines after the header that were neither packets nor the trailer.
    pub malformed_lines: usize,
}

impl SessionLog {
    /// Loads a plain or gzip-compressed (`.gz`) session log.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let mut text = String::new();
            GzDecoder::new(file)
                .read_to_string(&mut text)
                .context("Failed to decompress log file")?;
            text
        } else {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
        };

        let mut log = Self::parse(&text);
        log.path = path.to_path_buf();
        Ok(log)
    }

    pub fn parse(text: &str) -> Self {
        let mut log = Self::default();
        let mut in_header = false;

        for line in text.lines() {
            if line == HEADER_TITLE {
                in_header = true;
                continue;
            }
            if in_header {
                if line == HEADER_RULE {
                    in_header = false;
                } else if let Some(id) = line.strip_prefix("Session: ") {
                    log.session_id = Some(id.to_string());
                } else if let Some(world) = line.strip_prefix("World: ") {
                    log.world = Some(world.to_string());
                }
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }
            if let Some(ended) = line
                .strip_prefix("=== Session ended: ")
                .and_then(|rest| rest.strip_suffix(" ==="))
            {
                log.ended = Some(ended.to_string());
                continue;
            }
            match LoggedPacket::parse(line) {
                Some(packet) => log.packets.push(packet),
                None => log.malformed_lines += 1,
            }
        }
        log
    }

    pub fn type_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for packet in &self.packets {
            *counts.entry(packet.type_name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Packets whose type matches `selection` by the same equality or suffix
    /// rule the logger filters with. An empty selection keeps everything.
    pub fn matching<'a>(&'a self, selection: &'a [String]) -> impl Iterator<Item = &'a LoggedPacket> {
        self.packets
            .iter()
            .filter(move |p| selection.is_empty() || matches_selection(selection, &p.type_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = "=== Deep Packet Logger ===
Session: 2024-05-01_12-00-00
World: localhost
Format: [TIME] [DIRECTION] PacketName {deep_data}
==========================================

[12:00:01.250] [S2C] BlockUpdateS2CPacket {pos:{x:1,y:2,z:3}}
[12:00:01.300] [C2S] ClickSlotC2SPacket {slot:3}
garbage line
[12:00:02.000] [S2C] EntitySpawnS2CPacket {id:7}
[12:00:02.100] [S2C] BlockUpdateS2CPacket {pos:{x:0,y:0,z:0}}

=== Session ended: 2024-05-01_12-05-00 ===
";

    #[test]
    fn test_parse_sample() {
        let log = SessionLog::parse(SAMPLE);
        assert_eq!(log.session_id.as_deref(), Some("2024-05-01_12-00-00"));
        assert_eq!(log.world.as_deref(), Some("localhost"));
        assert_eq!(log.ended.as_deref(), Some("2024-05-01_12-05-00"));
        assert_eq!(log.packets.len(), 4);
        assert_eq!(log.malformed_lines, 1);

        let first = &log.packets[0];
        assert_eq!(first.time, "12:00:01.250");
        assert_eq!(first.direction, Direction::Inbound);
        assert_eq!(first.type_name, "BlockUpdateS2CPacket");
        assert_eq!(first.data, "{pos:{x:1,y:2,z:3}}");
        assert_eq!(log.type_counts().get("BlockUpdateS2CPacket"), Some(&2));
    }

    #[test]
    fn test_parse_line_edge_cases() {
        let bare = LoggedPacket::parse("[00:00:00.000] [C2S] KeepAliveC2SPacket").unwrap();
        assert_eq!(bare.data, "");
        assert!(LoggedPacket::parse("[00:00:00.000] [XYZ] Packet {}").is_none());
        assert!(LoggedPacket::parse("no brackets").is_none());
    }

    #[test]
    fn test_matching_uses_suffix_rule() {
        let log = SessionLog::parse(SAMPLE);
        let selection = vec!["SpawnS2CPacket".to_string()];
        let names: Vec<&str> = log.matching(&selection).map(|p| p.type_name.as_str()).collect();
        assert_eq!(names, vec!["EntitySpawnS2CPacket"]);
        assert_eq!(log.matching(&[]).count(), 4);
    }

    #[test]
    fn test_load_plain_and_gzip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let plain = temp_dir.path().join("session.log");
        fs::write(&plain, SAMPLE)?;
        let gz = temp_dir.path().join("session.log.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&gz)?, Compression::default());
        encoder.write_all(SAMPLE.as_bytes())?;
        encoder.finish()?;

        let from_plain = SessionLog::load(&plain)?;
        let from_gz = SessionLog::load(&gz)?;
        assert_eq!(from_plain.packets, from_gz.packets);
        assert_eq!(from_gz.path, gz);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        assert!(SessionLog::load("/nonexistent/packets.log").is_err());
    }
}
