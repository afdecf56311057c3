// CLI utility to summarize a recorded session log
// Usage: log_dump <log_file> [--count N] [--type NAME]

use anyhow::{Context, Result};
use deep_packet_logger::session_log::SessionLog;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <log_file> [--count N] [--type NAME]", args[0]);
        eprintln!("  log_file: packets_*.log or packets_*.log.gz");
        eprintln!("  --count N: Number of packets to show (default: 10)");
        eprintln!("  --type NAME: Only show packets whose name ends with NAME (repeatable)");
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);

    let mut count = 10;
    let mut types = Vec::new();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-n" => {
                let value = args.get(i + 1).context("--count needs a value")?;
                count = value
                    .parse()
                    .context("Invalid count value. Must be a positive integer.")?;
                i += 1;
            }
            "--type" | "-t" => {
                let value = args.get(i + 1).context("--type needs a value")?;
                types.push(value.clone());
                i += 1;
            }
            other => warn!("Ignoring unknown argument {}", other),
        }
        i += 1;
    }

    let session_log = SessionLog::load(&log_file)?;
    info!(
        "Loaded {} packets from {}",
        session_log.packets.len(),
        session_log.path.display()
    );
    if session_log.malformed_lines > 0 {
        warn!("Skipped {} malformed lines", session_log.malformed_lines);
    }

    let shown: Vec<_> = session_log.matching(&types).take(count).collect();

    let output = serde_json::json!({
        "session_id": session_log.session_id,
        "world": session_log.world,
        "ended": session_log.ended,
        "total_packets": session_log.packets.len(),
        "malformed_lines": session_log.malformed_lines,
        "type_counts": session_log.type_counts(),
        "filter": &types,
        "packets_shown": shown.len(),
        "packets": shown,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
