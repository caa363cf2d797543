use std::fs;
use std::path::Path;

use frametrace_protocol::LaneKey;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{EventRecord, RawTable, TimingTable};

#[derive(Debug, Error)]
pub enum TimingsError {
    #[error("reading timings: {0}")]
    Io(#[from] std::io::Error),
}

/// Read, parse, and normalize a timings CSV.
pub fn load_timings(path: &Path) -> Result<TimingTable, TimingsError> {
    let text = fs::read_to_string(path)?;
    let raw = parse_timings(&text);
    info!(path = %path.display(), frames = raw.len(), "loaded timing table");
    Ok(raw.normalize())
}

/// Parse the streaming server's timing dump.
///
/// One event per line: `"<event>",<frame>,<timestamp_ns>,<lane>` with
/// optional trailing flag fields (`idr`, `p`). Lane selector `255` is
/// the global lane; any other integer is a stream index.
///
/// Lines with fewer than 4 comma-separated fields are skipped, as are
/// rows whose frame or lane field is not an integer. A non-numeric
/// timestamp becomes NaN and poisons its frame's extrema during
/// normalization. The event field has every double-quote character
/// stripped; embedded commas or quotes are not handled. This parser
/// matches the producer's quoted-name output, not general CSV.
pub fn parse_timings(text: &str) -> RawTable {
    let mut table = RawTable::default();
    for line in text.lines() {
        let Some(record) = parse_line(line) else {
            if !line.trim().is_empty() {
                debug!(line, "skipping malformed timing row");
            }
            continue;
        };
        table.insert(record);
    }
    table
}

fn parse_line(line: &str) -> Option<EventRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 4 {
        return None;
    }

    let name = fields[0].replace('"', "");
    let frame_index: u64 = fields[1].trim().parse().ok()?;
    let timestamp_ns = fields[2].trim().parse::<f64>().unwrap_or(f64::NAN);
    let selector: u8 = fields[3].trim().parse().ok()?;

    let flags = fields[4..]
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    Some(EventRecord {
        name,
        frame_index,
        lane: LaneKey::from_selector(selector),
        timestamp_ns,
        flags,
    })
}
