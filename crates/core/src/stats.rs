//! Pipeline latency statistics over a normalized timing table.

use frametrace_protocol::LaneKey;
use serde::{Deserialize, Serialize};

use crate::model::{NormalizedFrame, TimingTable};

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

/// Milliseconds between two named events of one frame.
///
/// The begin event is read from the global lane when present, else as
/// the minimum across stream lanes; the end event likewise, but as the
/// maximum. `None` when either side is missing or not finite (a frame
/// poisoned by a bad timestamp yields no duration).
pub fn stage_duration(frame: &NormalizedFrame, begin: &str, end: &str) -> Option<f64> {
    let t0 = event_time(frame, begin, Extremum::Min)?;
    let t1 = event_time(frame, end, Extremum::Max)?;
    (t0.is_finite() && t1.is_finite()).then(|| t1 - t0)
}

fn event_time(frame: &NormalizedFrame, name: &str, which: Extremum) -> Option<f64> {
    if let Some(t) = frame.event(LaneKey::Global, name) {
        return Some(t);
    }
    let per_stream = frame.streams().filter_map(|(_, lane)| lane.get(name).copied());
    match which {
        Extremum::Min => per_stream.reduce(f64::min),
        Extremum::Max => per_stream.reduce(f64::max),
    }
}

/// Per-frame durations for the given event span, in table order.
/// Frames without both events contribute nothing.
pub fn durations(table: &TimingTable, begin: &str, end: &str) -> Vec<f64> {
    table
        .frames
        .values()
        .filter_map(|f| stage_duration(f, begin, end))
        .collect()
}

/// Like [`durations`], restricted to frames carrying `flag` on `lane`
/// (e.g. IDR frames on a given stream).
pub fn durations_with_flag(
    table: &TimingTable,
    begin: &str,
    end: &str,
    lane: LaneKey,
    flag: &str,
) -> Vec<f64> {
    table
        .frames
        .values()
        .filter(|f| f.has_flag(lane, flag))
        .filter_map(|f| stage_duration(f, begin, end))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Aggregate a duration list. `None` when it is empty.
pub fn summarize(values: &[f64]) -> Option<DurationSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(DurationSummary {
        count: sorted.len(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        p50: percentile(&sorted, 0.50),
        p90: percentile(&sorted, 0.90),
    })
}

/// Nearest-rank percentile over a sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[rank]
}
