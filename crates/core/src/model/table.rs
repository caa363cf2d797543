use std::collections::{BTreeMap, BTreeSet};

use frametrace_protocol::LaneKey;
use serde::{Deserialize, Serialize};

use crate::model::record::EventRecord;

const NS_PER_MS: f64 = 1_000_000.0;

/// Named event timestamps within one lane.
pub type LaneEvents = BTreeMap<String, f64>;

/// Per-lane flag sets (`idr` / `p` markers on encoder rows).
pub type LaneFlags = BTreeMap<LaneKey, BTreeSet<String>>;

/// Absolute-timestamp table, exactly as parsed: frame → lane → event →
/// nanoseconds. Immutable input to [`RawTable::normalize`]; the
/// normalized stage never feeds back into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub frames: BTreeMap<u64, RawFrame>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    pub lanes: BTreeMap<LaneKey, LaneEvents>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: LaneFlags,
}

impl RawTable {
    /// Insert one record. A duplicate (frame, lane, event) key keeps
    /// the later row's timestamp.
    pub fn insert(&mut self, record: EventRecord) {
        let frame = self.frames.entry(record.frame_index).or_default();
        frame
            .lanes
            .entry(record.lane)
            .or_default()
            .insert(record.name, record.timestamp_ns);
        if !record.flags.is_empty() {
            frame
                .flags
                .entry(record.lane)
                .or_default()
                .extend(record.flags);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Earliest timestamp across the whole table. NaN values are
    /// skipped here: a poisoned frame corrupts its own extrema, not
    /// every frame's session-relative begin.
    pub fn min_timestamp(&self) -> Option<f64> {
        let min = self
            .frames
            .values()
            .flat_map(|f| f.lanes.values())
            .flat_map(|events| events.values().copied())
            .fold(f64::INFINITY, f64::min);
        min.is_finite().then_some(min)
    }

    /// Produce the normalized table.
    ///
    /// Pass 1 rewrites every event as milliseconds relative to its own
    /// frame's earliest event; pass 2 positions each frame on the
    /// session timeline relative to the table-wide minimum.
    pub fn normalize(&self) -> TimingTable {
        let min_timestamp = self.min_timestamp().unwrap_or(0.0);
        let mut frames = BTreeMap::new();

        for (&index, raw) in &self.frames {
            let (begin, end) = frame_extrema(raw);

            let lanes = raw
                .lanes
                .iter()
                .map(|(&key, events)| {
                    let events = events
                        .iter()
                        .map(|(name, &ts)| (name.clone(), (ts - begin) / NS_PER_MS))
                        .collect();
                    (key, events)
                })
                .collect();

            frames.insert(
                index,
                NormalizedFrame {
                    begin_ms: (begin - min_timestamp) / NS_PER_MS,
                    end_ms: (end - min_timestamp) / NS_PER_MS,
                    lanes,
                    flags: raw.flags.clone(),
                },
            );
        }

        TimingTable { frames }
    }
}

/// Frame extrema over all lanes. NaN poisons both values: the whole
/// frame normalizes to NaN rather than silently dropping the bad row.
fn frame_extrema(frame: &RawFrame) -> (f64, f64) {
    let mut begin = f64::INFINITY;
    let mut end = f64::NEG_INFINITY;
    for events in frame.lanes.values() {
        for &ts in events.values() {
            begin = poison_min(begin, ts);
            end = poison_max(end, ts);
        }
    }
    (begin, end)
}

fn poison_min(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.min(v)
    }
}

fn poison_max(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.max(v)
    }
}

/// One frame after normalization.
///
/// Lane events are milliseconds relative to the frame's own earliest
/// event; `begin_ms` / `end_ms` are milliseconds relative to the
/// session's earliest event. The summary values live here as struct
/// fields, so the global lane's event map holds genuine events only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFrame {
    pub begin_ms: f64,
    pub end_ms: f64,
    pub lanes: BTreeMap<LaneKey, LaneEvents>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: LaneFlags,
}

impl NormalizedFrame {
    pub fn global(&self) -> Option<&LaneEvents> {
        self.lanes.get(&LaneKey::Global)
    }

    pub fn event(&self, lane: LaneKey, name: &str) -> Option<f64> {
        self.lanes.get(&lane).and_then(|e| e.get(name)).copied()
    }

    pub fn has_flag(&self, lane: LaneKey, flag: &str) -> bool {
        self.flags.get(&lane).is_some_and(|f| f.contains(flag))
    }

    /// Stream lanes in ascending index order.
    pub fn streams(&self) -> impl Iterator<Item = (u32, &LaneEvents)> {
        self.lanes
            .iter()
            .filter_map(|(key, events)| key.stream().map(|n| (n, events)))
    }
}

/// The normalized timing table. Built once per load, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingTable {
    pub frames: BTreeMap<u64, NormalizedFrame>,
}

impl TimingTable {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: u64) -> Option<&NormalizedFrame> {
        self.frames.get(&index)
    }

    /// Number of stream lanes the drawing surface must fit: highest
    /// stream index seen anywhere, plus one. Zero when no frame has a
    /// stream lane.
    pub fn max_stream_count(&self) -> u32 {
        self.frames
            .values()
            .flat_map(|f| f.lanes.keys())
            .filter_map(|k| k.stream())
            .map(|n| n + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::events;

    fn record(name: &str, frame: u64, ts: f64, lane: LaneKey) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            frame_index: frame,
            lane,
            timestamp_ns: ts,
            flags: vec![],
        }
    }

    fn sample_raw() -> RawTable {
        let mut raw = RawTable::default();
        raw.insert(record(events::WAKE_UP, 0, 1_000_000_000.0, LaneKey::Global));
        raw.insert(record(events::SUBMIT, 0, 1_005_000_000.0, LaneKey::Global));
        raw.insert(record(
            events::ENCODE_BEGIN,
            0,
            1_001_000_000.0,
            LaneKey::Stream(0),
        ));
        raw.insert(record(
            events::ENCODE_END,
            0,
            1_003_000_000.0,
            LaneKey::Stream(0),
        ));
        raw.insert(record(
            events::SEND_BEGIN,
            0,
            1_003_500_000.0,
            LaneKey::Stream(0),
        ));
        raw.insert(record(
            events::SEND_END,
            0,
            1_004_000_000.0,
            LaneKey::Stream(0),
        ));
        raw
    }

    #[test]
    fn normalizes_worked_example() {
        let table = sample_raw().normalize();
        let frame = table.frame(0).unwrap();

        assert_eq!(frame.begin_ms, 0.0);
        assert_eq!(frame.end_ms, 5.0);
        assert_eq!(frame.event(LaneKey::Global, events::WAKE_UP), Some(0.0));
        assert_eq!(frame.event(LaneKey::Global, events::SUBMIT), Some(5.0));
        assert_eq!(
            frame.event(LaneKey::Stream(0), events::ENCODE_BEGIN),
            Some(1.0)
        );
        assert_eq!(
            frame.event(LaneKey::Stream(0), events::ENCODE_END),
            Some(3.0)
        );
        assert_eq!(
            frame.event(LaneKey::Stream(0), events::SEND_BEGIN),
            Some(3.5)
        );
        assert_eq!(frame.event(LaneKey::Stream(0), events::SEND_END), Some(4.0));
    }

    #[test]
    fn frame_minimum_normalizes_to_zero() {
        let table = sample_raw().normalize();
        for frame in table.frames.values() {
            let min = frame
                .lanes
                .values()
                .flat_map(|e| e.values().copied())
                .fold(f64::INFINITY, f64::min);
            assert_eq!(min, 0.0);
        }
    }

    #[test]
    fn session_relative_ordering() {
        let mut raw = sample_raw();
        raw.insert(record(events::WAKE_UP, 1, 1_020_000_000.0, LaneKey::Global));
        raw.insert(record(events::SUBMIT, 1, 1_024_000_000.0, LaneKey::Global));
        let table = raw.normalize();

        let f0 = table.frame(0).unwrap();
        let f1 = table.frame(1).unwrap();
        assert!(f0.begin_ms <= f1.begin_ms);
        assert_eq!(f1.begin_ms, 20.0);
        assert_eq!(f1.end_ms, 24.0);
    }

    #[test]
    fn nan_poisons_only_its_frame() {
        let mut raw = sample_raw();
        raw.insert(record(events::WAKE_UP, 1, f64::NAN, LaneKey::Global));
        raw.insert(record(events::SUBMIT, 1, 1_030_000_000.0, LaneKey::Global));
        let table = raw.normalize();

        let poisoned = table.frame(1).unwrap();
        assert!(poisoned.begin_ms.is_nan());
        assert!(
            poisoned
                .event(LaneKey::Global, events::SUBMIT)
                .unwrap()
                .is_nan()
        );

        // Frame 0 is unaffected: the session minimum skips NaN.
        let clean = table.frame(0).unwrap();
        assert_eq!(clean.begin_ms, 0.0);
        assert_eq!(clean.event(LaneKey::Global, events::SUBMIT), Some(5.0));
    }

    #[test]
    fn duplicate_event_keeps_last_row() {
        let mut raw = sample_raw();
        raw.insert(record(events::SUBMIT, 0, 1_006_000_000.0, LaneKey::Global));
        let table = raw.normalize();
        assert_eq!(
            table.frame(0).unwrap().event(LaneKey::Global, events::SUBMIT),
            Some(6.0)
        );
    }

    #[test]
    fn max_stream_count() {
        let mut raw = sample_raw();
        assert_eq!(raw.normalize().max_stream_count(), 1);
        raw.insert(record(events::BLIT, 0, 1_004_500_000.0, LaneKey::Stream(2)));
        assert_eq!(raw.normalize().max_stream_count(), 3);

        let empty = RawTable::default();
        assert_eq!(empty.normalize().max_stream_count(), 0);
    }

    #[test]
    fn flags_survive_normalization() {
        let mut raw = RawTable::default();
        raw.insert(EventRecord {
            name: events::ENCODE_BEGIN.to_string(),
            frame_index: 0,
            lane: LaneKey::Stream(0),
            timestamp_ns: 1_000.0,
            flags: vec!["idr".to_string()],
        });
        let table = raw.normalize();
        assert!(table.frame(0).unwrap().has_flag(LaneKey::Stream(0), "idr"));
        assert!(!table.frame(0).unwrap().has_flag(LaneKey::Stream(0), "p"));
    }

    #[test]
    fn normalization_is_idempotent_per_input() {
        let a = sample_raw().normalize();
        let b = sample_raw().normalize();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
