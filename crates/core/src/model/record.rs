use frametrace_protocol::LaneKey;
use serde::{Deserialize, Serialize};

/// Canonical event names written by the streaming server's timing dump.
///
/// The table itself is name-agnostic (any event lands in it); these are
/// the names the renderer and the stats module look up.
pub mod events {
    /// Compositor woke up for the frame (global lane).
    pub const WAKE_UP: &str = "wake_up";
    /// Compositor submitted the frame (global lane).
    pub const SUBMIT: &str = "submit";

    pub const ENCODE_BEGIN: &str = "encode_begin";
    pub const ENCODE_END: &str = "encode_end";
    pub const SEND_BEGIN: &str = "send_begin";
    pub const SEND_END: &str = "send_end";
    pub const RECEIVE_BEGIN: &str = "receive_begin";
    pub const RECEIVE_END: &str = "receive_end";
    pub const DECODE_BEGIN: &str = "decode_begin";
    pub const DECODE_END: &str = "decode_end";
    pub const BLIT: &str = "blit";
    pub const DISPLAY: &str = "display";
}

/// One parsed row of the timing dump.
///
/// `timestamp_ns` is nanoseconds since an arbitrary monotonic epoch
/// shared by every record in one file. It is an `f64` rather than an
/// integer so that a non-numeric field can be carried as NaN and poison
/// the owning frame's extrema instead of vanishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub frame_index: u64,
    pub lane: LaneKey,
    pub timestamp_ns: f64,
    /// Trailing flag fields, e.g. `idr` / `p` on encoder rows.
    pub flags: Vec<String>,
}
