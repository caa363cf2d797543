use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Wire value of the lane selector column that marks the global lane.
pub const GLOBAL_SELECTOR: u8 = 255;

/// Identifies a sub-track within one frame's timing record.
///
/// The global lane carries compositor-level events (`wake_up`,
/// `submit`); stream lanes carry one encoder pipeline each. Ordering
/// puts the global lane first, then streams by ascending index, so a
/// `BTreeMap<LaneKey, _>` iterates lanes in display order.
///
/// The string form (`"global"`, `"stream-<n>"`) exists only at system
/// boundaries: the JSON dump and parsing. Internal code matches on the
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaneKey {
    Global,
    Stream(u32),
}

impl LaneKey {
    /// Map the CSV lane-selector column to a lane key. `255` is the
    /// reserved global value; anything else is a stream index.
    pub fn from_selector(selector: u8) -> Self {
        if selector == GLOBAL_SELECTOR {
            LaneKey::Global
        } else {
            LaneKey::Stream(u32::from(selector))
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, LaneKey::Global)
    }

    /// Stream index, if this is a stream lane.
    pub fn stream(&self) -> Option<u32> {
        match self {
            LaneKey::Global => None,
            LaneKey::Stream(n) => Some(*n),
        }
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKey::Global => write!(f, "global"),
            LaneKey::Stream(n) => write!(f, "stream-{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lane key: {0:?}")]
pub struct LaneKeyParseError(String);

impl FromStr for LaneKey {
    type Err = LaneKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            return Ok(LaneKey::Global);
        }
        if let Some(index) = s.strip_prefix("stream-")
            && let Ok(n) = index.parse::<u32>()
        {
            return Ok(LaneKey::Stream(n));
        }
        Err(LaneKeyParseError(s.to_string()))
    }
}

// Serialized as the boundary string form so the key reads naturally
// in the JSON dump ("global", "stream-0", ...).

impl Serialize for LaneKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LaneKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
