pub mod record;
pub mod table;

pub use record::{EventRecord, events};
pub use table::{LaneEvents, LaneFlags, NormalizedFrame, RawFrame, RawTable, TimingTable};
