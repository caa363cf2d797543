pub mod timings;

pub use timings::{TimingsError, load_timings, parse_timings};
