pub mod timeline;
pub mod timescale;
pub mod view;

use serde::{Deserialize, Serialize};

pub use timeline::{LaneStage, lane_stage, render_timeline};
pub use timescale::render_timescale;
pub use view::TimelineView;

/// Horizontal scale and row geometry for the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Horizontal pan origin in milliseconds.
    pub t_offset: f64,
    /// Pixels per millisecond.
    pub t_scale: f64,
    /// Height of one row band in pixels.
    pub line_height: f64,
    /// Vertical gap between row bands in pixels.
    pub line_margin: f64,
}

impl LayoutParams {
    /// Vertical distance from one row band to the next.
    pub fn row_advance(&self) -> f64 {
        self.line_height + self.line_margin
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            t_offset: 0.0,
            t_scale: 20.0,
            line_height: 70.0,
            line_margin: 50.0,
        }
    }
}
