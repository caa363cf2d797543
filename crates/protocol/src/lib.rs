pub mod commands;
pub mod lane;
pub mod scene;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign, TextBaseline};
pub use lane::LaneKey;
pub use scene::{FrameGroup, Scene};
pub use theme::ThemeToken;
pub use types::{Point, Rect};
