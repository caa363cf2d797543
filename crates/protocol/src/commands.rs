use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction in frame-local coordinates.
///
/// View transforms emit a `Vec<RenderCommand>` per frame group; the
/// group's translation places the commands on the session timeline.
/// Backends consume the list sequentially; each command carries all
/// the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Filled rectangle (a pipeline stage interval).
    DrawRect { rect: Rect, color: ThemeToken },

    /// Vertical marker or grid line.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
    },

    /// Text at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        align: TextAlign,
        baseline: TextBaseline,
    },

    /// Cubic S-curve connecting the end of one stage row to the start
    /// of the next. Control points sit vertically aligned with the two
    /// endpoints: `C (from.x, to.y), (to.x, from.y), (to.x, to.y)`.
    DrawCurve {
        from: Point,
        to: Point,
        color: ThemeToken,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    Middle,
    Hanging,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_roundtrip() {
        let cmds = vec![
            RenderCommand::DrawRect {
                rect: Rect::new(0.0, 0.0, 100.0, 70.0),
                color: ThemeToken::Compositor,
            },
            RenderCommand::DrawCurve {
                from: Point::new(70.0, 70.0),
                to: Point::new(80.0, 120.0),
                color: ThemeToken::Connector,
            },
        ];
        let json = serde_json::to_string(&cmds).unwrap();
        let back: Vec<RenderCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmds);
    }
}
