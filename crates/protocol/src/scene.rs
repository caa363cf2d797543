use serde::{Deserialize, Serialize};

use crate::commands::RenderCommand;

/// The rendered timeline: an underlay plus one group per drawn frame.
///
/// Groups hold their commands in frame-local coordinates; only
/// `translate_x` positions a group on the session timeline. Panning
/// rewrites the translations and nothing else, so a pan costs one
/// pass over the groups regardless of how many stage elements they
/// contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Total drawing height in pixels, sized to the widest stream
    /// lane count observed in the table.
    pub height: f64,
    /// Non-panning background commands (time ruler), in absolute
    /// coordinates.
    pub underlay: Vec<RenderCommand>,
    pub groups: Vec<FrameGroup>,
}

impl Scene {
    /// Total number of stage commands across all groups.
    pub fn command_count(&self) -> usize {
        self.underlay.len() + self.groups.iter().map(|g| g.commands.len()).sum::<usize>()
    }

    pub fn group(&self, frame_index: u64) -> Option<&FrameGroup> {
        self.groups.iter().find(|g| g.frame_index == frame_index)
    }

    /// Rightmost drawn x-coordinate, for sizing a static export.
    /// Non-finite extents (poisoned frames) are ignored.
    pub fn content_width(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| {
                g.commands
                    .iter()
                    .map(move |c| g.translate_x + command_extent(c))
            })
            .chain(self.underlay.iter().map(command_extent))
            .filter(|x| x.is_finite())
            .fold(0.0, f64::max)
    }
}

fn command_extent(cmd: &RenderCommand) -> f64 {
    match cmd {
        RenderCommand::DrawRect { rect, .. } => rect.right(),
        RenderCommand::DrawLine { from, to, .. } => from.x.max(to.x),
        RenderCommand::DrawText { position, .. } => position.x,
        RenderCommand::DrawCurve { from, to, .. } => from.x.max(to.x),
    }
}

/// One frame's drawn elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGroup {
    pub frame_index: u64,
    /// The frame's session-relative begin, cached so pan can recompute
    /// the translation without consulting the timing table.
    pub begin_ms: f64,
    /// Horizontal offset in pixels: `(begin_ms - pan origin) * scale`.
    pub translate_x: f64,
    pub commands: Vec<RenderCommand>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeToken;
    use crate::types::Rect;

    fn group(frame_index: u64, begin_ms: f64) -> FrameGroup {
        FrameGroup {
            frame_index,
            begin_ms,
            translate_x: begin_ms * 20.0,
            commands: vec![RenderCommand::DrawRect {
                rect: Rect::new(0.0, 0.0, 100.0, 70.0),
                color: ThemeToken::Compositor,
            }],
        }
    }

    #[test]
    fn lookup_by_frame_index() {
        let scene = Scene {
            height: 120.0,
            underlay: vec![],
            groups: vec![group(0, 0.0), group(2, 22.5)],
        };
        assert_eq!(scene.group(2).map(|g| g.begin_ms), Some(22.5));
        assert!(scene.group(1).is_none());
        assert_eq!(scene.command_count(), 2);
    }

    #[test]
    fn content_width_spans_translated_groups() {
        let scene = Scene {
            height: 120.0,
            underlay: vec![],
            groups: vec![group(0, 0.0), group(2, 22.5)],
        };
        // Group 2 translates to 450 and its rect reaches x=100.
        assert_eq!(scene.content_width(), 550.0);
    }

    #[test]
    fn serialization_roundtrip() {
        let scene = Scene {
            height: 120.0,
            underlay: vec![],
            groups: vec![group(0, 0.0)],
        };
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
