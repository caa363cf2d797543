use frametrace_protocol::{Point, RenderCommand, TextAlign, TextBaseline, ThemeToken};

use crate::views::LayoutParams;

/// Render a time ruler: one vertical grid line with a label every `dt`
/// milliseconds over `[t0, t1)`.
///
/// Emitted as a scene underlay in absolute coordinates; panning moves
/// frame groups over it without retranslating the ruler.
pub fn render_timescale(
    t0: f64,
    t1: f64,
    dt: f64,
    params: &LayoutParams,
    height: f64,
) -> Vec<RenderCommand> {
    let mut commands = Vec::new();
    if dt <= 0.0 || t1 <= t0 {
        return commands;
    }

    let mut t = t0;
    while t < t1 {
        let x = (t - params.t_offset) * params.t_scale;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            color: ThemeToken::GridLine,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, height),
            text: format!("{t} ms"),
            color: ThemeToken::TextPrimary,
            align: TextAlign::Left,
            baseline: TextBaseline::Hanging,
        });
        t += dt;
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_and_label_per_tick() {
        let params = LayoutParams::default();
        let commands = render_timescale(0.0, 100.0, 5.0, &params, 600.0);
        assert_eq!(commands.len(), 20 * 2);

        let RenderCommand::DrawLine { from, to, .. } = &commands[2] else {
            unreachable!("expected a grid line");
        };
        assert_eq!(from.x, 100.0); // 5 ms * 20 px/ms
        assert_eq!(to.y, 600.0);

        let RenderCommand::DrawText { text, .. } = &commands[3] else {
            unreachable!("expected a label");
        };
        assert_eq!(text, "5 ms");
    }

    #[test]
    fn offset_shifts_grid() {
        let params = LayoutParams {
            t_offset: 10.0,
            ..LayoutParams::default()
        };
        let commands = render_timescale(0.0, 20.0, 10.0, &params, 100.0);
        let RenderCommand::DrawLine { from, .. } = &commands[0] else {
            unreachable!("expected a grid line");
        };
        assert_eq!(from.x, -200.0);
    }

    #[test]
    fn degenerate_ranges_render_nothing() {
        let params = LayoutParams::default();
        assert!(render_timescale(0.0, 100.0, 0.0, &params, 100.0).is_empty());
        assert!(render_timescale(50.0, 50.0, 5.0, &params, 100.0).is_empty());
    }
}
