//! SVG backend: converts a rendered [`Scene`] into a standalone SVG
//! document.

use frametrace_protocol::{RenderCommand, Scene, TextAlign, TextBaseline, ThemeToken};

/// Render a scene as an SVG document string.
///
/// `width` defines the viewBox width; height comes from the scene.
/// Each frame group becomes a `<g class="frame">` carrying its
/// horizontal translation, so the output mirrors what the pan
/// operation would update.
pub fn render_svg(scene: &Scene, width: f64, dark: bool) -> String {
    let height = scene.height;
    let mut svg = String::with_capacity(scene.command_count() * 160 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:14px">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    for cmd in &scene.underlay {
        push_command(&mut svg, cmd, dark);
    }

    for group in &scene.groups {
        svg.push_str(&format!(
            r#"<g class="frame" id="frame-{}" transform="translate({} 0)">"#,
            group.frame_index, group.translate_x,
        ));
        for cmd in &group.commands {
            push_command(&mut svg, cmd, dark);
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn push_command(svg: &mut String, cmd: &RenderCommand, dark: bool) {
    match cmd {
        RenderCommand::DrawRect { rect, color } => {
            let fill = resolve_color(*color, dark);
            let class = class_attr(*color);
            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"{class}/>"#,
                rect.x, rect.y, rect.w, rect.h,
            ));
        }
        RenderCommand::DrawLine { from, to, color } => {
            let stroke = resolve_color(*color, dark);
            let class = class_attr(*color);
            svg.push_str(&format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}"{class}/>"#,
                from.x, from.y, to.x, to.y,
            ));
        }
        RenderCommand::DrawText {
            position,
            text,
            color,
            align,
            baseline,
        } => {
            let fill = resolve_color(*color, dark);
            let anchor = match align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
                TextAlign::Right => "end",
            };
            let dominant = match baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Hanging => "hanging",
            };
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" fill="{fill}" text-anchor="{anchor}" dominant-baseline="{dominant}">{}</text>"#,
                position.x,
                position.y,
                escape_xml(text),
            ));
        }
        RenderCommand::DrawCurve { from, to, color } => {
            let stroke = resolve_color(*color, dark);
            // Control points vertically aligned with the endpoints
            // produce the S-curve between stage rows.
            svg.push_str(&format!(
                r#"<path d="M {} {} C {} {},{} {},{} {}" stroke="{stroke}" fill="transparent"/>"#,
                from.x, from.y, from.x, to.y, to.x, from.y, to.x, to.y,
            ));
        }
    }
}

// Stage palette from heavy.ai's 12-color data-story set; stage rows
// keep the same hues in both themes.
fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    match token {
        ThemeToken::Compositor => "#ea5545",
        ThemeToken::Encode => "#f46a9b",
        ThemeToken::Send => "#ef9b20",
        ThemeToken::Receive => "#edbf33",
        ThemeToken::Decode => "#bdcf32",
        ThemeToken::Blit | ThemeToken::Display => "#87bc45",
        ThemeToken::GridLine => "#808080",
        ThemeToken::Connector | ThemeToken::TextPrimary => {
            if dark { "#ececec" } else { "#000000" }
        }
        ThemeToken::TextMuted => {
            if dark { "#9e9e9e" } else { "#666677" }
        }
        ThemeToken::Background => {
            if dark { "#181818" } else { "#ffffff" }
        }
    }
}

fn class_attr(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::Compositor => r#" class="compositor""#,
        ThemeToken::Encode => r#" class="encode""#,
        ThemeToken::Send => r#" class="send""#,
        ThemeToken::Receive => r#" class="receive""#,
        ThemeToken::Decode => r#" class="decode""#,
        ThemeToken::Blit => r#" class="blit""#,
        ThemeToken::Display => r#" class="display""#,
        _ => "",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use frametrace_protocol::{FrameGroup, Point, Rect};

    fn sample_scene() -> Scene {
        Scene {
            height: 120.0,
            underlay: vec![],
            groups: vec![FrameGroup {
                frame_index: 3,
                begin_ms: 12.5,
                translate_x: 250.0,
                commands: vec![
                    RenderCommand::DrawRect {
                        rect: Rect::new(0.0, 0.0, 100.0, 70.0),
                        color: ThemeToken::Compositor,
                    },
                    RenderCommand::DrawText {
                        position: Point::new(0.0, 35.0),
                        text: "Frame 3".to_string(),
                        color: ThemeToken::TextPrimary,
                        align: TextAlign::Left,
                        baseline: TextBaseline::Middle,
                    },
                    RenderCommand::DrawCurve {
                        from: Point::new(50.0, 70.0),
                        to: Point::new(80.0, 120.0),
                        color: ThemeToken::Connector,
                    },
                ],
            }],
        }
    }

    #[test]
    fn groups_carry_translation_and_classes() {
        let svg = render_svg(&sample_scene(), 800.0, false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<g class="frame" id="frame-3" transform="translate(250 0)">"#));
        assert!(svg.contains(r#"class="compositor""#));
        assert!(svg.contains("#ea5545"));
        assert!(svg.contains("Frame 3"));
    }

    #[test]
    fn curve_uses_aligned_control_points() {
        let svg = render_svg(&sample_scene(), 800.0, false);
        assert!(svg.contains(r#"d="M 50 70 C 50 120,80 70,80 120""#));
    }

    #[test]
    fn theme_switches_text_and_background() {
        let light = render_svg(&sample_scene(), 800.0, false);
        assert!(light.contains("#ffffff"));
        let dark = render_svg(&sample_scene(), 800.0, true);
        assert!(dark.contains("#181818"));
        assert!(dark.contains("#ececec"));
    }

    #[test]
    fn escapes_xml_entities() {
        let mut scene = sample_scene();
        scene.groups[0].commands.push(RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "a<b & \"c\"".to_string(),
            color: ThemeToken::TextMuted,
            align: TextAlign::Left,
            baseline: TextBaseline::Hanging,
        });
        let svg = render_svg(&scene, 400.0, false);
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
    }
}
