use frametrace_protocol::{
    FrameGroup, Point, Rect, RenderCommand, Scene, TextAlign, TextBaseline, ThemeToken,
};

use crate::model::{LaneEvents, NormalizedFrame, TimingTable, events};
use crate::views::LayoutParams;

/// How far a stream lane's stage cascade reached.
///
/// Stages are strictly sequential: a stage renders only if every
/// earlier stage's fields were present. A lane whose `receive` pair is
/// missing stops at `EncodeSend` even when decode/blit/display data
/// exists: a stage is never shown without its predecessor visually
/// anchoring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LaneStage {
    NotStarted,
    EncodeSend,
    Receive,
    Decode,
    Blit,
    Display,
}

/// Evaluate the cascade's transition guards for one lane.
pub fn lane_stage(lane: &LaneEvents) -> LaneStage {
    let has = |name: &str| lane.contains_key(name);

    if !(has(events::ENCODE_BEGIN)
        && has(events::ENCODE_END)
        && has(events::SEND_BEGIN)
        && has(events::SEND_END))
    {
        return LaneStage::NotStarted;
    }
    if !(has(events::RECEIVE_BEGIN) && has(events::RECEIVE_END)) {
        return LaneStage::EncodeSend;
    }
    if !(has(events::DECODE_BEGIN) && has(events::DECODE_END)) {
        return LaneStage::Receive;
    }
    if !has(events::BLIT) {
        return LaneStage::Decode;
    }
    if !has(events::DISPLAY) {
        return LaneStage::Blit;
    }
    LaneStage::Display
}

/// Render the timing table as a scene: one group per complete frame.
///
/// Frames without a global lane, or without both `wake_up` and
/// `submit` on it, are not drawn at all. Scene height fits the widest
/// stream count observed anywhere in the table.
pub fn render_timeline(table: &TimingTable, params: &LayoutParams) -> Scene {
    let dy = params.row_advance();
    let height = (1.0 + 4.0 * f64::from(table.max_stream_count())) * dy;

    let groups = table
        .frames
        .iter()
        .filter_map(|(&index, frame)| frame_group(index, frame, params))
        .collect();

    Scene {
        height,
        underlay: Vec::new(),
        groups,
    }
}

fn frame_group(index: u64, frame: &NormalizedFrame, params: &LayoutParams) -> Option<FrameGroup> {
    let global = frame.global()?;
    let wake_up = *global.get(events::WAKE_UP)?;
    let submit = *global.get(events::SUBMIT)?;

    let s = params.t_scale;
    let lh = params.line_height;
    let mut commands = Vec::new();

    // Compositor bar on the global row.
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(wake_up * s, 0.0, (submit - wake_up) * s, lh),
        color: ThemeToken::Compositor,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(wake_up * s, lh / 2.0),
        text: format!("Frame {index}"),
        color: ThemeToken::TextPrimary,
        align: TextAlign::Left,
        baseline: TextBaseline::Middle,
    });

    for (stream, lane) in frame.streams() {
        draw_lane(&mut commands, stream, lane, params);
    }

    Some(FrameGroup {
        frame_index: index,
        begin_ms: frame.begin_ms,
        translate_x: (frame.begin_ms - params.t_offset) * s,
        commands,
    })
}

fn draw_lane(commands: &mut Vec<RenderCommand>, stream: u32, lane: &LaneEvents, params: &LayoutParams) {
    let stage = lane_stage(lane);
    if stage == LaneStage::NotStarted {
        return;
    }

    let s = params.t_scale;
    let lh = params.line_height;
    let dy = params.row_advance();
    let base = dy * (1.0 + 4.0 * f64::from(stream));
    // The four row bands of a lane: encode+send, receive+decode, blit,
    // display.
    let rows = [base, base + dy, base + 2.0 * dy, base + 3.0 * dy];

    let at = |name: &str| lane.get(name).copied().unwrap_or(f64::NAN);

    let encode_begin = at(events::ENCODE_BEGIN);
    let encode_end = at(events::ENCODE_END);
    let send_begin = at(events::SEND_BEGIN);
    let send_end = at(events::SEND_END);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(encode_begin * s, rows[0], (encode_end - encode_begin) * s, lh),
        color: ThemeToken::Encode,
    });
    commands.push(offset_label(encode_begin, rows[0] + lh / 2.0, s));
    // Send is inset within the same band.
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(
            send_begin * s,
            rows[0] + lh * 0.2,
            (send_end - send_begin) * s,
            lh * 0.6,
        ),
        color: ThemeToken::Send,
    });
    commands.push(offset_label(send_begin, rows[0] + lh / 2.0, s));
    if stage < LaneStage::Receive {
        return;
    }

    let receive_begin = at(events::RECEIVE_BEGIN);
    let receive_end = at(events::RECEIVE_END);

    // An empty receive interval still gets a 1 px sliver.
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(
            receive_begin * s,
            rows[1],
            ((receive_end - receive_begin) * s).max(1.0),
            lh,
        ),
        color: ThemeToken::Receive,
    });
    commands.push(RenderCommand::DrawCurve {
        from: Point::new(send_begin * s + 0.5, rows[0] + lh),
        to: Point::new(receive_begin * s + 0.5, rows[1]),
        color: ThemeToken::Connector,
    });
    if stage < LaneStage::Decode {
        return;
    }

    let decode_begin = at(events::DECODE_BEGIN);
    let decode_end = at(events::DECODE_END);

    // Decode shares the receive band; its label marks when the data
    // for the band first arrived.
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(decode_begin * s, rows[1], (decode_end - decode_begin) * s, lh),
        color: ThemeToken::Decode,
    });
    commands.push(offset_label(receive_begin, rows[1] + lh / 2.0, s));
    if stage < LaneStage::Blit {
        return;
    }

    let blit = at(events::BLIT);

    commands.push(RenderCommand::DrawLine {
        from: Point::new(blit * s, rows[2]),
        to: Point::new(blit * s, rows[2] + lh),
        color: ThemeToken::Blit,
    });
    commands.push(offset_label(blit, rows[2] + lh / 2.0, s));
    commands.push(RenderCommand::DrawCurve {
        from: Point::new(decode_end * s - 0.5, rows[1] + lh),
        to: Point::new(blit * s, rows[2]),
        color: ThemeToken::Connector,
    });
    if stage < LaneStage::Display {
        return;
    }

    let display = at(events::DISPLAY);

    commands.push(RenderCommand::DrawLine {
        from: Point::new(display * s, rows[3]),
        to: Point::new(display * s, rows[3] + lh),
        color: ThemeToken::Display,
    });
    commands.push(offset_label(display, rows[3] + lh / 2.0, s));
    commands.push(RenderCommand::DrawCurve {
        from: Point::new(blit * s, rows[2] + lh),
        to: Point::new(display * s, rows[3]),
        color: ThemeToken::Connector,
    });
}

fn offset_label(t_ms: f64, y: f64, scale: f64) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(t_ms * scale, y),
        text: format!("+{t_ms:.2} ms"),
        color: ThemeToken::TextPrimary,
        align: TextAlign::Left,
        baseline: TextBaseline::Middle,
    }
}
