use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use frametrace_core::model::{TimingTable, events};
use frametrace_core::stats;
use frametrace_core::views::{LayoutParams, TimelineView};
use frametrace_protocol::{RenderCommand, ThemeToken};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Compositor => Color::Red,
        ThemeToken::Encode => Color::LightMagenta,
        ThemeToken::Send => Color::Yellow,
        ThemeToken::Receive => Color::LightYellow,
        ThemeToken::Decode => Color::Green,
        ThemeToken::Blit | ThemeToken::Display => Color::LightGreen,
        ThemeToken::Connector | ThemeToken::GridLine => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::Gray,
        ThemeToken::Background => Color::Black,
    }
}

/// Scroll deltas feeding [`TimelineView::pan`]; pan applies a tenth of
/// the delta, so arrows move 5 ms and the wheel 3 ms per notch.
const ARROW_DELTA: f64 = 50.0;
const WHEEL_DELTA: f64 = 30.0;

pub fn run_viewer(table: &TimingTable, params: LayoutParams) -> Result<()> {
    let mut view = TimelineView::new(table, params);
    let p50 = stats::summarize(&stats::durations(table, events::WAKE_UP, events::DISPLAY))
        .map(|s| s.p50);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Terminal columns per millisecond; +/- adjusts it.
    let mut cols_per_ms: f64 = 2.0;

    loop {
        let scene = view.scene();
        let t_scale = view.params().t_scale;
        let dy = view.params().row_advance();
        let origin = view.origin();

        terminal.draw(|frame| {
            let area = frame.area();

            let latency = p50
                .map(|v| format!("{v:.1} ms"))
                .unwrap_or_else(|| "n/a".to_string());
            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " frametrace — {} frames | {} streams | wake→display p50 {latency} | t0 {origin:.1} ms | ←→ pan | +/- zoom | q quit ",
                    table.len(),
                    table.max_stream_count(),
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let block = Block::default().style(Style::default().bg(Color::Black));
            frame.render_widget(block, content_area);

            let buf = frame.buffer_mut();
            let to_col = |x_px: f64| (x_px / t_scale * cols_per_ms).floor() as i64;
            let to_row = |y_px: f64| (y_px / dy).floor() as i64;

            for group in &scene.groups {
                for cmd in &group.commands {
                    match cmd {
                        RenderCommand::DrawRect { rect, color } => {
                            let row = to_row(rect.y);
                            let col0 = to_col(group.translate_x + rect.x);
                            let width =
                                ((rect.w / t_scale * cols_per_ms).ceil() as i64).max(1);
                            draw_run(buf, &content_area, col0, row, width, *color);
                        }
                        RenderCommand::DrawLine { from, color, .. } => {
                            let row = to_row(from.y);
                            let col = to_col(group.translate_x + from.x);
                            draw_cell(buf, &content_area, col, row, '│', *color);
                        }
                        RenderCommand::DrawText {
                            position,
                            text,
                            color,
                            ..
                        } => {
                            let row = to_row(position.y);
                            let col = to_col(group.translate_x + position.x);
                            draw_text(buf, &content_area, col, row, text, *color);
                        }
                        RenderCommand::DrawCurve { .. } => {}
                    }
                }
            }
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left => view.pan(-ARROW_DELTA),
                    KeyCode::Right => view.pan(ARROW_DELTA),
                    KeyCode::Char('+') | KeyCode::Char('=') => cols_per_ms *= 1.3,
                    KeyCode::Char('-') => cols_per_ms = (cols_per_ms / 1.3).max(0.1),
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
                        view.pan(-WHEEL_DELTA);
                    }
                    MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
                        view.pan(WHEEL_DELTA);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn draw_run(
    buf: &mut ratatui::buffer::Buffer,
    area: &Rect,
    col0: i64,
    row: i64,
    width: i64,
    color: ThemeToken,
) {
    for i in 0..width {
        draw_cell(buf, area, col0 + i, row, '█', color);
    }
}

fn draw_cell(
    buf: &mut ratatui::buffer::Buffer,
    area: &Rect,
    col: i64,
    row: i64,
    ch: char,
    color: ThemeToken,
) {
    if col < 0 || row < 0 || col >= i64::from(area.width) || row >= i64::from(area.height) {
        return;
    }
    let x = area.x + col as u16;
    let y = area.y + row as u16;
    buf[(x, y)]
        .set_char(ch)
        .set_fg(theme_to_color(color))
        .set_bg(Color::Black);
}

fn draw_text(
    buf: &mut ratatui::buffer::Buffer,
    area: &Rect,
    col0: i64,
    row: i64,
    text: &str,
    color: ThemeToken,
) {
    for (i, ch) in text.chars().enumerate() {
        draw_cell(buf, area, col0 + i as i64, row, ch, color);
    }
}
