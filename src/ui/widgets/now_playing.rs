use crate::app::App;
use crate::stack::frame::format_mm_ss;
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Track title, where it plays from, stack depth, progress 🎵
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = if app.demo { " Now Playing (demo) " } else { " Now Playing " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.blue))
        .style(Style::default().bg(Color::Reset));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let depth_line = Line::from(Span::styled(
        format!("Stack depth: {}", app.depth),
        Style::default().fg(theme.overlay),
    ));

    let lines = match &app.now_playing {
        Some(now) => {
            let position = app.get_current_position_ms();
            let icon = if now.is_playing { "▶ " } else { "⏸ " };
            vec![
                Line::from(vec![
                    Span::styled(icon, Style::default().fg(theme.green)),
                    Span::styled(
                        truncate(&now.title, width.saturating_sub(2)),
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    truncate(&format!("Context: {} | t={}s", now.source, position / 1000), width),
                    Style::default().fg(theme.cyan),
                )),
                depth_line,
                progress_line(app, position, now.duration_ms, width),
            ]
        }
        None => vec![
            Line::from(Span::styled(
                "No active playback",
                Style::default().fg(theme.overlay).add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            depth_line,
        ],
    };

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn progress_line(app: &App, position: u64, duration: u64, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let time = format!(" {} / {}", format_mm_ss(position), format_mm_ss(duration));
    let bar_width = width.saturating_sub(time.chars().count());

    let ratio = if duration > 0 {
        position as f64 / duration as f64
    } else {
        0.0
    };
    let occupied = (bar_width as f64 * ratio.clamp(0.0, 1.0)) as usize;

    let mut spans = Vec::with_capacity(3);
    if occupied > 0 {
        // Playhead knob at the end of the filled part
        spans.push(Span::styled(
            format!("{}●", "━".repeat(occupied - 1)),
            Style::default().fg(theme.magenta),
        ));
    }
    spans.push(Span::styled(
        "─".repeat(bar_width - occupied),
        Style::default().fg(theme.surface),
    ));
    spans.push(Span::styled(time, Style::default().fg(theme.overlay)));
    Line::from(spans)
}
