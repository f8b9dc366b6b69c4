use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let keys = &app.keys;

    let mut spans = Vec::new();
    for (key, action) in keys.bindings() {
        spans.push(Span::styled(
            format!(" {} ", keys.display(key)),
            Style::default().fg(theme.overlay).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(action.label(), Style::default().fg(theme.overlay)));
    }
    spans.push(Span::styled(
        format!(" {} ", keys.display(&keys.quit)),
        Style::default().fg(theme.overlay).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("Quit", Style::default().fg(theme.overlay)));

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Left), area);
}
