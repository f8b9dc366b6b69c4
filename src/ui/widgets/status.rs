use crate::app::App;
use crate::ui::utils::truncate;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let color = if is_error(&app.status) { theme.red } else { theme.green };
    let line = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(color)),
        Span::styled(
            truncate(&app.status, (area.width as usize).saturating_sub(3)),
            Style::default().fg(theme.text),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn is_error(status: &str) -> bool {
    status.starts_with("Error:") || status.starts_with("Refresh error:")
}
