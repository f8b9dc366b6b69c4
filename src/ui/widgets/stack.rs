use crate::app::App;
use crate::stack::EMPTY_STACK_LINE;
use crate::ui::utils::truncate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

/// Saved frames, most recent on top 📚
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .title(" Stack Frames ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.magenta));

    let width = block.inner(area).width as usize;
    let items: Vec<ListItem> = app
        .stack_lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if line == EMPTY_STACK_LINE {
                Style::default().fg(theme.overlay).add_modifier(Modifier::ITALIC)
            } else if i == 0 {
                // Next frame "hop out" returns to
                Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::styled(truncate(line, width), style))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
