use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct MainLayout {
    pub body_area: Rect,
    pub footer_area: Rect,
}

pub fn get_main_layout(area: Rect) -> MainLayout {
    // Footer needs 1 line at the bottom always
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    MainLayout {
        body_area: chunks[0],
        footer_area: chunks[1],
    }
}

pub struct BodyLayout {
    pub now_playing: Rect,
    pub status: Rect,
    pub stack: Rect,
}

/// Now-playing card on top, status line, then the stack taking the rest
pub fn get_body_layout(area: Rect) -> BodyLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title, context, depth, progress
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Stack frames
        ])
        .split(area);

    BodyLayout {
        now_playing: chunks[0],
        status: chunks[1],
        stack: chunks[2],
    }
}
