pub mod layout;
pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;

use crate::app::App;
use ratatui::Frame;

pub fn ui(f: &mut Frame, app: &App) {
    let main_layout = layout::get_main_layout(f.area());
    let body = layout::get_body_layout(main_layout.body_area);

    widgets::now_playing::render(f, body.now_playing, app);
    widgets::status::render(f, body.status, app);
    widgets::stack::render(f, body.stack, app);
    widgets::footer::render(f, main_layout.footer_area, app);

    // Overlays last
    widgets::toast::render(f, app);
}
