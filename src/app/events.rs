use crate::stack::DisplayState;
use crossterm::event::Event;

pub enum AppEvent {
    Input(Event),
    /// A display read finished
    Refreshed(DisplayState),
    /// A display read could not run at all
    RefreshFailed(String),
    /// Status line for a finished action
    ActionDone(String),
    /// Periodic poll of the remote state
    RefreshDue,
    /// Redraw tick for progress and toasts
    Tick,
}
