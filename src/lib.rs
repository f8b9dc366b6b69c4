pub mod app;
pub mod player;
pub mod stack;
pub mod ui;
