pub mod footer;
pub mod now_playing;
pub mod stack;
pub mod status;
pub mod toast;
