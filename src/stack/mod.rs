pub mod controller;
pub mod frame;

pub use controller::{
    ControllerOptions, DisplayState, NavigationController, NowPlaying, AD_HOC_LABEL, EMPTY_STACK,
    EMPTY_STACK_LINE, NO_PLAYBACK, TOP_QUEUE_LABEL,
};
pub use frame::{Frame, FrameTarget, MAX_RESUME_TRACKS};
