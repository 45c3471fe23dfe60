mod input;
mod loop_runner;
mod metrics;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{
    run_session, AppError, FrameHooks, InputSource, LoopConfig, SessionCommand, SessionSummary,
    StopReason,
};
pub use metrics::LoopMetricsSnapshot;
