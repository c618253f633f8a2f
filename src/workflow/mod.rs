pub mod privacy_flow;
pub mod video_ctx;

pub use privacy_flow::{selectors, PrivacyFlow, ProcessResult};
pub use video_ctx::VideoCtx;
