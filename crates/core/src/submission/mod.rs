//! Contact form to FileMaker submission flow

pub mod bridge;
pub mod feedback;
pub mod format;

pub use bridge::FormSubmissionBridge;
pub use feedback::{SubmissionFeedback, SubmissionStatus};
