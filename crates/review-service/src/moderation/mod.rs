//! Review moderation: staging, acceptance, and rejection.

pub mod service;
pub mod submission;

pub use service::ModerationService;
pub use submission::ReviewSubmission;
