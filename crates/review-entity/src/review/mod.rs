//! Review domain entities: the staging queue and the published set.

pub mod id;
pub mod model;
pub mod term;

pub use id::ReviewId;
pub use model::{NewStagedReview, PublishedReview, StagedReview};
pub use term::Term;
