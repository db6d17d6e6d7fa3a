pub mod clock;
pub mod entity_service;
pub mod merge;
pub mod resolve;

pub use entity_service::*;
pub use merge::{merge_patch, MergeOutcome};
pub use resolve::ReferenceResolver;
