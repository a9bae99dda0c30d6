//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `WalkState`: where a walker is in the search space and what it does next
//! - `PageOutcome`: what one page request meant for traversal
//! - `AbandonReason`: why a bracket was left early

mod walk_state;

pub use walk_state::{AbandonReason, PageOutcome, WalkState};
