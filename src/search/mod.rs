//! Search space module
//!
//! This module describes what a run walks: the category and mileage-bracket axes, the
//! (category, bracket) slots they form, and the search URL for each page of a slot.

mod axis;
mod query;

pub use axis::{AxisSpace, MileageBracket, SearchSlot};
pub use query::SearchUrlBuilder;
