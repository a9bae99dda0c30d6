//! Traversal state definitions for the pagination walker
//!
//! The walker is an explicit state machine. The transitions live here as pure functions so
//! the two failure paths (abandon the bracket vs. move on to the next page) stay distinct
//! and can be tested without a browser.

use crate::search::{MileageBracket, SearchSlot};
use std::fmt;

/// Why a bracket was left before running out of pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbandonReason {
    /// The results container never rendered
    Timeout,
    /// The page rendered but held no listings
    NoListings,
    /// The page ceiling was reached
    PageCeiling,
}

impl AbandonReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::NoListings => "no_listings",
            Self::PageCeiling => "page_ceiling",
        }
    }
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to one page request, as far as traversal is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page rendered and yielded this many listings (at least one)
    Listings(usize),
    /// The page rendered without listing elements
    Empty,
    /// The results container did not appear in time
    Timeout,
    /// Fetching or parsing failed; recorded as an error
    Failed,
}

/// Current position of a walker in the search space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// Claim the next category to walk
    NextCategory,

    /// Enter the bracket at `index` of the current category
    NextBracket { category: String, index: usize },

    /// Request `page` of the slot
    NextPage {
        slot: SearchSlot,
        bracket_index: usize,
        page: u32,
    },

    /// Leave the slot and move to the following bracket
    AbandonBracket {
        slot: SearchSlot,
        bracket_index: usize,
        reason: AbandonReason,
    },

    /// Nothing left to walk
    Done,
}

impl WalkState {
    /// Transition out of `NextCategory`
    pub fn claim_category(category: Option<String>) -> Self {
        match category {
            Some(category) => Self::NextBracket { category, index: 0 },
            None => Self::Done,
        }
    }

    /// Transition out of `NextBracket`: the first page of the bracket, or the next category
    /// once every bracket has been walked
    pub fn enter_bracket(category: String, index: usize, brackets: &[MileageBracket]) -> Self {
        match brackets.get(index) {
            Some(bracket) => Self::NextPage {
                slot: SearchSlot::new(category, *bracket),
                bracket_index: index,
                page: 1,
            },
            None => Self::NextCategory,
        }
    }

    /// Transition out of `NextPage`
    ///
    /// | Outcome | Next state |
    /// |---------|------------|
    /// | Listings | next page (or abandon at the ceiling) |
    /// | Failed | next page (or abandon at the ceiling) |
    /// | Empty | abandon bracket |
    /// | Timeout | abandon bracket |
    pub fn after_page(
        slot: SearchSlot,
        bracket_index: usize,
        page: u32,
        outcome: PageOutcome,
        max_pages: u32,
    ) -> Self {
        let abandon = |slot: SearchSlot, reason: AbandonReason| Self::AbandonBracket {
            slot,
            bracket_index,
            reason,
        };

        match outcome {
            PageOutcome::Empty => abandon(slot, AbandonReason::NoListings),
            PageOutcome::Timeout => abandon(slot, AbandonReason::Timeout),
            PageOutcome::Listings(_) | PageOutcome::Failed => {
                if page >= max_pages {
                    abandon(slot, AbandonReason::PageCeiling)
                } else {
                    Self::NextPage {
                        slot,
                        bracket_index,
                        page: page + 1,
                    }
                }
            }
        }
    }

    /// Transition out of `AbandonBracket`
    pub fn leave_bracket(slot: SearchSlot, bracket_index: usize) -> Self {
        Self::NextBracket {
            category: slot.category,
            index: bracket_index + 1,
        }
    }

    /// Returns true once the walker has nothing left to do
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextCategory => "next_category",
            Self::NextBracket { .. } => "next_bracket",
            Self::NextPage { .. } => "next_page",
            Self::AbandonBracket { .. } => "abandon_bracket",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets() -> Vec<MileageBracket> {
        vec![MileageBracket::new(0, 1000), MileageBracket::new(1000, 5000)]
    }

    fn slot() -> SearchSlot {
        SearchSlot::new("Naked", MileageBracket::new(0, 1000))
    }

    #[test]
    fn test_claim_category() {
        assert_eq!(
            WalkState::claim_category(Some("Naked".to_string())),
            WalkState::NextBracket {
                category: "Naked".to_string(),
                index: 0
            }
        );
        assert_eq!(WalkState::claim_category(None), WalkState::Done);
    }

    #[test]
    fn test_enter_bracket_starts_at_page_one() {
        let state = WalkState::enter_bracket("Naked".to_string(), 1, &brackets());
        assert_eq!(
            state,
            WalkState::NextPage {
                slot: SearchSlot::new("Naked", MileageBracket::new(1000, 5000)),
                bracket_index: 1,
                page: 1,
            }
        );
    }

    #[test]
    fn test_enter_bracket_past_last_moves_to_next_category() {
        let state = WalkState::enter_bracket("Naked".to_string(), 2, &brackets());
        assert_eq!(state, WalkState::NextCategory);
    }

    #[test]
    fn test_listings_advance_page() {
        let state = WalkState::after_page(slot(), 0, 3, PageOutcome::Listings(20), 100);
        assert_eq!(
            state,
            WalkState::NextPage {
                slot: slot(),
                bracket_index: 0,
                page: 4
            }
        );
    }

    #[test]
    fn test_failed_page_advances_instead_of_abandoning() {
        let state = WalkState::after_page(slot(), 0, 3, PageOutcome::Failed, 100);
        assert!(matches!(state, WalkState::NextPage { page: 4, .. }));
    }

    #[test]
    fn test_empty_and_timeout_abandon_bracket() {
        let state = WalkState::after_page(slot(), 0, 1, PageOutcome::Empty, 100);
        assert!(matches!(
            state,
            WalkState::AbandonBracket {
                reason: AbandonReason::NoListings,
                ..
            }
        ));

        let state = WalkState::after_page(slot(), 0, 1, PageOutcome::Timeout, 100);
        assert!(matches!(
            state,
            WalkState::AbandonBracket {
                reason: AbandonReason::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn test_ceiling_abandons_bracket() {
        let state = WalkState::after_page(slot(), 0, 100, PageOutcome::Listings(1), 100);
        assert!(matches!(
            state,
            WalkState::AbandonBracket {
                reason: AbandonReason::PageCeiling,
                ..
            }
        ));

        let state = WalkState::after_page(slot(), 0, 100, PageOutcome::Failed, 100);
        assert!(matches!(
            state,
            WalkState::AbandonBracket {
                reason: AbandonReason::PageCeiling,
                ..
            }
        ));
    }

    #[test]
    fn test_leave_bracket_moves_to_following_bracket() {
        assert_eq!(
            WalkState::leave_bracket(slot(), 0),
            WalkState::NextBracket {
                category: "Naked".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(WalkState::Done.is_terminal());
        assert!(!WalkState::NextCategory.is_terminal());
        assert_eq!(WalkState::NextCategory.to_string(), "next_category");
        assert_eq!(AbandonReason::PageCeiling.to_string(), "page_ceiling");
    }
}
