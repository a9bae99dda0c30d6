//! Pagination walker
//!
//! One walker per worker. A walker claims whole categories from the shared queue and drives
//! the `WalkState` machine over their brackets and pages:
//!
//! - a page whose results never render, or that renders empty, ends the bracket
//! - a page that fails to fetch or parse is logged and the next page is tried
//! - a page with listings is extracted, appended to the sink, then paced
//!
//! Nothing a walker encounters while walking is fatal.

use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{FetchResult, PageRenderer};
use crate::crawler::pacing::Pacer;
use crate::crawler::parser::MarkupParser;
use crate::model::{AxisContext, CrawlError};
use crate::output::{ErrorLog, ResultSink, RunStats};
use crate::search::{MileageBracket, SearchSlot, SearchUrlBuilder};
use crate::state::{PageOutcome, WalkState};
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Categories not yet claimed by any worker, in configured order
#[derive(Debug, Default)]
pub struct CategoryQueue {
    pending: Mutex<VecDeque<String>>,
}

impl CategoryQueue {
    pub fn new(categories: impl IntoIterator<Item = String>) -> Self {
        Self {
            pending: Mutex::new(categories.into_iter().collect()),
        }
    }

    /// Takes the next category, or `None` once every category has been claimed
    pub fn claim(&self) -> Option<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Everything the walkers of a run share
pub struct WalkPlan<P> {
    pub brackets: Vec<MileageBracket>,
    pub urls: SearchUrlBuilder,
    pub parser: P,
    pub sink: ResultSink,
    pub errors: ErrorLog,

    /// Stamped on every record of the run
    pub date_collected: NaiveDate,

    /// Last page requested in a bracket (inclusive)
    pub max_pages: u32,

    pub pacer: Pacer,
}

/// Drives one renderer through the categories it claims
pub struct Walker<'a, P, R> {
    worker: usize,
    plan: &'a WalkPlan<P>,
    renderer: &'a mut R,
    stats: &'a mut RunStats,
}

impl<'a, P, R> Walker<'a, P, R>
where
    P: MarkupParser,
    R: PageRenderer,
{
    /// Creates a walker for worker `worker`
    ///
    /// # Arguments
    ///
    /// * `worker` - Worker index, used in log lines
    /// * `plan` - Shared run state
    /// * `renderer` - This worker's page renderer
    /// * `stats` - Counters owned by this worker; they stay readable if the walk is cut short
    pub fn new(
        worker: usize,
        plan: &'a WalkPlan<P>,
        renderer: &'a mut R,
        stats: &'a mut RunStats,
    ) -> Self {
        Self {
            worker,
            plan,
            renderer,
            stats,
        }
    }

    /// Walks until the queue is drained
    pub async fn run(&mut self, queue: &CategoryQueue) {
        let mut state = WalkState::NextCategory;

        while !state.is_terminal() {
            tracing::trace!("[worker {}] state: {}", self.worker, state);
            state = self.step(state, queue).await;
        }

        tracing::info!("[worker {}] No categories left", self.worker);
    }

    async fn step(&mut self, state: WalkState, queue: &CategoryQueue) -> WalkState {
        match state {
            WalkState::NextCategory => {
                let category = queue.claim();
                if let Some(category) = &category {
                    tracing::info!("[worker {}] Scraping listings for {}", self.worker, category);
                }
                WalkState::claim_category(category)
            }

            WalkState::NextBracket { category, index } => {
                if let Some(bracket) = self.plan.brackets.get(index) {
                    tracing::info!(
                        "[worker {}] {} | Mileage: {}",
                        self.worker,
                        category,
                        bracket
                    );
                }
                WalkState::enter_bracket(category, index, &self.plan.brackets)
            }

            WalkState::NextPage {
                slot,
                bracket_index,
                page,
            } => {
                let outcome = self.visit(&slot, page).await;
                self.stats.record_page(outcome);
                WalkState::after_page(slot, bracket_index, page, outcome, self.plan.max_pages)
            }

            WalkState::AbandonBracket {
                slot,
                bracket_index,
                reason,
            } => {
                tracing::info!(
                    "[worker {}] Leaving {} ({})",
                    self.worker,
                    slot,
                    reason
                );
                self.stats.record_abandon(reason);
                WalkState::leave_bracket(slot, bracket_index)
            }

            WalkState::Done => WalkState::Done,
        }
    }

    /// Requests one page and turns the result into a traversal outcome
    async fn visit(&mut self, slot: &SearchSlot, page: u32) -> PageOutcome {
        let url = self.plan.urls.url_for(slot, page);
        let context = AxisContext::page(slot, page);

        tracing::debug!("[worker {}] Fetching {}", self.worker, url);

        let rendered = match self.renderer.render(&url).await {
            FetchResult::Rendered(rendered) => rendered,
            FetchResult::Timeout => {
                tracing::info!(
                    "[worker {}] Page {} of {} did not render in time",
                    self.worker,
                    page,
                    slot
                );
                return PageOutcome::Timeout;
            }
            FetchResult::Failed { error } => {
                self.plan.errors.record(CrawlError::page(context, error));
                return PageOutcome::Failed;
            }
        };

        let extraction = match extract(
            &self.plan.parser,
            &rendered,
            &context,
            self.plan.date_collected,
        ) {
            Ok(extraction) => extraction,
            Err(e) => {
                self.plan.errors.record(CrawlError::page(context, e));
                return PageOutcome::Failed;
            }
        };

        self.plan.errors.record_all(extraction.errors);

        let count = extraction.records.len();
        if count == 0 {
            tracing::info!("[worker {}] No listings on page {} of {}", self.worker, page, slot);
            return PageOutcome::Empty;
        }

        self.plan.sink.append(extraction.records);
        tracing::info!(
            "[worker {}] Page {} of {}: {} listings ({} collected)",
            self.worker,
            page,
            slot,
            count,
            self.plan.sink.len()
        );

        self.plan.pacer.pause().await;

        PageOutcome::Listings(count)
    }
}
