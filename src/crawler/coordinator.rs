//! Harvest coordinator - run-level orchestration
//!
//! This module ties a run together:
//! - Starting one rendering session per worker (the only fatal step)
//! - Running the walkers concurrently over a shared category queue
//! - Catching Ctrl-C and worker panics so partial results still reach disk
//! - Releasing every session
//! - Writing the output file and assembling the run summary

use crate::config::{Config, RendererKind};
use crate::crawler::http::HttpSessions;
use crate::crawler::pacing::Pacer;
use crate::crawler::parser::HtmlParser;
use crate::crawler::walker::{CategoryQueue, WalkPlan, Walker};
use crate::crawler::webdriver::WebDriverSessions;
use crate::crawler::{PageRenderer, SessionFactory};
use crate::model::{CrawlError, ListingRecord};
use crate::output::{distinct_dealerships, output_path, ErrorLog, ResultSink, RunStats, RunSummary};
use crate::search::{AxisSpace, SearchUrlBuilder};
use crate::{HarvestError, Result};
use chrono::{Local, NaiveDate};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub summary: RunSummary,

    /// Records in the order they were collected
    pub records: Vec<ListingRecord>,

    /// Recoverable failures, in the order they were logged
    pub errors: Vec<CrawlError>,
}

/// Orchestrates one harvest run
pub struct Harvester {
    axes: AxisSpace,
    plan: WalkPlan<HtmlParser>,
    workers: usize,
    output_path: PathBuf,
}

impl Harvester {
    /// Creates a harvester for a run starting today
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The base URL or a selector could not be compiled
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_date(config, Local::now().date_naive())
    }

    /// Creates a harvester whose records are stamped with `date`
    pub fn with_date(config: &Config, date: NaiveDate) -> Result<Self> {
        let axes = AxisSpace::from_config(&config.axes);

        let plan = WalkPlan {
            brackets: axes.brackets().to_vec(),
            urls: SearchUrlBuilder::new(&config.search)?,
            parser: HtmlParser::new(&config.selectors)?,
            sink: ResultSink::new(),
            errors: ErrorLog::new(&config.output.error_log),
            date_collected: date,
            max_pages: config.crawler.max_pages,
            pacer: Pacer::from_config(&config.crawler),
        };

        Ok(Self {
            output_path: output_path(Path::new(&config.output.directory), date),
            workers: config.crawler.workers.max(1) as usize,
            axes,
            plan,
        })
    }

    pub fn axes(&self) -> &AxisSpace {
        &self.axes
    }

    /// Where the output file will be written
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs the harvest with sessions from `factory`
    ///
    /// The output file is written whenever the walk ends, including after Ctrl-C or a
    /// worker panic. It is not written when a session fails to start.
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - The walk finished or was interrupted, and the file was written
    /// * `Err(HarvestError::Session)` - A session could not be started; nothing was written
    /// * `Err(HarvestError::Worker)` - A walker panicked; the partial file was written
    /// * `Err(HarvestError)` - The output file could not be written
    pub async fn run<F: SessionFactory>(self, factory: &F) -> Result<HarvestReport> {
        self.run_until(factory, interrupt()).await
    }

    /// Runs the harvest until every category is walked or `shutdown` resolves
    ///
    /// When `shutdown` resolves first, walks in progress are dropped at their current
    /// page, every session is released and the records collected so far are written.
    /// The summary is then marked as interrupted.
    pub async fn run_until<F, S>(self, factory: &F, shutdown: S) -> Result<HarvestReport>
    where
        F: SessionFactory,
        S: Future<Output = ()>,
    {
        let started = Instant::now();

        for gap in self.axes.gaps() {
            tracing::warn!(
                "Mileage brackets leave {} uncovered; listings in that range are not searched",
                gap
            );
        }

        let workers = self.workers.min(self.axes.categories().len()).max(1);
        tracing::info!(
            "Walking {} categories x {} mileage brackets (up to {} pages each) with {} worker(s)",
            self.axes.categories().len(),
            self.axes.brackets().len(),
            self.plan.max_pages,
            workers
        );

        let mut renderers = Vec::with_capacity(workers);
        for worker in 0..workers {
            match factory.start(worker).await {
                Ok(renderer) => renderers.push(renderer),
                Err(e) => {
                    tracing::error!("Failed to start session {}: {}", worker, e);
                    release_all(renderers).await;
                    return Err(e.into());
                }
            }
        }

        let queue = CategoryQueue::new(self.axes.categories().iter().cloned());
        let mut worker_stats = vec![RunStats::default(); renderers.len()];
        let mut panicked = Vec::new();

        let interrupted = {
            let plan = &self.plan;
            let queue = &queue;

            let walks = renderers
                .iter_mut()
                .zip(worker_stats.iter_mut())
                .enumerate()
                .map(move |(worker, (renderer, stats))| async move {
                    let mut walker = Walker::new(worker, plan, renderer, stats);
                    AssertUnwindSafe(walker.run(queue))
                        .catch_unwind()
                        .await
                        .err()
                        .map(|payload| (worker, panic_message(payload.as_ref())))
                });

            tokio::select! {
                results = join_all(walks) => {
                    panicked = results.into_iter().flatten().collect();
                    false
                }
                _ = shutdown => {
                    tracing::warn!(
                        "Interrupted; {} categories were never started",
                        queue.remaining()
                    );
                    true
                }
            }
        };

        release_all(renderers).await;

        let mut stats = RunStats::default();
        for worker in &worker_stats {
            stats.merge(worker);
        }

        let records_written = self.plan.sink.write_tsv(&self.output_path)?;
        tracing::info!(
            "Wrote {} records to {}",
            records_written,
            self.output_path.display()
        );

        if let Some((worker, message)) = panicked.into_iter().next() {
            tracing::error!("Worker {} panicked: {}", worker, message);
            return Err(HarvestError::Worker { worker, message });
        }

        let records = self.plan.sink.snapshot();
        let errors = self.plan.errors.entries();

        let summary = RunSummary {
            stats,
            records_written,
            errors: errors.len(),
            dealerships: distinct_dealerships(&records),
            output_path: self.output_path,
            elapsed: started.elapsed(),
            interrupted,
        };

        Ok(HarvestReport {
            summary,
            records,
            errors,
        })
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn release_all<R: PageRenderer>(renderers: Vec<R>) {
    for renderer in renderers {
        renderer.release().await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "walker panicked".to_string()
    }
}

/// Runs a complete harvest with the renderer engine named in the configuration
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(HarvestReport)` - The run completed (or was interrupted) and the file was written
/// * `Err(HarvestError)` - The run could not start or its output could not be written
///
/// # Example
///
/// ```no_run
/// use autotrader_harvest::config::load_config;
/// use autotrader_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = run_harvest(config).await?;
/// println!("{} records", report.summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<HarvestReport> {
    let harvester = Harvester::new(&config)?;

    match config.browser.engine {
        RendererKind::Webdriver => {
            let sessions = WebDriverSessions::new(config.browser, config.selectors);
            harvester.run(&sessions).await
        }
        RendererKind::Http => {
            let sessions = HttpSessions::new(config.browser, &config.selectors)?;
            harvester.run(&sessions).await
        }
    }
}
