use crate::search::SearchSlot;
use chrono::{DateTime, Local};
use std::fmt;

/// Where in the search space a failure happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisContext {
    pub slot: SearchSlot,
    pub page: u32,

    /// Position of the listing on the page, when the failure concerns one listing
    pub listing: Option<usize>,
}

impl AxisContext {
    pub fn page(slot: &SearchSlot, page: u32) -> Self {
        Self {
            slot: slot.clone(),
            page,
            listing: None,
        }
    }

    pub fn listing(&self, index: usize) -> Self {
        Self {
            listing: Some(index),
            ..self.clone()
        }
    }
}

impl fmt::Display for AxisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}-{}, page {}",
            self.slot.category, self.slot.bracket.min, self.slot.bracket.max, self.page
        )?;
        if let Some(index) = self.listing {
            write!(f, ", listing {}", index + 1)?;
        }
        Ok(())
    }
}

/// A recoverable failure recorded during a run
///
/// Errors are diagnostic only: they are written to the error log and reported at the end,
/// never consulted to make traversal decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlError {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub context: Option<AxisContext>,
}

impl CrawlError {
    pub fn new(message: impl Into<String>, context: Option<AxisContext>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            context,
        }
    }

    /// A page could not be fetched or parsed
    pub fn page(context: AxisContext, cause: impl fmt::Display) -> Self {
        let message = format!(
            "Error on page {} for {}, {}: {}",
            context.page, context.slot.category, context.slot.bracket, cause
        );
        Self::new(message, Some(context))
    }

    /// One field of one listing could not be extracted
    pub fn field(context: AxisContext, field: &str, cause: impl fmt::Display) -> Self {
        let message = format!("Data extraction error ({}) at {}: {}", field, context, cause);
        Self::new(message, Some(context))
    }

    /// Formats the error as one error-log line (without the trailing newline)
    pub fn log_line(&self) -> String {
        format!(
            "{} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.message
        )
    }
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
