use crate::config::AxesConfig;
use std::fmt;

/// A half-open `[min, max)` mileage range searched as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MileageBracket {
    pub min: u32,
    pub max: u32,
}

impl MileageBracket {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for MileageBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// One (category, bracket) pair of the search space
///
/// Pages within a slot are always walked in order by a single worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchSlot {
    pub category: String,
    pub bracket: MileageBracket,
}

impl SearchSlot {
    pub fn new(category: impl Into<String>, bracket: MileageBracket) -> Self {
        Self {
            category: category.into(),
            bracket,
        }
    }
}

impl fmt::Display for SearchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Mileage: {}", self.category, self.bracket)
    }
}

/// The enumerable part of the search: categories × mileage brackets
///
/// Both axes are walked in the order given; nothing is shuffled or deduplicated here
/// (configuration validation rejects duplicates and overlaps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSpace {
    categories: Vec<String>,
    brackets: Vec<MileageBracket>,
}

impl AxisSpace {
    pub fn new(categories: Vec<String>, brackets: Vec<MileageBracket>) -> Self {
        Self {
            categories,
            brackets,
        }
    }

    /// Builds the axis space from the `[axes]` configuration section
    pub fn from_config(config: &AxesConfig) -> Self {
        let brackets = config
            .mileage_brackets
            .iter()
            .map(|[min, max]| MileageBracket::new(*min, *max))
            .collect();

        Self::new(config.categories.clone(), brackets)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn brackets(&self) -> &[MileageBracket] {
        &self.brackets
    }

    /// Number of (category, bracket) slots
    pub fn slot_count(&self) -> usize {
        self.categories.len() * self.brackets.len()
    }

    /// Every slot in traversal order: categories outer, brackets inner
    pub fn slots(&self) -> impl Iterator<Item = SearchSlot> + '_ {
        self.categories.iter().flat_map(move |category| {
            self.brackets
                .iter()
                .map(move |bracket| SearchSlot::new(category.clone(), *bracket))
        })
    }

    /// Mileage ranges between consecutive brackets that no bracket covers
    ///
    /// # Examples
    ///
    /// ```
    /// use autotrader_harvest::search::{AxisSpace, MileageBracket};
    ///
    /// let axes = AxisSpace::new(
    ///     vec!["Naked".to_string()],
    ///     vec![MileageBracket::new(0, 1000), MileageBracket::new(5000, 9000)],
    /// );
    /// assert_eq!(axes.gaps(), vec![MileageBracket::new(1000, 5000)]);
    /// ```
    pub fn gaps(&self) -> Vec<MileageBracket> {
        self.brackets
            .windows(2)
            .filter(|pair| pair[1].min > pair[0].max)
            .map(|pair| MileageBracket::new(pair[0].max, pair[1].min))
            .collect()
    }
}
