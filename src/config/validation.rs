use crate::config::types::{
    AxesConfig, BrowserConfig, Config, CrawlerConfig, OutputConfig, SearchConfig, SelectorConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Upper bound on `max-pages`; no bracket is walked past page 100
pub const PAGE_CEILING: u32 = 100;

/// Upper bound on parallel browser sessions
pub const MAX_WORKERS: u32 = 16;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_axes_config(&config.axes)?;
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the constant search parameters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.postcode.trim().is_empty() {
        return Err(ConfigError::Validation(
            "postcode cannot be empty".to_string(),
        ));
    }

    if config.price_from > config.price_to {
        return Err(ConfigError::Validation(format!(
            "price-from ({}) must not exceed price-to ({})",
            config.price_from, config.price_to
        )));
    }

    if config.radius == 0 {
        return Err(ConfigError::Validation(
            "radius must be at least 1 mile".to_string(),
        ));
    }

    if config.sort.trim().is_empty() {
        return Err(ConfigError::Validation("sort cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates the category list and the mileage brackets
///
/// Brackets must be non-empty `[min, max)` ranges in ascending, non-overlapping order.
/// Gaps between brackets are allowed; they are reported when the run starts.
fn validate_axes_config(config: &AxesConfig) -> Result<(), ConfigError> {
    if config.categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in &config.categories {
        if category.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category names cannot be empty".to_string(),
            ));
        }
        if !seen.insert(category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' is listed more than once",
                category
            )));
        }
    }

    if config.mileage_brackets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one mileage bracket is required".to_string(),
        ));
    }

    for [min, max] in &config.mileage_brackets {
        if min >= max {
            return Err(ConfigError::Validation(format!(
                "mileage bracket [{}, {}) is empty",
                min, max
            )));
        }
    }

    for pair in config.mileage_brackets.windows(2) {
        let [_, prev_max] = pair[0];
        let [next_min, _] = pair[1];
        if next_min < prev_max {
            return Err(ConfigError::Validation(format!(
                "mileage brackets must be ascending and disjoint: [{}, {}) overlaps or precedes [{}, {})",
                pair[0][0], pair[0][1], pair[1][0], pair[1][1]
            )));
        }
    }

    Ok(())
}

/// Validates traversal and pacing settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > PAGE_CEILING {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and {}, got {}",
            PAGE_CEILING, config.max_pages
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates browser session settings
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    if config.render_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "render-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every selector parses as CSS
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("results-container", &config.results_container),
        ("listing", &config.listing),
        ("title-link", &config.title_link),
        ("title-heading", &config.title_heading),
        ("price", &config.price),
        ("dealership", &config.dealership),
        ("spec-item", &config.spec_item),
        ("seller", &config.seller),
    ];

    for (name, selector) in selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                name,
                selector: selector.clone(),
            });
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.error_log.is_empty() {
        return Err(ConfigError::Validation(
            "error-log cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_price_range() {
        let mut search = SearchConfig::default();
        search.price_from = 5000;
        search.price_to = 4000;
        assert!(validate_search_config(&search).is_err());

        search.price_to = 5000;
        assert!(validate_search_config(&search).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut search = SearchConfig::default();
        search.base_url = "not a url".to_string();
        assert!(matches!(
            validate_search_config(&search),
            Err(ConfigError::InvalidUrl(_))
        ));

        search.base_url = "ftp://example.com/search".to_string();
        assert!(validate_search_config(&search).is_err());
    }

    #[test]
    fn test_validate_duplicate_category() {
        let axes = AxesConfig {
            categories: vec!["Naked".to_string(), "Naked".to_string()],
            mileage_brackets: vec![[0, 1000]],
        };
        assert!(validate_axes_config(&axes).is_err());
    }

    #[test]
    fn test_validate_brackets() {
        let mut axes = AxesConfig {
            categories: vec!["Naked".to_string()],
            mileage_brackets: vec![[0, 1000], [1000, 5000], [10000, 20000]],
        };
        // Touching and gapped brackets are both fine
        assert!(validate_axes_config(&axes).is_ok());

        axes.mileage_brackets = vec![[0, 1000], [500, 5000]];
        assert!(validate_axes_config(&axes).is_err());

        axes.mileage_brackets = vec![[5000, 10000], [0, 1000]];
        assert!(validate_axes_config(&axes).is_err());

        axes.mileage_brackets = vec![[1000, 1000]];
        assert!(validate_axes_config(&axes).is_err());

        axes.mileage_brackets = vec![];
        assert!(validate_axes_config(&axes).is_err());
    }

    #[test]
    fn test_validate_crawler_limits() {
        let mut crawler = CrawlerConfig::default();
        crawler.max_pages = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_pages = PAGE_CEILING + 1;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_pages = PAGE_CEILING;
        crawler.min_delay_ms = 20;
        crawler.max_delay_ms = 10;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_delay_ms = 20;
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_validate_selectors() {
        let mut selectors = SelectorConfig::default();
        assert!(validate_selectors(&selectors).is_ok());

        selectors.price = "span[[".to_string();
        assert!(matches!(
            validate_selectors(&selectors),
            Err(ConfigError::InvalidSelector { name: "price", .. })
        ));
    }
}
