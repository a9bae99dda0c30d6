use serde::Deserialize;

/// Main configuration structure for a harvest run
///
/// Every section is optional in the TOML file; missing sections fall back to the
/// settings of the reference run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub axes: AxesConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Search parameters that stay constant for the whole run
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Search results endpoint the query string is appended to
    pub base_url: String,

    /// Postcode the search radius is centred on
    pub postcode: String,

    /// Lower price bound (inclusive)
    pub price_from: u32,

    /// Upper price bound (inclusive)
    pub price_to: u32,

    /// Search radius in miles
    pub radius: u32,

    /// Sort order understood by the site
    pub sort: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.autotrader.co.uk/bike-search".to_string(),
            postcode: "SO19 9QZ".to_string(),
            price_from: 1000,
            price_to: 100_000,
            radius: 200,
            sort: "most-recent".to_string(),
        }
    }
}

/// The two enumerable search axes
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AxesConfig {
    /// Body types, walked in the listed order
    pub categories: Vec<String>,

    /// `[min, max)` mileage ranges, walked in the listed order
    pub mileage_brackets: Vec<[u32; 2]>,
}

impl Default for AxesConfig {
    fn default() -> Self {
        let categories = [
            "Adventure",
            "Classic",
            "Commuter",
            "Custom Cruiser",
            "E-Bike",
            "Enduro",
            "Minibike",
            "Moped",
            "Motocrosser",
            "Naked",
            "Roadster",
            "Roadster/Retro",
            "Scooter",
            "Special",
            "Sports Tourer",
            "Super Moto",
            "Super Sports",
            "Supermoto-Road",
            "Three Wheeler",
            "Tourer",
            "Trail (Enduro)",
            "Trail Bike",
            "Trial Bike",
            "Trials Bike",
        ];

        // Gaps between 20k-30k, 40k-50k, 60k-70k and 80k-90k are reported at startup.
        let mileage_brackets = vec![
            [0, 1_000],
            [1_000, 5_000],
            [5_000, 10_000],
            [10_000, 20_000],
            [30_000, 40_000],
            [50_000, 60_000],
            [70_000, 80_000],
            [90_000, 250_000],
        ];

        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            mileage_brackets,
        }
    }
}

/// Traversal and pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Hard ceiling on page numbers walked within one bracket (inclusive)
    pub max_pages: u32,

    /// Number of browser sessions walking categories in parallel
    pub workers: u32,

    /// Lower bound of the pause after a page with listings (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the pause after a page with listings (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            workers: 1,
            min_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Which renderer drives page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// A real browser behind a WebDriver endpoint
    Webdriver,
    /// Plain HTTP GET, for server-rendered pages and fixtures
    Http,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub engine: RendererKind,

    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    pub webdriver_url: String,

    /// Run the browser without a window
    pub headless: bool,

    /// How long to wait for the results container to appear (seconds)
    pub render_timeout_secs: u64,

    /// Extra command-line arguments passed to the browser
    pub args: Vec<String>,

    /// User agent for the HTTP engine
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: RendererKind::Webdriver,
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
            render_timeout_secs: 10,
            args: Vec::new(),
            user_agent: format!("autotrader-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// CSS selectors locating the parts of a search results page
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Element whose presence means the results have rendered
    pub results_container: String,

    /// One element per listing
    pub listing: String,

    /// Title link inside a listing
    pub title_link: String,

    /// Heading inside the title link carrying the name
    pub title_heading: String,

    pub price: String,
    pub dealership: String,

    /// Items of the specification list
    pub spec_item: String,

    pub seller: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            results_container: r#"[data-testid="advertCard"]"#.to_string(),
            listing: r#"div[data-testid="trader-seller-listing"]"#.to_string(),
            title_link: r#"a[data-testid="search-listing-title"]"#.to_string(),
            title_heading: "h3".to_string(),
            price: "span.at__sc-1mc7cl3-7.icLPGk".to_string(),
            dealership: "span.at__sc-1n64n0d-9.at__sc-1mc7cl3-15.kLylrw.ideECV".to_string(),
            spec_item: r#"ul[data-testid="search-listing-specs"] li"#.to_string(),
            seller: r#"p[data-testid="search-listing-seller"]"#.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the dated data file is written into
    pub directory: String,

    /// Append-only error log file
    pub error_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "autotrader_raw_data".to_string(),
            error_log: "error_log.txt".to_string(),
        }
    }
}
