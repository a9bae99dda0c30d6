use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use autotrader_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Postcode: {}", config.search.postcode);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(path)?;

    validate(&config)?;

    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// For callers that adjust the configuration before checking it, such as command-line
/// overrides. Run [`validate`] on the result before using it.
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so the output of two runs can be tied to the exact settings used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Parses a configuration without validating it and returns both the config and its hash
pub fn parse_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = parse_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[search]
postcode = "M1 1AE"
price-from = 500
price-to = 20000
radius = 50

[axes]
categories = ["Naked", "Tourer"]
mileage-brackets = [[0, 5000], [5000, 20000]]

[crawler]
max-pages = 10
min-delay-ms = 0
max-delay-ms = 0

[browser]
engine = "http"
render-timeout-secs = 5

[output]
directory = "./out"
error-log = "./errors.txt"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.postcode, "M1 1AE");
        assert_eq!(config.search.price_to, 20000);
        assert_eq!(config.axes.categories, vec!["Naked", "Tourer"]);
        assert_eq!(config.axes.mileage_brackets[1], [5000, 20000]);
        assert_eq!(config.crawler.max_pages, 10);
        assert_eq!(config.browser.engine, RendererKind::Http);
        assert_eq!(config.output.directory, "./out");
        // Untouched sections keep their defaults
        assert_eq!(config.search.sort, "most-recent");
        assert_eq!(config.crawler.workers, 1);
    }

    #[test]
    fn test_empty_config_uses_reference_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.postcode, "SO19 9QZ");
        assert_eq!(config.search.price_from, 1000);
        assert_eq!(config.search.price_to, 100_000);
        assert_eq!(config.search.radius, 200);
        assert_eq!(config.axes.categories.len(), 24);
        assert_eq!(config.axes.mileage_brackets.len(), 8);
        assert_eq!(config.crawler.max_pages, 100);
        assert_eq!(config.browser.render_timeout_secs, 10);
        assert_eq!(config.browser.engine, RendererKind::Webdriver);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_unknown_engine() {
        let file = create_temp_config("[browser]\nengine = \"carrier-pigeon\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_parse_config_skips_validation() {
        let file = create_temp_config("[crawler]\nworkers = 0\n");

        let config = parse_config(file.path()).unwrap();
        assert_eq!(config.crawler.workers, 0);
        assert!(validate(&config).is_err());

        let (config, hash) = parse_config_with_hash(file.path()).unwrap();
        assert_eq!(config.crawler.workers, 0);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[search]\nradius = 10\n");
        let file2 = create_temp_config("[search]\nradius = 20\n");

        let (_, hash1) = parse_config_with_hash(file1.path()).unwrap();
        let (_, hash2) = parse_config_with_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
