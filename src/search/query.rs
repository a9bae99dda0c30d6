use crate::config::SearchConfig;
use crate::search::axis::SearchSlot;
use crate::ConfigError;
use url::Url;

/// Builds fully parameterized search URLs for one run
///
/// The base URL is parsed once; every page URL is the base plus the site's query-string
/// contract: `body-type`, `postcode`, `price-from`, `price-to`, `radius`,
/// `minimum-mileage`, `maximum-mileage`, `page`, `sort`.
#[derive(Debug, Clone)]
pub struct SearchUrlBuilder {
    base: Url,
    search: SearchConfig,
}

impl SearchUrlBuilder {
    pub fn new(search: &SearchConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&search.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        Ok(Self {
            base,
            search: search.clone(),
        })
    }

    /// Returns the URL of `page` (1-based) for the given slot
    ///
    /// # Examples
    ///
    /// ```
    /// use autotrader_harvest::config::SearchConfig;
    /// use autotrader_harvest::search::{MileageBracket, SearchSlot, SearchUrlBuilder};
    ///
    /// let builder = SearchUrlBuilder::new(&SearchConfig::default()).unwrap();
    /// let slot = SearchSlot::new("Naked", MileageBracket::new(0, 1000));
    /// let url = builder.url_for(&slot, 3);
    /// assert!(url.as_str().contains("page=3"));
    /// ```
    pub fn url_for(&self, slot: &SearchSlot, page: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("body-type", &slot.category)
            .append_pair("postcode", &self.search.postcode)
            .append_pair("price-from", &self.search.price_from.to_string())
            .append_pair("price-to", &self.search.price_to.to_string())
            .append_pair("radius", &self.search.radius.to_string())
            .append_pair("minimum-mileage", &slot.bracket.min.to_string())
            .append_pair("maximum-mileage", &slot.bracket.max.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("sort", &self.search.sort);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MileageBracket;
    use std::collections::HashMap;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_url_carries_full_query_contract() {
        let builder = SearchUrlBuilder::new(&SearchConfig::default()).unwrap();
        let slot = SearchSlot::new("Custom Cruiser", MileageBracket::new(1000, 5000));

        let url = builder.url_for(&slot, 7);
        let query = query_map(&url);

        assert_eq!(url.host_str(), Some("www.autotrader.co.uk"));
        assert_eq!(url.path(), "/bike-search");
        assert_eq!(query["body-type"], "Custom Cruiser");
        assert_eq!(query["postcode"], "SO19 9QZ");
        assert_eq!(query["price-from"], "1000");
        assert_eq!(query["price-to"], "100000");
        assert_eq!(query["radius"], "200");
        assert_eq!(query["minimum-mileage"], "1000");
        assert_eq!(query["maximum-mileage"], "5000");
        assert_eq!(query["page"], "7");
        assert_eq!(query["sort"], "most-recent");
        assert_eq!(query.len(), 9);
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let builder = SearchUrlBuilder::new(&SearchConfig::default()).unwrap();
        let slot = SearchSlot::new("Trail (Enduro)", MileageBracket::new(0, 1000));

        let url = builder.url_for(&slot, 1);
        assert!(!url.as_str().contains(' '));
        assert_eq!(query_map(&url)["body-type"], "Trail (Enduro)");
    }

    #[test]
    fn test_base_query_is_replaced() {
        let search = SearchConfig {
            base_url: "https://example.com/search?stale=1".to_string(),
            ..SearchConfig::default()
        };
        let builder = SearchUrlBuilder::new(&search).unwrap();
        let slot = SearchSlot::new("Naked", MileageBracket::new(0, 1000));

        let query = query_map(&builder.url_for(&slot, 1));
        assert!(!query.contains_key("stale"));
    }

    #[test]
    fn test_invalid_base_url() {
        let search = SearchConfig {
            base_url: "::nonsense".to_string(),
            ..SearchConfig::default()
        };
        assert!(SearchUrlBuilder::new(&search).is_err());
    }
}
