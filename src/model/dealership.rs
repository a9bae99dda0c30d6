/// A dealership label as the site prints it: `"<name> - See all <N> bikes"`
///
/// The name is everything before the first `" - "`. The advertised count is read from the
/// last `"See all <N> bikes"` in the label, wherever it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealershipLabel {
    pub name: String,
    pub advertised: Option<u32>,
}

impl DealershipLabel {
    /// # Examples
    ///
    /// ```
    /// use autotrader_harvest::model::DealershipLabel;
    ///
    /// let label = DealershipLabel::parse("Bike Stop Ltd - See all 42 bikes");
    /// assert_eq!(label.name, "Bike Stop Ltd");
    /// assert_eq!(label.advertised, Some(42));
    /// ```
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        let name = label.split(" - ").next().unwrap_or(label).trim();

        const COUNT_PREFIX: &str = "See all ";
        let advertised = label.rfind(COUNT_PREFIX).and_then(|start| {
            let rest = &label[start + COUNT_PREFIX.len()..];
            let end = rest.find(" bikes")?;
            rest[..end].trim().parse().ok()
        });

        Self {
            name: name.to_string(),
            advertised,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_label() {
        let label = DealershipLabel::parse("  Moto World - See all 7 bikes ");
        assert_eq!(label.name, "Moto World");
        assert_eq!(label.advertised, Some(7));
    }

    #[test]
    fn test_parse_name_containing_separator() {
        let label = DealershipLabel::parse("A - B Motors - See all 3 bikes");
        assert_eq!(label.name, "A");
        assert_eq!(label.advertised, Some(3));
    }

    #[test]
    fn test_parse_count_followed_by_text() {
        let label = DealershipLabel::parse("Moto World - See all 12 bikes >");
        assert_eq!(label.name, "Moto World");
        assert_eq!(label.advertised, Some(12));
    }

    #[test]
    fn test_parse_bare_name() {
        let label = DealershipLabel::parse("Private seller");
        assert_eq!(label.name, "Private seller");
        assert_eq!(label.advertised, None);
    }

    #[test]
    fn test_parse_unexpected_suffix() {
        let label = DealershipLabel::parse("Moto World - Visit our showroom");
        assert_eq!(label.name, "Moto World");
        assert_eq!(label.advertised, None);

        let label = DealershipLabel::parse("Moto World - See all many bikes");
        assert_eq!(label.advertised, None);
    }
}
