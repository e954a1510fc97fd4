//! Currency codes, the upstream-sourced supported set, and input validation.

use crate::core::error::{ConverterError, Result};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::sync::LazyLock;

static CURRENCY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid regex pattern"));

/// Three uppercase Latin letters, e.g. `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(value: &str) -> Result<Self> {
        if CURRENCY_CODE_REGEX.is_match(value) {
            Ok(CurrencyCode(value.to_string()))
        } else {
            Err(ConverterError::InvalidCurrency(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Code to display-name mapping scraped from the upstream currency page.
///
/// Entries keep the upstream page order and serialize as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportedCurrencySet {
    entries: Vec<(String, String)>,
}

impl SupportedCurrencySet {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == code)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }
}

impl Serialize for SupportedCurrencySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, name) in &self.entries {
            map.serialize_entry(code, name)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

/// Checks both codes and reports every offending one.
///
/// When `supported` is given, syntactically valid codes must also be members of it.
pub fn validate(
    from: &str,
    to: &str,
    supported: Option<&SupportedCurrencySet>,
) -> Result<CurrencyPair> {
    let (from_code, to_code) = (CurrencyCode::parse(from), CurrencyCode::parse(to));

    let (from_code, to_code) = match (from_code, to_code) {
        (Ok(f), Ok(t)) => (f, t),
        (Err(_), Err(_)) => {
            return Err(ConverterError::InvalidCurrency(format!("{from}, {to}")));
        }
        (Err(e), _) | (_, Err(e)) => return Err(e),
    };

    if let Some(set) = supported {
        let missing: Vec<&str> = [from_code.as_str(), to_code.as_str()]
            .into_iter()
            .filter(|code| !set.contains(code))
            .collect();
        if !missing.is_empty() {
            return Err(ConverterError::InvalidCurrency(format!(
                "{} not supported",
                missing.join(", ")
            )));
        }
    }

    Ok(CurrencyPair {
        from: from_code,
        to: to_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> SupportedCurrencySet {
        SupportedCurrencySet::new(vec![
            ("USD".to_string(), "US Dollar".to_string()),
            ("PLN".to_string(), "Polish Zloty".to_string()),
            ("EUR".to_string(), "Euro".to_string()),
        ])
    }

    #[test]
    fn test_valid_pair() {
        let pair = validate("USD", "PLN", None).unwrap();
        assert_eq!(pair.from.as_str(), "USD");
        assert_eq!(pair.to.as_str(), "PLN");
    }

    #[test]
    fn test_invalid_syntax() {
        for bad in ["us", "USDD", "123", "usd", "U$D", ""] {
            let result = validate(bad, "PLN", None);
            assert!(
                matches!(result, Err(ConverterError::InvalidCurrency(_))),
                "{bad} should be rejected"
            );
        }
        assert!(matches!(
            validate("USD", "pln", None),
            Err(ConverterError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_both_invalid_reports_both() {
        let err = validate("us", "123", None).unwrap_err();
        assert_eq!(err, ConverterError::InvalidCurrency("us, 123".to_string()));
    }

    #[test]
    fn test_membership_check() {
        let set = supported();
        assert!(validate("USD", "EUR", Some(&set)).is_ok());

        let err = validate("USD", "GBP", Some(&set)).unwrap_err();
        assert_eq!(
            err,
            ConverterError::InvalidCurrency("GBP not supported".to_string())
        );

        let err = validate("JPY", "GBP", Some(&set)).unwrap_err();
        assert_eq!(
            err,
            ConverterError::InvalidCurrency("JPY, GBP not supported".to_string())
        );
    }

    #[test]
    fn test_syntax_checked_before_membership() {
        let set = supported();
        let err = validate("usd", "EUR", Some(&set)).unwrap_err();
        assert_eq!(err, ConverterError::InvalidCurrency("usd".to_string()));
    }

    #[test]
    fn test_supported_set_serializes_in_page_order() {
        let json = serde_json::to_string(&supported()).unwrap();
        assert_eq!(
            json,
            r#"{"USD":"US Dollar","PLN":"Polish Zloty","EUR":"Euro"}"#
        );
    }

    #[test]
    fn test_supported_set_lookup() {
        let set = supported();
        assert_eq!(set.len(), 3);
        assert_eq!(set.name("PLN"), Some("Polish Zloty"));
        assert!(set.name("GBP").is_none());
        assert_eq!(set.iter().next(), Some(("USD", "US Dollar")));
    }
}
