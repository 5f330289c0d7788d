//! Expiration values for food products.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input formats recognised as calendar dates, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// When a food product expires.
///
/// Users type expirations by hand, so anything that does not look like a
/// date is kept verbatim as text instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Expiration {
    /// A recognised calendar date
    Date(NaiveDate),
    /// Free text such as "end of march"
    Text(String),
}

impl Expiration {
    /// Interpret raw input, preferring a calendar date when one parses.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(Self::Date)
            .unwrap_or_else(|| Self::Text(trimmed.to_string()))
    }

    /// The calendar date, if the expiration is one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Text(_) => None,
        }
    }

    /// Whether the product is expired as of `today`. Free text never expires.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|date| date < today)
    }
}

impl std::fmt::Display for Expiration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<String> for Expiration {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Expiration> for String {
    fn from(value: Expiration) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_recognised_formats() {
        assert_eq!(Expiration::parse("2025-10-05"), Expiration::Date(date(2025, 10, 5)));
        assert_eq!(Expiration::parse("05/10/2025"), Expiration::Date(date(2025, 10, 5)));
        assert_eq!(Expiration::parse(" 05-10-2025 "), Expiration::Date(date(2025, 10, 5)));
    }

    #[test]
    fn test_free_text_kept() {
        let exp = Expiration::parse("  end of march ");
        assert_eq!(exp, Expiration::Text("end of march".to_string()));
        assert_eq!(exp.to_string(), "end of march");
        assert!(!exp.is_past(date(2099, 1, 1)));
    }

    #[test]
    fn test_dates_normalize_to_iso() {
        let exp = Expiration::parse("31/12/2024");
        assert_eq!(exp.to_string(), "2024-12-31");
        assert_eq!(Expiration::parse(&exp.to_string()), exp);
    }

    #[test]
    fn test_is_past() {
        let exp = Expiration::parse("2024-06-01");
        assert!(exp.is_past(date(2024, 6, 2)));
        assert!(!exp.is_past(date(2024, 6, 1)));
    }
}
