//! Product codes.

use serde::{Deserialize, Serialize};

use crate::validation::{parse_nonempty_text, ValidationError};

/// Unique identifier for a product.
///
/// Codes are opaque: `"A1"` and `"0042"` are both valid and never
/// interpreted as numbers. Surrounding whitespace is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    /// Validate and wrap a raw code.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        parse_nonempty_text("code", raw).map(Self)
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_trimmed_and_opaque() {
        let code: ProductCode = " 0042 ".parse().unwrap();
        assert_eq!(code.as_str(), "0042");
        assert_ne!(code, ProductCode::parse("42").unwrap());
    }

    #[test]
    fn test_empty_code_rejected() {
        let err = ProductCode::parse("  ").unwrap_err();
        assert_eq!(err.field, "code");
    }

    #[test]
    fn test_code_serializes_as_plain_string() {
        let code = ProductCode::parse("A1").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"A1\"");
        assert!(serde_json::from_str::<ProductCode>("\"\"").is_err());
    }
}
