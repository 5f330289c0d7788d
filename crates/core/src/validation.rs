//! Field validation rules.
//!
//! Every rule is a pure function: it takes a raw value and either returns the
//! normalized typed value or a [`ValidationError`] naming the field. Nothing
//! here prints or logs.

/// A field value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,

    /// Human readable explanation
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Parse a strictly positive, finite decimal.
pub fn parse_positive_decimal(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, format!("`{}` is not a number", raw.trim())))?;
    ensure_positive(field, value)
}

/// Parse an integer that is zero or greater.
pub fn parse_nonnegative_integer(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, format!("`{}` is not a whole number", raw.trim())))?;
    ensure_nonnegative(field, value)
}

/// Trim text and require it to be non-empty.
pub fn parse_nonempty_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Check that an already typed decimal is finite and greater than zero.
pub fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(value)
}

/// Check that an already typed integer is zero or greater and fits a `u32`.
pub fn ensure_nonnegative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    u32::try_from(value).map_err(|_| ValidationError::new(field, "is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_decimal_accepts_valid_input() {
        assert_eq!(parse_positive_decimal("cost", "500").unwrap(), 500.0);
        assert_eq!(parse_positive_decimal("cost", " 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_positive_decimal("cost", "0.01").unwrap(), 0.01);
    }

    #[test]
    fn test_positive_decimal_rejects_zero_negative_and_text() {
        for raw in ["0", "-5", "abc", "", "NaN", "inf"] {
            let err = parse_positive_decimal("cost", raw).unwrap_err();
            assert_eq!(err.field, "cost", "input {raw:?}");
        }
    }

    #[test]
    fn test_nonnegative_integer() {
        assert_eq!(parse_nonnegative_integer("quantity", "0").unwrap(), 0);
        assert_eq!(parse_nonnegative_integer("quantity", "42").unwrap(), 42);

        let err = parse_nonnegative_integer("quantity", "-1").unwrap_err();
        assert_eq!(err.reason, "must not be negative");

        assert!(parse_nonnegative_integer("quantity", "2.5").is_err());
        assert!(parse_nonnegative_integer("quantity", "many").is_err());
        assert!(parse_nonnegative_integer("quantity", "99999999999").is_err());
    }

    #[test]
    fn test_nonempty_text_trims() {
        assert_eq!(parse_nonempty_text("name", "  laptop ").unwrap(), "laptop");

        let err = parse_nonempty_text("name", "   ").unwrap_err();
        assert_eq!(err, ValidationError::new("name", "must not be empty"));
    }

    #[test]
    fn test_error_display_names_field() {
        let err = ValidationError::new("price", "must be greater than zero");
        assert_eq!(err.to_string(), "invalid price: must be greater than zero");
    }
}
