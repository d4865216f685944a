use crate::error::AppError;

/// Whole number from a query-string value
pub fn parse_int(name: &str, raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::ValidationError(format!("{} must be a whole number", name)))
}

pub fn required<'a>(name: &str, raw: &'a Option<String>) -> Result<&'a str, AppError> {
    match raw.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::ValidationError(format!("{} is required", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        assert_eq!(parse_int("budget", " 300 ").unwrap(), 300);
        assert!(parse_int("budget", "cheap").is_err());
        assert_eq!(required("origin", &Some("CDG".into())).unwrap(), "CDG");
        assert!(required("origin", &Some("  ".into())).is_err());
        assert!(required("origin", &None).is_err());
    }
}
