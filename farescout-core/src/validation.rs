use farescout_shared::{DatePattern, NewAlert, NewSearch, PatternKind};

use crate::dates::MAX_TRIP_DAYS;
use crate::{CoreError, CoreResult};

/// Maximum destinations a saved search may monitor
pub const MAX_SELECTED_DESTINATIONS: usize = 5;

/// Upper-cases and checks a three-letter IATA code
pub fn normalize_iata(code: &str) -> CoreResult<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!("invalid IATA code '{}'", code)));
    }
    Ok(code)
}

pub fn validate_pattern(pattern: &DatePattern) -> CoreResult<()> {
    if pattern.kind == PatternKind::Custom && pattern.duration == 0 {
        return Err(CoreError::Validation(
            "custom pattern requires a duration of at least one day".to_string(),
        ));
    }

    if pattern.duration > MAX_TRIP_DAYS {
        return Err(CoreError::Validation(format!(
            "duration must be at most {} days",
            MAX_TRIP_DAYS
        )));
    }

    if let Some(days) = &pattern.preferred_days {
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(CoreError::Validation(format!(
                "preferred day {} is outside 0 (Sunday) to 6 (Saturday)",
                bad
            )));
        }
    }

    Ok(())
}

/// Checks a new search and normalizes its airport codes in place
pub fn validate_new_search(search: &mut NewSearch) -> CoreResult<()> {
    if search.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    if search.budget <= 0 {
        return Err(CoreError::Validation("budget must be positive".to_string()));
    }
    if matches!(search.max_distance, Some(d) if d <= 0) {
        return Err(CoreError::Validation("maxDistance must be positive".to_string()));
    }
    if search.selected_destinations.len() > MAX_SELECTED_DESTINATIONS {
        return Err(CoreError::Validation(format!(
            "at most {} destinations can be monitored",
            MAX_SELECTED_DESTINATIONS
        )));
    }

    let email = search.email.expose().trim();
    if email.is_empty() || !email.contains('@') {
        return Err(CoreError::Validation("a valid email address is required".to_string()));
    }

    validate_pattern(&search.pattern)?;

    search.origin_airport = normalize_iata(&search.origin_airport)?;
    search.selected_destinations = search
        .selected_destinations
        .iter()
        .map(|code| normalize_iata(code))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(())
}

pub fn validate_new_alert(alert: &mut NewAlert) -> CoreResult<()> {
    if alert.current_price < 0 || alert.target_price < 0 {
        return Err(CoreError::Validation("prices must not be negative".to_string()));
    }
    alert.destination = normalize_iata(&alert.destination)?;
    Ok(())
}
