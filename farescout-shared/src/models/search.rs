use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::pattern::DatePattern;
use crate::pii::Masked;

/// A saved, monitored search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub id: Uuid,
    pub name: String,
    pub origin_airport: String,
    pub budget: i32,
    pub pattern: DatePattern,
    /// IATA codes, in the order the user picked them
    pub selected_destinations: Vec<String>,
    pub max_distance: Option<i32>,
    pub is_active: bool,
    pub email: Masked<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Search {
    pub fn from_new(new: NewSearch, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            origin_airport: new.origin_airport,
            budget: new.budget,
            pattern: new.pattern,
            selected_destinations: new.selected_destinations,
            max_distance: new.max_distance,
            is_active: new.is_active,
            email: new.email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for saving a search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSearch {
    pub name: String,
    pub origin_airport: String,
    pub budget: i32,
    pub pattern: DatePattern,
    #[serde(default)]
    pub selected_destinations: Vec<String>,
    #[serde(default)]
    pub max_distance: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub email: Masked<String>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pattern::PatternKind;

    #[test]
    fn test_new_search_defaults() {
        let json = r#"
            {
                "name": "Balkan weekends",
                "originAirport": "CDG",
                "budget": 250,
                "pattern": { "type": "weekend", "duration": 2 },
                "email": "jane@example.com"
            }
        "#;
        let new: NewSearch = serde_json::from_str(json).expect("Failed to deserialize");
        assert!(new.is_active);
        assert!(new.selected_destinations.is_empty());
        assert_eq!(new.pattern.kind, PatternKind::Weekend);

        let search = Search::from_new(new, Utc::now());
        assert_eq!(search.created_at, search.updated_at);
        assert!(!format!("{:?}", search).contains("jane@example.com"));
    }
}
