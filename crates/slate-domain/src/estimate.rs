//! AI-produced daily cost estimates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One day's estimated production spend, as returned by the estimation model.
///
/// Every field defaults to zero so partially filled model output still
/// deserializes; `total_estimated` is whatever the model reported, not a
/// value recomputed locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEstimate {
    #[serde(default)]
    pub junior_artist_wage: f64,
    #[serde(default)]
    pub location_rent: f64,
    #[serde(default)]
    pub travel_expense: f64,
    #[serde(default)]
    pub food_expense: f64,
    #[serde(default)]
    pub art_costume_expense: f64,
    #[serde(default)]
    pub total_estimated: f64,
}

/// Whole estimate document, keyed by `YYYY-MM-DD` date string.
pub type EstimateMap = BTreeMap<String, DailyEstimate>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let est: DailyEstimate =
            serde_json::from_str(r#"{"location_rent": 20000.0}"#).unwrap();
        assert_eq!(est.location_rent, 20000.0);
        assert_eq!(est.junior_artist_wage, 0.0);
        assert_eq!(est.total_estimated, 0.0);
    }

    #[test]
    fn estimate_map_is_keyed_by_date() {
        let raw = r#"{"2024-03-01": {"total_estimated": 100000}}"#;
        let map: EstimateMap = serde_json::from_str(raw).unwrap();
        assert_eq!(map["2024-03-01"].total_estimated, 100000.0);
    }
}
