//! Reported (incurred) costs and the purchased-item ledger.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single rented or purchased art/costume line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub cost: f64,
}

/// Nested art/costume spend: rented items are transient, purchased items are
/// additionally archived in the purchased ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtCostumeExpense {
    #[serde(default)]
    pub rented: Vec<CostItem>,
    #[serde(default)]
    pub purchased: Vec<CostItem>,
}

impl ArtCostumeExpense {
    /// Sum of item costs across both the rented and purchased lists.
    pub fn item_total(&self) -> f64 {
        self.rented
            .iter()
            .chain(self.purchased.iter())
            .map(|item| item.cost)
            .sum()
    }
}

/// A day's cost report as submitted by a caller, before validation.
///
/// Cost categories are free-form: any flat numeric field counts toward the
/// day's total, so new expense kinds need no schema change. Non-numeric
/// extras are kept but ignored by the total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncurredSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_costume_expense: Option<ArtCostumeExpense>,
    #[serde(flatten)]
    pub costs: BTreeMap<String, Value>,
}

impl IncurredSubmission {
    /// Sum of the flat numeric cost fields (everything except `date` and the
    /// nested art/costume block, which are captured separately).
    pub fn flat_total(&self) -> f64 {
        self.costs
            .values()
            .filter_map(Value::as_f64)
            .sum()
    }
}

/// A validated, stored incurred-cost record for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIncurred {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_costume_expense: Option<ArtCostumeExpense>,
    #[serde(flatten)]
    pub costs: BTreeMap<String, Value>,
    #[serde(default)]
    pub total_incurred: f64,
}

/// Whole incurred document, keyed by `YYYY-MM-DD` date string.
pub type IncurredMap = BTreeMap<String, DailyIncurred>;

/// A permanently archived acquisition, tagged with its submission date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedItem {
    pub date: String,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub cost: f64,
}

/// Append-only purchased-item ledger.
pub type PurchasedLedger = Vec<PurchasedItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_captures_arbitrary_cost_fields() {
        let raw = r#"{"date":"2024-03-01","location_rent":20000,"travel_expense":8000,"note":"unit"}"#;
        let sub: IncurredSubmission = serde_json::from_str(raw).unwrap();
        assert_eq!(sub.date.as_deref(), Some("2024-03-01"));
        assert_eq!(sub.costs.len(), 3);
        assert_eq!(sub.flat_total(), 28000.0);
    }

    #[test]
    fn art_costume_items_total_both_lists() {
        let expense = ArtCostumeExpense {
            rented: vec![CostItem { item: "lamp".into(), cost: 1500.0 }],
            purchased: vec![CostItem { item: "coat".into(), cost: 5000.0 }],
        };
        assert_eq!(expense.item_total(), 6500.0);
    }

    #[test]
    fn stored_record_round_trips_extra_fields() {
        let record = DailyIncurred {
            date: "2024-03-01".into(),
            art_costume_expense: None,
            costs: BTreeMap::from([("location_rent".into(), Value::from(20000))]),
            total_incurred: 20000.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location_rent"], 20000);
        let back: DailyIncurred = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
