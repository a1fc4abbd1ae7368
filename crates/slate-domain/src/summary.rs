//! Period rollups and the estimated-vs-incurred variation rule.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DailyEstimate, DailyIncurred};

/// A week or month bucket label, ordered numerically.
///
/// Renders as `week_9` / `month_3`; unlike a plain string key, `week_9`
/// sorts before `week_10` once a production spans ten weeks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PeriodLabel {
    pub kind: String,
    pub number: u32,
}

impl PeriodLabel {
    pub fn week(number: u32) -> Self {
        Self { kind: "week".to_string(), number }
    }

    pub fn month(number: u32) -> Self {
        Self { kind: "month".to_string(), number }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.number)
    }
}

impl FromStr for PeriodLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, number) = s
            .split_once('_')
            .ok_or_else(|| format!("invalid period label `{s}`"))?;
        let number = number
            .parse()
            .map_err(|_| format!("invalid period label `{s}`"))?;
        Ok(Self { kind: kind.to_string(), number })
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Aggregated totals for one week or month bucket.
///
/// `variation` is `None` when the percentage is undefined (spend reported
/// against a zero estimate); it serializes as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub estimated: f64,
    pub incurred: f64,
    pub variation: Option<f64>,
}

/// Period label to summary, iterated in numeric period order.
pub type SummaryMap = BTreeMap<PeriodLabel, PeriodSummary>;

/// Merged per-date view of both daily stores.
///
/// Absent sides serialize as empty objects, matching the wire shape
/// existing frontends consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBudgetEntry {
    #[serde(default, serialize_with = "empty_when_absent")]
    pub estimated: Option<DailyEstimate>,
    #[serde(default, serialize_with = "empty_when_absent")]
    pub incurred: Option<DailyIncurred>,
}

fn empty_when_absent<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Percentage deviation of incurred from estimated spend.
///
/// The zero policy is asymmetric: a zero estimate with zero spend is a 0%
/// deviation, while a zero estimate with positive spend has no defined
/// percentage and yields `None`.
pub fn calculate_variation(estimated: f64, incurred: f64) -> Option<f64> {
    if estimated == 0.0 {
        if incurred > 0.0 {
            None
        } else {
            Some(0.0)
        }
    } else {
        Some((incurred - estimated) / estimated * 100.0)
    }
}
