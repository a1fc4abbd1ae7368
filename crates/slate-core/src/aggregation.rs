//! Weekly/monthly rollups and merged daily views over the two daily stores.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use slate_domain::{
    calculate_variation, DailyBudgetEntry, EstimateMap, IncurredMap, PeriodLabel, PeriodSummary,
    SummaryMap,
};
use tracing::debug;

use crate::{CoreError, CoreResult};

/// What to do with a date key that does not parse as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateErrorPolicy {
    /// Drop the record from the rollup (tolerant default).
    #[default]
    Skip,
    /// Surface a [`CoreError::MalformedDate`] instead.
    Fail,
}

/// Options for period aggregation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationOptions {
    pub on_date_error: DateErrorPolicy,
}

/// Grand totals across every date in both stores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverallTotals {
    pub estimated: f64,
    pub incurred: f64,
    pub variation: Option<f64>,
}

/// Stateless rollup helpers over estimate/incurred snapshots.
///
/// Pure read-and-compute: callers load the documents, these functions never
/// touch storage.
pub struct AggregationService;

impl AggregationService {
    /// Groups both stores by ISO week number, labelled `week_<n>`.
    ///
    /// ISO years are not part of the label, so week 1 of two different years
    /// lands in the same bucket. Known limitation, kept as-is.
    pub fn weekly(
        estimates: &EstimateMap,
        incurred: &IncurredMap,
        options: AggregationOptions,
    ) -> CoreResult<SummaryMap> {
        Self::by_period(estimates, incurred, options, |date| {
            PeriodLabel::week(date.iso_week().week())
        })
    }

    /// Groups both stores by calendar month number, labelled `month_<n>`.
    /// Shares the weekly rollup's cross-year collision.
    pub fn monthly(
        estimates: &EstimateMap,
        incurred: &IncurredMap,
        options: AggregationOptions,
    ) -> CoreResult<SummaryMap> {
        Self::by_period(estimates, incurred, options, |date| {
            PeriodLabel::month(date.month())
        })
    }

    /// Merged per-date view of the estimate and incurred records.
    pub fn daily(
        estimates: &EstimateMap,
        incurred: &IncurredMap,
    ) -> BTreeMap<String, DailyBudgetEntry> {
        let mut merged: BTreeMap<String, DailyBudgetEntry> = BTreeMap::new();
        for (date, estimate) in estimates {
            merged.entry(date.clone()).or_default().estimated = Some(estimate.clone());
        }
        for (date, record) in incurred {
            merged.entry(date.clone()).or_default().incurred = Some(record.clone());
        }
        merged
    }

    /// Grand totals and overall variation across every date.
    pub fn overall(estimates: &EstimateMap, incurred: &IncurredMap) -> OverallTotals {
        let estimated: f64 = estimates.values().map(|e| e.total_estimated).sum();
        let spent: f64 = incurred.values().map(|i| i.total_incurred).sum();
        OverallTotals {
            estimated,
            incurred: spent,
            variation: calculate_variation(estimated, spent),
        }
    }

    fn by_period(
        estimates: &EstimateMap,
        incurred: &IncurredMap,
        options: AggregationOptions,
        label: impl Fn(NaiveDate) -> PeriodLabel,
    ) -> CoreResult<SummaryMap> {
        let mut buckets: BTreeMap<PeriodLabel, (f64, f64)> = BTreeMap::new();

        let dates: BTreeSet<&String> = estimates.keys().chain(incurred.keys()).collect();
        for date_str in dates {
            let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => match options.on_date_error {
                    DateErrorPolicy::Skip => {
                        debug!(date = %date_str, "skipping malformed date in rollup");
                        continue;
                    }
                    DateErrorPolicy::Fail => {
                        return Err(CoreError::MalformedDate(date_str.clone()))
                    }
                },
            };

            let est = estimates
                .get(date_str)
                .map(|e| e.total_estimated)
                .unwrap_or(0.0);
            let inc = incurred
                .get(date_str)
                .map(|i| i.total_incurred)
                .unwrap_or(0.0);
            let bucket = buckets.entry(label(date)).or_insert((0.0, 0.0));
            bucket.0 += est;
            bucket.1 += inc;
        }

        Ok(buckets
            .into_iter()
            .map(|(label, (estimated, incurred))| {
                (
                    label,
                    PeriodSummary {
                        estimated,
                        incurred,
                        variation: calculate_variation(estimated, incurred),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{estimates_from_totals, incurred_from_totals};

    #[test]
    fn weekly_buckets_by_iso_week() {
        // 2024-03-01 (Fri) is ISO week 9; 2024-03-04 (Mon) starts week 10.
        let estimates =
            estimates_from_totals(&[("2024-03-01", 1000.0), ("2024-03-04", 2000.0)]);
        let incurred = incurred_from_totals(&[("2024-03-01", 1500.0)]);

        let weekly =
            AggregationService::weekly(&estimates, &incurred, AggregationOptions::default())
                .unwrap();
        assert_eq!(weekly[&PeriodLabel::week(9)].estimated, 1000.0);
        assert_eq!(weekly[&PeriodLabel::week(9)].incurred, 1500.0);
        assert_eq!(weekly[&PeriodLabel::week(9)].variation, Some(50.0));
        assert_eq!(weekly[&PeriodLabel::week(10)].estimated, 2000.0);
        assert_eq!(weekly[&PeriodLabel::week(10)].incurred, 0.0);
    }

    #[test]
    fn weekly_rows_keep_numeric_order_past_week_nine() {
        // Weeks 2, 9, and 10 of 2024: lexical order would put week_10 first.
        let estimates = estimates_from_totals(&[
            ("2024-01-10", 100.0),
            ("2024-03-01", 200.0),
            ("2024-03-04", 300.0),
        ]);
        let weekly = AggregationService::weekly(
            &estimates,
            &IncurredMap::new(),
            AggregationOptions::default(),
        )
        .unwrap();

        let labels: Vec<String> = weekly.keys().map(PeriodLabel::to_string).collect();
        assert_eq!(labels, ["week_2", "week_9", "week_10"]);

        let json = serde_json::to_string(&weekly).unwrap();
        assert!(json.find("week_9").unwrap() < json.find("week_10").unwrap());
    }

    #[test]
    fn monthly_buckets_by_month_number() {
        let estimates =
            estimates_from_totals(&[("2024-03-01", 1000.0), ("2024-04-02", 4000.0)]);
        let incurred = incurred_from_totals(&[("2024-04-15", 1000.0)]);

        let monthly =
            AggregationService::monthly(&estimates, &incurred, AggregationOptions::default())
                .unwrap();
        assert_eq!(monthly[&PeriodLabel::month(3)].estimated, 1000.0);
        assert_eq!(monthly[&PeriodLabel::month(4)].estimated, 4000.0);
        assert_eq!(monthly[&PeriodLabel::month(4)].incurred, 1000.0);
        assert_eq!(monthly[&PeriodLabel::month(4)].variation, Some(-75.0));
    }

    #[test]
    fn rollup_totals_conserve_per_day_totals() {
        let estimates = estimates_from_totals(&[
            ("2024-03-01", 1000.0),
            ("2024-03-02", 2000.0),
            ("2024-03-04", 4000.0),
            ("2024-04-10", 8000.0),
        ]);
        let incurred = incurred_from_totals(&[
            ("2024-03-02", 500.0),
            ("2024-04-10", 9000.0),
            ("2024-04-11", 100.0),
        ]);

        let options = AggregationOptions::default();
        let weekly = AggregationService::weekly(&estimates, &incurred, options).unwrap();
        let monthly = AggregationService::monthly(&estimates, &incurred, options).unwrap();

        let day_est: f64 = estimates.values().map(|e| e.total_estimated).sum();
        let day_inc: f64 = incurred.values().map(|i| i.total_incurred).sum();
        for summary in [&weekly, &monthly] {
            let est: f64 = summary.values().map(|p| p.estimated).sum();
            let inc: f64 = summary.values().map(|p| p.incurred).sum();
            assert_eq!(est, day_est);
            assert_eq!(inc, day_inc);
        }
    }

    #[test]
    fn cross_year_weeks_share_a_label() {
        let estimates =
            estimates_from_totals(&[("2023-01-03", 100.0), ("2024-01-03", 200.0)]);
        let weekly = AggregationService::weekly(
            &estimates,
            &IncurredMap::new(),
            AggregationOptions::default(),
        )
        .unwrap();
        // Both dates fall in ISO week 1 of their respective years.
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[&PeriodLabel::week(1)].estimated, 300.0);
    }

    #[test]
    fn malformed_dates_are_skipped_by_default() {
        let estimates =
            estimates_from_totals(&[("not-a-date", 999.0), ("2024-03-01", 1000.0)]);
        let weekly = AggregationService::weekly(
            &estimates,
            &IncurredMap::new(),
            AggregationOptions::default(),
        )
        .unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[&PeriodLabel::week(9)].estimated, 1000.0);
    }

    #[test]
    fn malformed_dates_can_be_surfaced() {
        let estimates = estimates_from_totals(&[("not-a-date", 999.0)]);
        let options = AggregationOptions { on_date_error: DateErrorPolicy::Fail };
        let err = AggregationService::weekly(&estimates, &IncurredMap::new(), options)
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedDate(date) if date == "not-a-date"));
    }

    #[test]
    fn daily_merges_both_sides() {
        let estimates = estimates_from_totals(&[("2024-03-01", 1000.0)]);
        let incurred =
            incurred_from_totals(&[("2024-03-01", 800.0), ("2024-03-02", 300.0)]);

        let daily = AggregationService::daily(&estimates, &incurred);
        assert_eq!(daily.len(), 2);
        let first = &daily["2024-03-01"];
        assert_eq!(first.estimated.as_ref().unwrap().total_estimated, 1000.0);
        assert_eq!(first.incurred.as_ref().unwrap().total_incurred, 800.0);
        assert!(daily["2024-03-02"].estimated.is_none());

        // On the wire the missing side is an empty object, not an omitted key.
        let json = serde_json::to_value(&daily).unwrap();
        assert_eq!(json["2024-03-02"]["estimated"], serde_json::json!({}));
        assert_eq!(json["2024-03-01"]["incurred"]["total_incurred"], 800.0);
    }

    #[test]
    fn overall_totals_match_the_worked_example() {
        let estimates = estimates_from_totals(&[("2024-03-01", 100_000.0)]);
        let incurred = incurred_from_totals(&[("2024-03-01", 125_000.0)]);
        let totals = AggregationService::overall(&estimates, &incurred);
        assert_eq!(totals.estimated, 100_000.0);
        assert_eq!(totals.incurred, 125_000.0);
        assert_eq!(totals.variation, Some(25.0));
    }
}
