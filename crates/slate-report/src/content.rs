//! Pure assembly of the report's sections from store data.

use chrono::{DateTime, Utc};
use slate_core::{
    AggregationOptions, AggregationService, CoreResult, DatasetStore, OverallTotals,
};
use slate_domain::{calculate_variation, PeriodSummary, PurchasedLedger, SummaryMap};

/// One line of the daily breakdown table.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: String,
    pub estimated: f64,
    pub incurred: f64,
    pub variation: Option<f64>,
}

/// Everything the PDF renders, already aggregated and ordered.
///
/// Weekly, monthly, daily, and purchased sections are empty vectors when
/// their backing data is empty; the renderer omits those sections entirely.
/// Variance figures come from the aggregator, never recomputed here.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub generated_at: DateTime<Utc>,
    pub totals: OverallTotals,
    pub weekly: Vec<(String, PeriodSummary)>,
    pub monthly: Vec<(String, PeriodSummary)>,
    pub daily: Vec<DailyRow>,
    pub purchased: PurchasedLedger,
}

impl ReportContent {
    /// Loads both daily stores and the purchased ledger and assembles every
    /// section.
    pub fn build(store: &dyn DatasetStore, options: AggregationOptions) -> CoreResult<Self> {
        let estimates = store.load_estimates()?.data;
        let incurred = store.load_incurred()?.data;
        let purchased = store.load_purchased()?.data;

        let weekly = AggregationService::weekly(&estimates, &incurred, options)?;
        let monthly = AggregationService::monthly(&estimates, &incurred, options)?;

        let daily = AggregationService::daily(&estimates, &incurred)
            .into_iter()
            .map(|(date, entry)| {
                let estimated = entry
                    .estimated
                    .map(|e| e.total_estimated)
                    .unwrap_or(0.0);
                let spent = entry.incurred.map(|i| i.total_incurred).unwrap_or(0.0);
                DailyRow {
                    date,
                    estimated,
                    incurred: spent,
                    variation: calculate_variation(estimated, spent),
                }
            })
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            totals: AggregationService::overall(&estimates, &incurred),
            weekly: rows(weekly),
            monthly: rows(monthly),
            daily,
            purchased,
        })
    }
}

/// Flattens a rollup into table rows, keeping the map's numeric period order.
fn rows(summary: SummaryMap) -> Vec<(String, PeriodSummary)> {
    summary
        .into_iter()
        .map(|(label, period)| (label.to_string(), period))
        .collect()
}

#[cfg(test)]
mod tests {
    use slate_core::{
        estimates_from_totals, incurred_from_totals, seed_estimates, seed_incurred, MemoryStore,
    };

    use super::*;

    #[test]
    fn empty_stores_yield_a_summary_only_report() {
        let store = MemoryStore::new();
        let content = ReportContent::build(&store, AggregationOptions::default()).unwrap();
        assert_eq!(content.totals.estimated, 0.0);
        assert_eq!(content.totals.incurred, 0.0);
        assert_eq!(content.totals.variation, Some(0.0));
        assert!(content.weekly.is_empty());
        assert!(content.monthly.is_empty());
        assert!(content.daily.is_empty());
        assert!(content.purchased.is_empty());
    }

    #[test]
    fn populated_stores_fill_every_section() {
        let store = MemoryStore::new();
        seed_estimates(
            &store,
            estimates_from_totals(&[("2024-03-01", 100_000.0), ("2024-03-02", 50_000.0)]),
        )
        .unwrap();
        seed_incurred(&store, incurred_from_totals(&[("2024-03-01", 125_000.0)])).unwrap();

        let content = ReportContent::build(&store, AggregationOptions::default()).unwrap();
        assert_eq!(content.totals.estimated, 150_000.0);
        assert_eq!(content.totals.incurred, 125_000.0);
        assert_eq!(content.weekly.len(), 1);
        assert_eq!(content.monthly.len(), 1);
        assert_eq!(content.daily.len(), 2);

        let first = &content.daily[0];
        assert_eq!(first.date, "2024-03-01");
        assert_eq!(first.variation, Some(25.0));
        // Estimate-only day: spend defaults to zero in the breakdown.
        assert_eq!(content.daily[1].incurred, 0.0);
        assert_eq!(content.daily[1].variation, Some(-100.0));
    }

    #[test]
    fn weekly_table_rows_stay_in_numeric_order() {
        let store = MemoryStore::new();
        // ISO weeks 2, 9, and 10 of 2024.
        seed_estimates(
            &store,
            estimates_from_totals(&[
                ("2024-01-10", 100.0),
                ("2024-03-01", 200.0),
                ("2024-03-04", 300.0),
            ]),
        )
        .unwrap();

        let content = ReportContent::build(&store, AggregationOptions::default()).unwrap();
        let labels: Vec<&str> = content.weekly.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["week_2", "week_9", "week_10"]);
    }
}
