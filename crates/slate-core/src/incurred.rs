//! Recording a day's incurred costs and archiving purchased items.

use slate_domain::{DailyIncurred, IncurredSubmission, PurchasedItem};
use tracing::info;

use crate::{CoreError, CoreResult, DatasetStore};

/// What to do with the purchased ledger when a date is resubmitted.
///
/// The incurred record itself is always overwritten wholesale; this policy
/// only governs the archived purchased items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PurchasedItemPolicy {
    /// Always append, so resubmitting a date duplicates its items. This was
    /// the original system's behavior and remains the default.
    #[default]
    Append,
    /// Drop the date's previously archived items before appending.
    Upsert,
}

/// Validates and persists a day's reported costs.
pub struct IncurredService;

impl IncurredService {
    /// Records one day's submission: computes the day total, overwrites the
    /// date's entry in the incurred store, and archives purchased items.
    ///
    /// The submission is rejected before any write when `date` is absent or
    /// blank. The purchased ledger and the incurred document are saved
    /// independently; there is no cross-document rollback.
    pub fn record(
        store: &dyn DatasetStore,
        submission: IncurredSubmission,
        policy: PurchasedItemPolicy,
    ) -> CoreResult<DailyIncurred> {
        let date = submission
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(CoreError::MissingField("date"))?
            .to_string();

        let item_total = submission
            .art_costume_expense
            .as_ref()
            .map(|art| art.item_total())
            .unwrap_or(0.0);
        let total_incurred = submission.flat_total() + item_total;

        // A client-sent total counts toward the sum above (as the original
        // system did) but the stored value is always the computed one.
        let mut costs = submission.costs;
        costs.remove("total_incurred");

        let record = DailyIncurred {
            date: date.clone(),
            art_costume_expense: submission.art_costume_expense,
            costs,
            total_incurred,
        };

        Self::archive_purchases(store, &record, policy)?;

        let mut current = store.load_incurred()?;
        current.data.insert(date.clone(), record.clone());
        store.save_incurred(&current.data, current.version)?;

        info!(date = %date, total = total_incurred, "recorded incurred costs");
        Ok(record)
    }

    fn archive_purchases(
        store: &dyn DatasetStore,
        record: &DailyIncurred,
        policy: PurchasedItemPolicy,
    ) -> CoreResult<()> {
        let purchased = match record.art_costume_expense.as_ref() {
            Some(art) if !art.purchased.is_empty() => &art.purchased,
            _ => return Ok(()),
        };

        let mut ledger = store.load_purchased()?;
        if policy == PurchasedItemPolicy::Upsert {
            ledger.data.retain(|item| item.date != record.date);
        }
        ledger.data.extend(purchased.iter().map(|item| PurchasedItem {
            date: record.date.clone(),
            item: item.item.clone(),
            cost: item.cost,
        }));
        store.save_purchased(&ledger.data, ledger.version)?;
        Ok(())
    }
}
