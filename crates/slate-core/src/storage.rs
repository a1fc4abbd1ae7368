//! Storage contract for the four whole-document datasets.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use slate_domain::{EstimateMap, IncurredMap, PurchasedLedger, Schedule};

use crate::{CoreError, CoreResult};

/// Dataset names, used in conflict reports and log lines.
pub mod dataset {
    pub const SCHEDULE: &str = "schedule";
    pub const ESTIMATES: &str = "estimates";
    pub const INCURRED: &str = "incurred";
    pub const PURCHASED: &str = "purchased";
}

/// A whole-document value together with its optimistic-concurrency stamp.
///
/// Version 0 means "never written"; every successful save increments the
/// stamp, and saves against a stale stamp fail with [`CoreError::Conflict`]
/// instead of silently losing the other writer's update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub data: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, data: T) -> Self {
        Self { version, data }
    }
}

/// Persistence for the budget datasets.
///
/// The schedule is an externally produced input and is read-only here; the
/// three managed documents round-trip through [`Versioned`] stamps.
pub trait DatasetStore: Send + Sync {
    /// Loads the shooting schedule, or `None` when it is missing or unusable.
    fn load_schedule(&self) -> CoreResult<Option<Schedule>>;

    fn load_estimates(&self) -> CoreResult<Versioned<EstimateMap>>;
    fn save_estimates(&self, data: &EstimateMap, expected: u64) -> CoreResult<u64>;

    fn load_incurred(&self) -> CoreResult<Versioned<IncurredMap>>;
    fn save_incurred(&self, data: &IncurredMap, expected: u64) -> CoreResult<u64>;

    fn load_purchased(&self) -> CoreResult<Versioned<PurchasedLedger>>;
    fn save_purchased(&self, data: &PurchasedLedger, expected: u64) -> CoreResult<u64>;
}

/// In-memory [`DatasetStore`] with full version-stamp semantics.
///
/// Backs the service tests and is handy for demos; production deployments
/// use the filesystem implementation.
#[derive(Default)]
pub struct MemoryStore {
    schedule: Mutex<Option<Schedule>>,
    estimates: Mutex<Versioned<EstimateMap>>,
    incurred: Mutex<Versioned<IncurredMap>>,
    purchased: Mutex<Versioned<PurchasedLedger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: Schedule) -> Self {
        let store = Self::default();
        *store.schedule.lock().expect("schedule lock") = Some(schedule);
        store
    }

    pub fn set_schedule(&self, schedule: Option<Schedule>) {
        *self.schedule.lock().expect("schedule lock") = schedule;
    }

    fn save_doc<T: Clone>(
        slot: &Mutex<Versioned<T>>,
        name: &'static str,
        data: &T,
        expected: u64,
    ) -> CoreResult<u64> {
        let mut guard = slot.lock().expect("dataset lock");
        if guard.version != expected {
            return Err(CoreError::Conflict {
                dataset: name,
                expected,
                found: guard.version,
            });
        }
        guard.version += 1;
        guard.data = data.clone();
        Ok(guard.version)
    }
}

impl DatasetStore for MemoryStore {
    fn load_schedule(&self) -> CoreResult<Option<Schedule>> {
        Ok(self.schedule.lock().expect("schedule lock").clone())
    }

    fn load_estimates(&self) -> CoreResult<Versioned<EstimateMap>> {
        Ok(self.estimates.lock().expect("dataset lock").clone())
    }

    fn save_estimates(&self, data: &EstimateMap, expected: u64) -> CoreResult<u64> {
        Self::save_doc(&self.estimates, dataset::ESTIMATES, data, expected)
    }

    fn load_incurred(&self) -> CoreResult<Versioned<IncurredMap>> {
        Ok(self.incurred.lock().expect("dataset lock").clone())
    }

    fn save_incurred(&self, data: &IncurredMap, expected: u64) -> CoreResult<u64> {
        Self::save_doc(&self.incurred, dataset::INCURRED, data, expected)
    }

    fn load_purchased(&self) -> CoreResult<Versioned<PurchasedLedger>> {
        Ok(self.purchased.lock().expect("dataset lock").clone())
    }

    fn save_purchased(&self, data: &PurchasedLedger, expected: u64) -> CoreResult<u64> {
        Self::save_doc(&self.purchased, dataset::PURCHASED, data, expected)
    }
}

/// Convenience for tests and tooling: seed a store's incurred map wholesale.
pub fn seed_incurred(store: &dyn DatasetStore, map: IncurredMap) -> CoreResult<u64> {
    let current = store.load_incurred()?;
    store.save_incurred(&map, current.version)
}

/// Convenience for tests and tooling: seed a store's estimate map wholesale.
pub fn seed_estimates(store: &dyn DatasetStore, map: EstimateMap) -> CoreResult<u64> {
    let current = store.load_estimates()?;
    store.save_estimates(&map, current.version)
}

/// Builds an estimate map from `(date, total)` pairs, for tests.
pub fn estimates_from_totals(pairs: &[(&str, f64)]) -> EstimateMap {
    pairs
        .iter()
        .map(|(date, total)| {
            (
                (*date).to_string(),
                slate_domain::DailyEstimate {
                    total_estimated: *total,
                    ..Default::default()
                },
            )
        })
        .collect()
}

/// Builds an incurred map from `(date, total)` pairs, for tests.
pub fn incurred_from_totals(pairs: &[(&str, f64)]) -> IncurredMap {
    pairs
        .iter()
        .map(|(date, total)| {
            (
                (*date).to_string(),
                slate_domain::DailyIncurred {
                    date: (*date).to_string(),
                    art_costume_expense: None,
                    costs: BTreeMap::new(),
                    total_incurred: *total,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_rejects_stale_saves() {
        let store = MemoryStore::new();
        let map = estimates_from_totals(&[("2024-03-01", 1000.0)]);
        assert_eq!(store.save_estimates(&map, 0).unwrap(), 1);
        let err = store.save_estimates(&map, 0).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { expected: 0, found: 1, .. }));
    }

    #[test]
    fn memory_store_round_trips_documents() {
        let store = MemoryStore::new();
        let map = incurred_from_totals(&[("2024-03-01", 500.0)]);
        seed_incurred(&store, map.clone()).unwrap();
        let loaded = store.load_incurred().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.data, map);
    }
}
