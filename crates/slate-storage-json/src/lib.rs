//! Filesystem-backed JSON persistence for the budget datasets.
//!
//! One file per dataset under a shared data directory. Managed documents
//! are wrapped as `{"version": n, "data": ...}` so writers can detect lost
//! updates; bare documents written by older tooling are accepted as
//! version 0. Writes go through a temp file and rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slate_core::{dataset, CoreError, CoreResult, DatasetStore, Versioned};
use slate_domain::{EstimateMap, IncurredMap, PurchasedLedger, Schedule};
use tracing::warn;

const SCHEDULE_FILE: &str = "production_schedule.json";
const ESTIMATES_FILE: &str = "daily_budget.json";
const INCURRED_FILE: &str = "incurred_costs.json";
const PURCHASED_FILE: &str = "purchased_items.json";
const TMP_SUFFIX: &str = "tmp";

/// What to do with a file that exists but does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptPolicy {
    /// Treat the document as absent and return the default value.
    #[default]
    DefaultValue,
    /// Surface a [`CoreError::Corrupt`] instead.
    Fail,
}

/// JSON-file implementation of [`DatasetStore`].
#[derive(Debug, Clone)]
pub struct JsonDatasetStore {
    data_dir: PathBuf,
    on_corrupt: CorruptPolicy,
}

impl JsonDatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::with_policy(data_dir, CorruptPolicy::default())
    }

    pub fn with_policy(
        data_dir: impl Into<PathBuf>,
        on_corrupt: CorruptPolicy,
    ) -> CoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir, on_corrupt })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn dataset_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn load_document<T>(&self, name: &'static str, file: &str) -> CoreResult<Versioned<T>>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.dataset_path(file);
        if !path.exists() {
            return Ok(Versioned::new(0, T::default()));
        }
        let raw = fs::read_to_string(&path)?;

        // Wrapper first, then bare legacy document, then the corrupt policy.
        if let Ok(doc) = serde_json::from_str::<VersionedDoc<T>>(&raw) {
            return Ok(Versioned::new(doc.version, doc.data));
        }
        match serde_json::from_str::<T>(&raw) {
            Ok(data) => Ok(Versioned::new(0, data)),
            Err(err) => match self.on_corrupt {
                CorruptPolicy::DefaultValue => {
                    warn!(dataset = name, error = %err, "unreadable dataset, using default");
                    Ok(Versioned::new(0, T::default()))
                }
                CorruptPolicy::Fail => Err(CoreError::Corrupt(name.to_string(), err.to_string())),
            },
        }
    }

    fn save_document<T>(
        &self,
        name: &'static str,
        file: &str,
        data: &T,
        expected: u64,
    ) -> CoreResult<u64>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let current = self.load_document::<T>(name, file)?;
        if current.version != expected {
            return Err(CoreError::Conflict {
                dataset: name,
                expected,
                found: current.version,
            });
        }

        let next = expected + 1;
        let doc = VersionedDocRef { version: next, data };
        let rendered = serde_json::to_string_pretty(&doc)?;
        let path = self.dataset_path(file);
        let tmp = tmp_path(&path);
        write_file(&tmp, &rendered)?;
        fs::rename(&tmp, &path)?;
        Ok(next)
    }
}

impl DatasetStore for JsonDatasetStore {
    fn load_schedule(&self) -> CoreResult<Option<Schedule>> {
        let path = self.dataset_path(SCHEDULE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str::<Schedule>(&raw) {
            Ok(schedule) if !schedule.is_empty() => Ok(Some(schedule)),
            Ok(_) => Ok(None),
            Err(err) => match self.on_corrupt {
                CorruptPolicy::DefaultValue => {
                    warn!(dataset = dataset::SCHEDULE, error = %err, "unreadable schedule");
                    Ok(None)
                }
                CorruptPolicy::Fail => Err(CoreError::Corrupt(
                    dataset::SCHEDULE.to_string(),
                    err.to_string(),
                )),
            },
        }
    }

    fn load_estimates(&self) -> CoreResult<Versioned<EstimateMap>> {
        self.load_document(dataset::ESTIMATES, ESTIMATES_FILE)
    }

    fn save_estimates(&self, data: &EstimateMap, expected: u64) -> CoreResult<u64> {
        self.save_document(dataset::ESTIMATES, ESTIMATES_FILE, data, expected)
    }

    fn load_incurred(&self) -> CoreResult<Versioned<IncurredMap>> {
        self.load_document(dataset::INCURRED, INCURRED_FILE)
    }

    fn save_incurred(&self, data: &IncurredMap, expected: u64) -> CoreResult<u64> {
        self.save_document(dataset::INCURRED, INCURRED_FILE, data, expected)
    }

    fn load_purchased(&self) -> CoreResult<Versioned<PurchasedLedger>> {
        self.load_document(dataset::PURCHASED, PURCHASED_FILE)
    }

    fn save_purchased(&self, data: &PurchasedLedger, expected: u64) -> CoreResult<u64> {
        self.save_document(dataset::PURCHASED, PURCHASED_FILE, data, expected)
    }
}

#[derive(Deserialize)]
struct VersionedDoc<T> {
    version: u64,
    data: T,
}

#[derive(Serialize)]
struct VersionedDocRef<'a, T> {
    version: u64,
    data: &'a T,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
