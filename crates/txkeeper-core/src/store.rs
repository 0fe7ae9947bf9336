//! File-backed transaction store
//!
//! Every operation runs a complete load, mutate, save cycle against the
//! [`RecordDocument`] while holding the store mutex, so concurrent callers
//! in one process cannot overwrite each other's changes.

use crate::document::{JsonFileDocument, RecordDocument};
use crate::error::CoreResult;
use crate::models::Transaction;
use chrono::{Local, NaiveDateTime};
use std::sync::{Mutex, MutexGuard, PoisonError};
use txkeeper_config::DataConfig;
use uuid::Uuid;

/// How an unreadable or corrupt document is treated on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Treat it as an empty dataset and log a warning
    #[default]
    Lenient,
    /// Report the error to the caller
    Strict,
}

/// Owner of the on-disk transaction list
pub struct TransactionStore {
    document: Box<dyn RecordDocument>,
    mode: LoadMode,
    lock: Mutex<()>,
}

impl TransactionStore {
    pub fn new(document: Box<dyn RecordDocument>, mode: LoadMode) -> Self {
        Self {
            document,
            mode,
            lock: Mutex::new(()),
        }
    }

    /// Store over the JSON file named in the data configuration
    pub fn from_config(config: &DataConfig) -> Self {
        let mode = if config.strict_load {
            LoadMode::Strict
        } else {
            LoadMode::Lenient
        };
        Self::new(
            Box::new(JsonFileDocument::new(&config.json_data_file_path)),
            mode,
        )
    }

    pub fn load_mode(&self) -> LoadMode {
        self.mode
    }

    // ==================== Queries ====================

    /// Every record, in stored order
    pub fn get_all(&self) -> CoreResult<Vec<Transaction>> {
        let _guard = self.guard();
        self.load()
    }

    /// Record whose canonical id text equals `id`
    pub fn get_by_id(&self, id: &str) -> CoreResult<Option<Transaction>> {
        let _guard = self.guard();
        Ok(self.load()?.into_iter().find(|t| t.id_text() == id))
    }

    pub fn get_by_application_id(&self, application_id: i32) -> CoreResult<Vec<Transaction>> {
        self.filtered(|t| t.application_id == application_id)
    }

    pub fn get_by_type(&self, kind: &str) -> CoreResult<Vec<Transaction>> {
        self.filtered(|t| t.kind == kind)
    }

    /// Exact timestamp match, not a same-day match
    pub fn get_by_posting_date(&self, posting_date: NaiveDateTime) -> CoreResult<Vec<Transaction>> {
        self.filtered(|t| t.posting_date == posting_date)
    }

    // ==================== Mutations ====================

    /// Append `record` under a freshly generated id and return that id.
    ///
    /// Any id already present on `record` is discarded.
    pub fn create(&self, mut record: Transaction) -> CoreResult<Uuid> {
        let _guard = self.guard();
        let mut records = self.load()?;

        record.id = Uuid::new_v4();
        let id = record.id;
        records.push(record);
        self.save(&records)?;

        log::info!("Created transaction {}", id);
        Ok(id)
    }

    /// Replace every field of the stored record with the same id.
    ///
    /// Returns `None` without writing when no record has that id.
    pub fn update(&self, record: &Transaction) -> CoreResult<Option<Transaction>> {
        self.modify(record.id, |stored| stored.overwrite_from(record))
    }

    /// Mark the stored record with the same id as cleared now.
    ///
    /// The cleared fields of `record` are ignored; only its id is used.
    pub fn update_cleared_status(&self, record: &Transaction) -> CoreResult<Option<Transaction>> {
        let now = Local::now().naive_local();
        self.modify(record.id, |stored| stored.mark_cleared(now))
    }

    /// Remove the record whose canonical id text equals `id`.
    ///
    /// Returns `false` without writing when no record matches.
    pub fn delete(&self, id: &str) -> CoreResult<bool> {
        let _guard = self.guard();
        let mut records = self.load()?;

        let Some(position) = records.iter().position(|t| t.id_text() == id) else {
            log::debug!("Delete skipped, transaction {} not found", id);
            return Ok(false);
        };

        records.remove(position);
        self.save(&records)?;

        log::info!("Deleted transaction {}", id);
        Ok(true)
    }

    // ==================== Internals ====================

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded state lives on disk, a panicked holder leaves nothing
        // half-updated in memory.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn filtered<F>(&self, predicate: F) -> CoreResult<Vec<Transaction>>
    where
        F: Fn(&Transaction) -> bool,
    {
        let _guard = self.guard();
        Ok(self.load()?.into_iter().filter(|t| predicate(t)).collect())
    }

    fn modify<F>(&self, id: Uuid, apply: F) -> CoreResult<Option<Transaction>>
    where
        F: FnOnce(&mut Transaction),
    {
        let _guard = self.guard();
        let mut records = self.load()?;

        let Some(stored) = records.iter_mut().find(|t| t.id == id) else {
            log::debug!("Update skipped, transaction {} not found", id);
            return Ok(None);
        };

        apply(stored);
        let updated = stored.clone();
        self.save(&records)?;

        log::info!("Updated transaction {}", id);
        Ok(Some(updated))
    }

    /// Load the full list. Callers must hold the guard.
    fn load(&self) -> CoreResult<Vec<Transaction>> {
        match self.document.read() {
            Ok(Some(records)) => {
                log::debug!(
                    "Loaded {} transactions from {}",
                    records.len(),
                    self.document.describe()
                );
                Ok(records)
            }
            Ok(None) => Ok(Vec::new()),
            Err(e) => match self.mode {
                LoadMode::Lenient => {
                    log::warn!(
                        "Treating {} as empty: {}",
                        self.document.describe(),
                        e
                    );
                    Ok(Vec::new())
                }
                LoadMode::Strict => {
                    log::error!("Failed to load {}: {}", self.document.describe(), e);
                    Err(e)
                }
            },
        }
    }

    /// Replace the document with `records`. Callers must hold the guard.
    fn save(&self, records: &[Transaction]) -> CoreResult<()> {
        self.document.write(records).map_err(|e| {
            log::error!("Failed to save {}: {}", self.document.describe(), e);
            e
        })?;
        log::debug!(
            "Saved {} transactions to {}",
            records.len(),
            self.document.describe()
        );
        Ok(())
    }
}
