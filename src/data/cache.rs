use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::DataError;
use super::loader::{self, DataSource};
use super::model::SurveyTable;
use super::scoring::derive_scores;

// ---------------------------------------------------------------------------
// Table source – anything that can produce a fresh survey table
// ---------------------------------------------------------------------------

pub trait TableSource {
    /// Human-readable address for logs and status lines.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<SurveyTable, DataError>;
}

impl TableSource for DataSource {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn fetch(&self) -> Result<SurveyTable, DataError> {
        loader::load(self)
    }
}

// ---------------------------------------------------------------------------
// Session-scoped dataset cache
// ---------------------------------------------------------------------------

struct Entry {
    table: Arc<SurveyTable>,
    loaded_at: Instant,
}

/// Lazily loads and scores the survey once, then hands out the same
/// immutable snapshot until the entry expires or is invalidated.
///
/// `ttl = None` keeps the snapshot for the whole session.
pub struct DatasetCache<S: TableSource = DataSource> {
    source: S,
    ttl: Option<Duration>,
    entry: Option<Entry>,
}

impl<S: TableSource> DatasetCache<S> {
    pub fn new(source: S, ttl: Option<Duration>) -> Self {
        DatasetCache {
            source,
            ttl,
            entry: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Return the cached table, loading it when absent or stale.
    ///
    /// A failed load leaves any previous snapshot untouched.
    pub fn get(&mut self) -> Result<Arc<SurveyTable>, DataError> {
        self.get_at(Instant::now())
    }

    fn get_at(&mut self, now: Instant) -> Result<Arc<SurveyTable>, DataError> {
        if let Some(entry) = &self.entry {
            if !self.is_expired(entry, now) {
                return Ok(Arc::clone(&entry.table));
            }
            log::info!(
                "Cached survey from {} expired, reloading",
                self.source.describe()
            );
        }

        let table = Arc::new(derive_scores(self.source.fetch()?));
        self.entry = Some(Entry {
            table: Arc::clone(&table),
            loaded_at: now,
        });
        Ok(table)
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.loaded_at) >= ttl)
    }

    /// Drop the cached snapshot; the next [`get`](Self::get) reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Invalidate and load again.
    pub fn refresh(&mut self) -> Result<Arc<SurveyTable>, DataError> {
        self.invalidate();
        self.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }
}
