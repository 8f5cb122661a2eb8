use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::color::DimensionColors;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::error::DataError;
use crate::data::filter::{apply_filters, PredicateSet, Selected};
use crate::data::loader::DataSource;
use crate::data::model::{Attribute, Dimension, SurveyTable};
use crate::data::stats::{
    distribution, radar_series, summarize, Distribution, RadarSeries, Summary,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct AppState {
    cache: DatasetCache,

    /// Scored snapshot from the cache (None until a load succeeds).
    pub table: Option<Arc<SurveyTable>>,

    /// Per-attribute checked values. Nothing checked means everyone.
    pub filters: PredicateSet,

    /// Respondents passing the current filters.
    pub selected: Selected,

    /// Outputs recomputed on every filter change.
    pub summary: Summary,
    pub radar: Option<RadarSeries>,
    pub distributions: Vec<Distribution>,

    pub colors: DimensionColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Earliest time the cache is consulted again for expiry.
    next_check: Option<Instant>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        let source = DataSource::parse(&config.source);
        Self {
            cache: DatasetCache::new(source, config.cache_ttl()),
            table: None,
            filters: PredicateSet::new(),
            selected: Selected::default(),
            summary: Summary::new(),
            radar: None,
            distributions: Vec::new(),
            colors: DimensionColors::default(),
            status_message: None,
            next_check: None,
        }
    }

    pub fn source(&self) -> &DataSource {
        self.cache.source()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache.ttl()
    }

    /// Fetch the table through the cache (no network hit while the
    /// snapshot is fresh).
    pub fn load(&mut self) {
        let result = self.cache.get();
        self.finish_load(result);
    }

    /// Drop the cached snapshot and fetch again.
    pub fn reload(&mut self) {
        let result = self.cache.refresh();
        self.finish_load(result);
    }

    /// Re-consult the cache once its TTL has elapsed and ingest the table
    /// only if a new snapshot was fetched. Failed fetches are retried after
    /// another TTL, not on every frame.
    pub fn refresh_if_stale(&mut self) {
        let Some(ttl) = self.cache.ttl() else {
            return;
        };
        if self.table.is_none() {
            return;
        }
        let now = Instant::now();
        if self.next_check.is_some_and(|at| now < at) {
            return;
        }
        self.next_check = Some(now + ttl);

        match self.cache.get() {
            Ok(table) => {
                let unchanged = self
                    .table
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &table));
                if !unchanged {
                    log::info!("Survey snapshot expired, showing {} respondents", table.len());
                    self.set_dataset(table);
                }
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Switch to a local CSV file. The current source stays active if the
    /// file cannot be loaded.
    pub fn open_path(&mut self, path: PathBuf) {
        let mut cache = DatasetCache::new(DataSource::Path(path), self.cache.ttl());
        match cache.get() {
            Ok(table) => {
                self.cache = cache;
                self.finish_load(Ok(table));
            }
            Err(e) => self.finish_load(Err(e)),
        }
    }

    fn finish_load(&mut self, result: Result<Arc<SurveyTable>, DataError>) {
        self.next_check = self.cache.ttl().map(|ttl| Instant::now() + ttl);
        match result {
            Ok(table) => self.set_dataset(table),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Ingest a scored table; filters keep only values it still offers.
    pub fn set_dataset(&mut self, table: Arc<SurveyTable>) {
        for (attr, values) in self.filters.iter_mut() {
            let options = table.options(*attr);
            values.retain(|v| options.contains(v));
        }
        self.filters.retain(|_, values| !values.is_empty());
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the selection and every derived output.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.selected = apply_filters(table, &self.filters);
        let view = self.selected.view(table);

        self.summary = summarize(view, &Dimension::ALL);
        self.radar = Some(radar_series(view, &Dimension::ALL));
        self.distributions = Dimension::ALL
            .iter()
            .map(|&dim| distribution(view, dim))
            .collect();

        log::debug!(
            "Filters {:?} select {} of {} respondents",
            self.filters,
            self.selected.len(),
            table.len()
        );
    }

    pub fn is_checked(&self, attr: Attribute, value: &str) -> bool {
        self.filters
            .get(&attr)
            .is_some_and(|values| values.contains(value))
    }

    /// Toggle a single value in an attribute's filter.
    pub fn toggle_filter_value(&mut self, attr: Attribute, value: &str) {
        let values = self.filters.entry(attr).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        if values.is_empty() {
            self.filters.remove(&attr);
        }
        self.refilter();
    }

    /// Remove the constraint on one attribute (everyone passes it).
    pub fn clear_filter(&mut self, attr: Attribute) {
        self.filters.remove(&attr);
        self.refilter();
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }
}
