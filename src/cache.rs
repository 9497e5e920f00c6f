//! Tab Cache
//!
//! Per-sheet lazily-populated store of a spreadsheet's inner tabs, keyed by
//! sheet id. An entry is created on first reference, populated on demand,
//! and never expires without an explicit reload. The `Loading` status is
//! the in-flight guard: at most one tab fetch is outstanding per sheet id.
//!
//! Every issued fetch carries the entry's generation number; a result whose
//! generation no longer matches (the entry was discarded and refetched in
//! the meantime) is dropped instead of resurrecting stale data.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::api::Tab;
use crate::log_debug;
use crate::service::ApiRequest;

/// Load status of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    NotLoaded,
    Loading,
    Loaded,
    /// The fetch failed; `tabs` is empty. Indistinguishable from a
    /// legitimately empty spreadsheet except by this flag.
    Failed,
}

/// Cached tabs for one sheet, visible to consumers as a read-only snapshot.
#[derive(Debug, Clone)]
pub struct TabCacheEntry {
    pub tabs: Vec<Tab>,
    pub status: TabStatus,
    generation: u64,
}

impl TabCacheEntry {
    fn not_loaded() -> Self {
        Self {
            tabs: Vec::new(),
            status: TabStatus::NotLoaded,
            generation: 0,
        }
    }
}

pub struct TabCache {
    entries: HashMap<String, TabCacheEntry>,
    fetch_seq: u64,
    api_tx: mpsc::UnboundedSender<ApiRequest>,
}

impl TabCache {
    pub fn new(api_tx: mpsc::UnboundedSender<ApiRequest>) -> Self {
        Self {
            entries: HashMap::new(),
            fetch_seq: 0,
            api_tx,
        }
    }

    /// Current entry for a sheet, creating a `NotLoaded` entry if absent.
    /// Never triggers a fetch; that is [`TabCache::ensure_loaded`]'s job.
    pub fn get_tabs(&mut self, sheet_id: &str) -> &TabCacheEntry {
        self.entries
            .entry(sheet_id.to_string())
            .or_insert_with(TabCacheEntry::not_loaded)
    }

    /// Issue a tab fetch unless one already succeeded or is in flight.
    ///
    /// `NotLoaded` and `Failed` entries transition to `Loading` and enqueue
    /// a gateway fetch; `Loading` and `Loaded` entries are left alone.
    pub fn ensure_loaded(&mut self, sheet_id: &str) {
        let entry = self
            .entries
            .entry(sheet_id.to_string())
            .or_insert_with(TabCacheEntry::not_loaded);

        match entry.status {
            TabStatus::Loading | TabStatus::Loaded => return,
            TabStatus::NotLoaded | TabStatus::Failed => {}
        }

        self.fetch_seq += 1;
        entry.status = TabStatus::Loading;
        entry.tabs.clear();
        entry.generation = self.fetch_seq;

        let _ = self.api_tx.send(ApiRequest::ListTabs {
            sheet_id: sheet_id.to_string(),
            generation: self.fetch_seq,
        });
    }

    /// Discard whatever is cached for a sheet and fetch again, regardless
    /// of current status.
    pub fn force_reload(&mut self, sheet_id: &str) {
        self.entries.remove(sheet_id);
        self.ensure_loaded(sheet_id);
    }

    /// Apply the outcome of a tab fetch.
    ///
    /// An empty tab list is a valid success: the spreadsheet genuinely has
    /// no inner sheets beyond the default. Results for a generation that is
    /// no longer in flight are dropped.
    pub(crate) fn complete_load(
        &mut self,
        sheet_id: &str,
        generation: u64,
        result: Result<Vec<Tab>, anyhow::Error>,
    ) {
        let Some(entry) = self.entries.get_mut(sheet_id) else {
            log_debug(&format!(
                "DEBUG [TabCache]: Dropping tabs result for evicted sheet {}",
                sheet_id
            ));
            return;
        };

        if entry.status != TabStatus::Loading || entry.generation != generation {
            log_debug(&format!(
                "DEBUG [TabCache]: Dropping stale tabs result for sheet {} (generation {} != {})",
                sheet_id, generation, entry.generation
            ));
            return;
        }

        match result {
            Ok(tabs) => {
                entry.tabs = tabs;
                entry.status = TabStatus::Loaded;
            }
            Err(e) => {
                log_debug(&format!(
                    "ERROR [TabCache]: Tab fetch failed for sheet {}: {}",
                    sheet_id, e
                ));
                entry.tabs = Vec::new();
                entry.status = TabStatus::Failed;
            }
        }
    }
}
