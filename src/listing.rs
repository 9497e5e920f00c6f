//! Listing Controller
//!
//! Owns the paginated, filtered view over the top-level sheet collection:
//! query string, 1-based page number, page size, server-reported total,
//! current items, and the loading flag. Changing query or page size resets
//! the page to 1 before the next fetch so a shrunken result set is never
//! asked for an out-of-range page.
//!
//! Every fetch is stamped with a monotonically increasing request token.
//! The response handler discards results whose token has been superseded,
//! so rapid query edits cannot flicker back to a stale page.

use tokio::sync::mpsc;

use crate::api::{Sheet, SheetPage};
use crate::log_debug;
use crate::service::ApiRequest;

pub struct ListingController {
    query: String,
    page: u32,
    page_size: u32,
    total: u64,
    items: Vec<Sheet>,
    loading: bool,
    request_seq: u64,
    api_tx: mpsc::UnboundedSender<ApiRequest>,
}

impl ListingController {
    /// Create a controller with an initial page size. No fetch is issued
    /// until one of the operations below triggers one.
    pub fn new(api_tx: mpsc::UnboundedSender<ApiRequest>, page_size: u32) -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            items: Vec::new(),
            loading: false,
            request_seq: 0,
            api_tx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Server-reported total for the current query. Advisory only; never
    /// recomputed locally.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn items(&self) -> &[Sheet] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Set the filter query and fetch page 1 of the new result set. An
    /// empty string means "no filter".
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
        self.issue_fetch();
    }

    /// Set the page size and fetch page 1. A zero size violates the
    /// documented precondition and is ignored.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size == 0 {
            log_debug("DEBUG [Listing]: Ignoring set_page_size(0)");
            return;
        }
        self.page_size = page_size;
        self.page = 1;
        self.issue_fetch();
    }

    /// Fetch a specific page, holding query and page size. The page is not
    /// clamped against `total`; a page beyond the data simply comes back
    /// empty. Page 0 is ignored.
    pub fn set_page(&mut self, page: u32) {
        if page == 0 {
            log_debug("DEBUG [Listing]: Ignoring set_page(0)");
            return;
        }
        self.page = page;
        self.issue_fetch();
    }

    /// Re-issue the fetch for the current page, query, and page size.
    pub fn refresh_current_page(&mut self) {
        self.issue_fetch();
    }

    /// Ask the gateway to invalidate one sheet's server-cached preview.
    ///
    /// The listing does not track per-item dirtiness: once the refresh
    /// succeeds, the response handler re-fetches the whole current page. A
    /// failed refresh is logged and the page stays as-is.
    pub fn refresh_sheet_preview(&mut self, sheet_id: &str) {
        let _ = self.api_tx.send(ApiRequest::RefreshPreview {
            sheet_id: sheet_id.to_string(),
        });
    }

    fn issue_fetch(&mut self) {
        self.request_seq += 1;
        self.loading = true;

        let _ = self.api_tx.send(ApiRequest::ListSheets {
            page: self.page,
            page_size: self.page_size,
            query: self.query.clone(),
            token: self.request_seq,
        });
    }

    /// Apply the outcome of a listing fetch.
    ///
    /// A response from a superseded fetch is discarded without touching
    /// state (a newer request is in flight or already landed). A current
    /// failure collapses to an empty page: callers cannot tell it apart
    /// from zero results, which is the documented contract.
    pub(crate) fn complete_fetch(&mut self, token: u64, result: Result<SheetPage, anyhow::Error>) {
        if token != self.request_seq {
            log_debug(&format!(
                "DEBUG [Listing]: Discarding stale listing response (token {} != {})",
                token, self.request_seq
            ));
            return;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
            }
            Err(e) => {
                log_debug(&format!("ERROR [Listing]: Listing fetch failed: {}", e));
                self.items = Vec::new();
                self.total = 0;
            }
        }
    }
}
