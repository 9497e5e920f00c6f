//! Background API service
//!
//! Executes gateway requests off the main control flow. Requests arrive on
//! an unbounded channel, each runs in its own task, and the outcome comes
//! back as an [`ApiResponse`]. No retries and no cancellation: an in-flight
//! request always runs to completion, even if its result has gone stale by
//! the time it lands.
//!
//! Sequencing lives with the callers, not here: the listing controller
//! stamps its fetches with a request token and the tab cache guards with
//! its `Loading` status, so the service itself performs no deduplication.

use tokio::sync::mpsc;

use crate::api::{SheetPage, SheetsClient, Tab};
use crate::log_debug;

/// API request types
#[derive(Debug, Clone)]
pub enum ApiRequest {
    /// Fetch one page of the sheet listing
    ListSheets {
        page: u32,
        page_size: u32,
        query: String,
        /// Identifies the fetch; responses carrying a superseded token are
        /// discarded by the handler.
        token: u64,
    },

    /// Fetch the inner tabs of one sheet
    ListTabs {
        sheet_id: String,
        /// Cache-entry generation this fetch belongs to
        generation: u64,
    },

    /// Invalidate the server-cached preview for one sheet
    RefreshPreview { sheet_id: String },
}

/// API response types
#[derive(Debug)]
pub enum ApiResponse {
    SheetPageResult {
        token: u64,
        result: Result<SheetPage, anyhow::Error>,
    },

    TabsResult {
        sheet_id: String,
        generation: u64,
        result: Result<Vec<Tab>, anyhow::Error>,
    },

    RefreshResult {
        sheet_id: String,
        success: bool,
        error: Option<anyhow::Error>,
    },
}

/// Spawn the API service worker
pub fn spawn_api_service(
    client: SheetsClient,
) -> (
    mpsc::UnboundedSender<ApiRequest>,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();

    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            let client = client.clone();
            let response_tx = response_tx.clone();

            tokio::spawn(async move {
                let response = execute_request(&client, request).await;
                let _ = response_tx.send(response);
            });
        }
    });

    (request_tx, response_rx)
}

/// Execute an API request and return the response
async fn execute_request(client: &SheetsClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::ListSheets {
            page,
            page_size,
            query,
            token,
        } => {
            log_debug(&format!(
                "DEBUG [API Service]: ListSheets page={} pageSize={} query={:?} token={}",
                page, page_size, query, token
            ));
            let result = client.list_sheets(page, page_size, &query).await;

            ApiResponse::SheetPageResult { token, result }
        }

        ApiRequest::ListTabs {
            sheet_id,
            generation,
        } => {
            let result = client.list_tabs(&sheet_id).await;

            ApiResponse::TabsResult {
                sheet_id,
                generation,
                result,
            }
        }

        ApiRequest::RefreshPreview { sheet_id } => match client.refresh_preview(&sheet_id).await {
            Ok(()) => ApiResponse::RefreshResult {
                sheet_id,
                success: true,
                error: None,
            },
            Err(e) => ApiResponse::RefreshResult {
                sheet_id,
                success: false,
                error: Some(e),
            },
        },
    }
}
