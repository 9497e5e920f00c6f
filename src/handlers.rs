//! API response handler
//!
//! Applies responses from the background API service to the listing
//! controller and tab cache. Transport failures are absorbed here: callers
//! only ever observe state (an empty page, a `Failed` cache status), never
//! an error value.

use crate::cache::TabCache;
use crate::listing::ListingController;
use crate::log_debug;
use crate::service::ApiResponse;

/// Handle one API response from the background service.
///
/// Response types:
/// - SheetPageResult: one page of the sheet listing (token-checked)
/// - TabsResult: inner tabs for one sheet (generation-checked)
/// - RefreshResult: outcome of a preview invalidation; success re-fetches
///   the current listing page, failure leaves the page as-is
pub fn handle_api_response(
    listing: &mut ListingController,
    cache: &mut TabCache,
    response: ApiResponse,
) {
    match response {
        ApiResponse::SheetPageResult { token, result } => {
            listing.complete_fetch(token, result);
        }

        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result,
        } => {
            cache.complete_load(&sheet_id, generation, result);
        }

        ApiResponse::RefreshResult {
            sheet_id,
            success,
            error,
        } => {
            if success {
                listing.refresh_current_page();
            } else {
                log_debug(&format!(
                    "ERROR [Refresh]: Preview refresh failed for sheet {}: {}",
                    sheet_id,
                    error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "unknown error".to_string())
                ));
            }
        }
    }
}
