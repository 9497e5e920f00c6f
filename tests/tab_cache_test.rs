//! Tests for the tab cache lifecycle
//!
//! An entry is created NotLoaded on first reference, fetched on demand,
//! and never refetched once Loaded unless the user forces a reload. The
//! Loading status doubles as the in-flight guard: a second ensure_loaded
//! while a fetch is outstanding must not issue a second gateway call.

use sheetdash::api::Tab;
use sheetdash::cache::{TabCache, TabStatus};
use sheetdash::handlers::handle_api_response;
use sheetdash::listing::ListingController;
use sheetdash::service::{ApiRequest, ApiResponse};
use tokio::sync::mpsc;

fn new_state() -> (
    ListingController,
    TabCache,
    mpsc::UnboundedReceiver<ApiRequest>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ListingController::new(tx.clone(), 12), TabCache::new(tx), rx)
}

fn tab(gid: &str, title: &str) -> Tab {
    Tab {
        gid: gid.to_string(),
        title: title.to_string(),
        preview: Vec::new(),
    }
}

fn expect_list_tabs(rx: &mut mpsc::UnboundedReceiver<ApiRequest>) -> (String, u64) {
    match rx.try_recv().expect("Expected a ListTabs request") {
        ApiRequest::ListTabs {
            sheet_id,
            generation,
        } => (sheet_id, generation),
        other => panic!("Expected ListTabs, got {:?}", other),
    }
}

/// Scenario: fresh entry is NotLoaded; ensure_loaded transitions it to
/// Loading and then Loaded with the fetched tabs
#[test]
fn test_entry_lifecycle_not_loaded_to_loaded() {
    let (mut listing, mut cache, mut rx) = new_state();

    let entry = cache.get_tabs("sheetX");
    assert_eq!(entry.status, TabStatus::NotLoaded);
    assert!(entry.tabs.is_empty());

    cache.ensure_loaded("sheetX");
    assert_eq!(cache.get_tabs("sheetX").status, TabStatus::Loading);

    let (sheet_id, generation) = expect_list_tabs(&mut rx);
    assert_eq!(sheet_id, "sheetX");

    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result: Ok(vec![tab("0", "Sheet1")]),
        },
    );

    let entry = cache.get_tabs("sheetX");
    assert_eq!(entry.status, TabStatus::Loaded);
    assert_eq!(entry.tabs.len(), 1);
    assert_eq!(entry.tabs[0].title, "Sheet1");
}

/// Test: ensure_loaded twice in immediate succession issues at most one
/// gateway call
#[test]
fn test_ensure_loaded_is_idempotent_while_loading() {
    let (_listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    cache.ensure_loaded("sheetX");

    let _ = expect_list_tabs(&mut rx);
    assert!(
        rx.try_recv().is_err(),
        "Second ensure_loaded while Loading must not fetch again"
    );
}

/// Test: ensure_loaded on a Loaded entry does not refetch
#[test]
fn test_loaded_entry_is_never_auto_refreshed() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    let (sheet_id, generation) = expect_list_tabs(&mut rx);
    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result: Ok(vec![tab("0", "Sheet1")]),
        },
    );

    cache.ensure_loaded("sheetX");
    assert!(
        rx.try_recv().is_err(),
        "Loaded entry must not refetch without force_reload"
    );
    assert_eq!(cache.get_tabs("sheetX").status, TabStatus::Loaded);
}

/// Test: force_reload always issues a new gateway call, even when Loaded
#[test]
fn test_force_reload_bypasses_cache() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    let (sheet_id, generation) = expect_list_tabs(&mut rx);
    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result: Ok(vec![tab("0", "Sheet1")]),
        },
    );
    assert_eq!(cache.get_tabs("sheetX").status, TabStatus::Loaded);

    cache.force_reload("sheetX");

    let entry = cache.get_tabs("sheetX");
    assert_eq!(entry.status, TabStatus::Loading, "Entry restarts at Loading");
    assert!(entry.tabs.is_empty(), "Cached tabs are discarded");
    assert!(
        rx.try_recv().is_ok(),
        "force_reload must issue a new gateway call"
    );
}

/// Test: a failing tab fetch yields Failed with empty tabs
#[test]
fn test_failed_fetch_yields_failed_status() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    let (sheet_id, generation) = expect_list_tabs(&mut rx);

    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result: Err(anyhow::anyhow!("connection refused")),
        },
    );

    let entry = cache.get_tabs("sheetX");
    assert_eq!(entry.status, TabStatus::Failed);
    assert!(entry.tabs.is_empty());
}

/// Test: an empty tab list is a valid success, not a failure
#[test]
fn test_empty_tabs_is_loaded_not_failed() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    let (sheet_id, generation) = expect_list_tabs(&mut rx);

    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id,
            generation,
            result: Ok(Vec::new()),
        },
    );

    let entry = cache.get_tabs("sheetX");
    assert_eq!(
        entry.status,
        TabStatus::Loaded,
        "No inner sheets beyond the default is a legitimate result"
    );
    assert!(entry.tabs.is_empty());
}

/// Test: a result from a fetch superseded by force_reload is dropped
///
/// force_reload during Loading leaves the old fetch running to completion
/// (there is no cancellation). Its late result must apply only to the
/// generation it belongs to, never to the replacement fetch.
#[test]
fn test_superseded_generation_result_is_dropped() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetX");
    let (_, old_generation) = expect_list_tabs(&mut rx);

    cache.force_reload("sheetX");
    let (_, new_generation) = expect_list_tabs(&mut rx);
    assert_ne!(old_generation, new_generation);

    // Old fetch completes late
    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id: "sheetX".to_string(),
            generation: old_generation,
            result: Ok(vec![tab("0", "Stale")]),
        },
    );

    let entry = cache.get_tabs("sheetX");
    assert_eq!(
        entry.status,
        TabStatus::Loading,
        "Old-generation result must not complete the new fetch"
    );
    assert!(entry.tabs.is_empty());

    // New fetch completes with fresh data
    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id: "sheetX".to_string(),
            generation: new_generation,
            result: Ok(vec![tab("1", "Fresh")]),
        },
    );

    let entry = cache.get_tabs("sheetX");
    assert_eq!(entry.status, TabStatus::Loaded);
    assert_eq!(entry.tabs[0].title, "Fresh");
}

/// Test: entries are independent per sheet id
#[test]
fn test_entries_are_keyed_by_sheet_id() {
    let (mut listing, mut cache, mut rx) = new_state();

    cache.ensure_loaded("sheetA");
    cache.ensure_loaded("sheetB");

    let (first_id, first_gen) = expect_list_tabs(&mut rx);
    let (second_id, _) = expect_list_tabs(&mut rx);
    assert_eq!(first_id, "sheetA");
    assert_eq!(second_id, "sheetB");

    handle_api_response(
        &mut listing,
        &mut cache,
        ApiResponse::TabsResult {
            sheet_id: "sheetA".to_string(),
            generation: first_gen,
            result: Ok(vec![tab("0", "Only A")]),
        },
    );

    assert_eq!(cache.get_tabs("sheetA").status, TabStatus::Loaded);
    assert_eq!(
        cache.get_tabs("sheetB").status,
        TabStatus::Loading,
        "Completing sheetA must not touch sheetB"
    );
}
