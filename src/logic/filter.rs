//! Tab filtering
//!
//! Pure functions for filtering already-loaded tabs by title in the detail
//! view. The listing-level query is applied server-side; this filter never
//! touches the gateway. Supports wildcard patterns using the glob crate.

use crate::api::Tab;

/// Match a search query against a tab title using wildcard patterns
///
/// # Pattern Rules
/// - "*" matches any sequence of characters
/// - Matches are case-insensitive
/// - An invalid pattern falls back to substring matching
///
/// # Examples
/// ```
/// use sheetdash::logic::filter::title_matches;
///
/// assert!(title_matches("budget", "Budget 2025"));
/// assert!(title_matches("*q2*", "Revenue Q2"));
/// ```
pub fn title_matches(query: &str, title: &str) -> bool {
    if query.is_empty() {
        return true; // Empty query matches everything
    }

    let query_lower = query.to_lowercase();
    let title_lower = title.to_lowercase();

    if let Ok(pattern) = glob::Pattern::new(&query_lower) {
        if pattern.matches(&title_lower) {
            return true;
        }
    }

    // Fallback: simple substring match
    title_lower.contains(&query_lower)
}

/// Filter a list of tabs by title query
pub fn filter_tabs(tabs: &[Tab], query: &str) -> Vec<Tab> {
    if query.is_empty() {
        return tabs.to_vec();
    }

    tabs.iter()
        .filter(|tab| title_matches(query, &tab.title))
        .cloned()
        .collect()
}
