//! Display formatting
//!
//! Pure functions for rendering sheet metadata and preview grids as plain
//! text.

use chrono::DateTime;
use serde_json::Value;

/// Marker shown for absent or unparseable values.
const UNKNOWN: &str = "\u{2014}";

/// Render a modified timestamp for display. A missing or unparseable
/// timestamp renders as the unknown marker.
pub fn format_modified_time(modified_time: Option<&str>) -> String {
    let Some(raw) = modified_time else {
        return UNKNOWN.to_string();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => UNKNOWN.to_string(),
    }
}

/// Render the owner list. Order is preserved from the source; an empty
/// list renders as the unknown marker.
pub fn format_owners(owners: &[String]) -> String {
    if owners.is_empty() {
        UNKNOWN.to_string()
    } else {
        owners.join(", ")
    }
}

/// Render one preview cell as plain text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render one preview row, cells separated by " | ".
pub fn preview_row(row: &[Value]) -> String {
    row.iter()
        .map(cell_text)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_time_renders_unknown() {
        assert_eq!(format_modified_time(None), UNKNOWN);
    }

    #[test]
    fn test_unparseable_time_renders_unknown() {
        assert_eq!(format_modified_time(Some("not a date")), UNKNOWN);
    }

    #[test]
    fn test_rfc3339_time_is_formatted() {
        assert_eq!(
            format_modified_time(Some("2025-06-01T12:30:00Z")),
            "2025-06-01 12:30"
        );
    }

    #[test]
    fn test_owners_join_preserves_order() {
        let owners = vec!["Ben".to_string(), "Ana".to_string(), "Ben".to_string()];
        assert_eq!(format_owners(&owners), "Ben, Ana, Ben");
    }

    #[test]
    fn test_empty_owners_render_unknown() {
        assert_eq!(format_owners(&[]), UNKNOWN);
    }

    #[test]
    fn test_cell_text_handles_scalars() {
        assert_eq!(cell_text(&json!("Rent")), "Rent");
        assert_eq!(cell_text(&json!(1200)), "1200");
        assert_eq!(cell_text(&json!(null)), "");
    }

    #[test]
    fn test_preview_row_joins_cells() {
        let row = vec![json!("Item"), json!("Cost"), json!(3.5)];
        assert_eq!(preview_row(&row), "Item | Cost | 3.5");
    }
}
