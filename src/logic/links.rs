//! Deep-link construction
//!
//! Fixed URL templates for opening a spreadsheet or one of its tabs in the
//! upstream editor. Consumed by presentation only; the core never follows
//! these links.

/// URL that opens a spreadsheet in the editor.
pub fn sheet_url(sheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/edit",
        urlencoding::encode(sheet_id)
    )
}

/// URL that opens one tab of a spreadsheet. The gid is embedded both as a
/// query parameter and as a fragment.
pub fn tab_url(sheet_id: &str, gid: &str) -> String {
    let id = urlencoding::encode(sheet_id);
    let gid = urlencoding::encode(gid);
    format!(
        "https://docs.google.com/spreadsheets/d/{}/edit?gid={}#gid={}",
        id, gid, gid
    )
}
