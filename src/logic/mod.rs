//! Pure helper functions with no I/O: deep-link templates, tab filtering,
//! and display formatting.

pub mod filter;
pub mod formatting;
pub mod links;
