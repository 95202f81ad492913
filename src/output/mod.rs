//! Output formatting
//!
//! `text` renders the stdout report lines, `json` the optional machine-readable
//! report.

pub mod json;
pub mod text;
