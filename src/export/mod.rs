//! Output of check results.
//!
//! Single-zone checks render a text report; bulk runs export CSV with one row
//! per nameserver verdict.

pub mod csv;
pub mod report;

pub use self::csv::{export_csv, write_csv};
pub use report::render_report;
