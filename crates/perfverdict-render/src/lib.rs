//! Output formatting for perfverdict.
//!
//! Turns reports, statistics and extracted tables into [`RenderedTable`]s
//! (rounded, NaN-filled, unit-suffixed) and writes those as CSV, JSON
//! Lines or Markdown. Nothing here feeds back into classification.

mod extract;
mod report;
mod summary;
mod table;

pub use extract::{render_metadata, render_testrun};
pub use report::render_report;
pub use summary::render_summary;
pub use table::{Cell, OutputFormat, RenderedTable, csv_escape, number_cell, round_to};
