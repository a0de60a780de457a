//! Core library for partslip.
//!
//! Turns a weekly meeting schedule exported from a spreadsheet into
//! per-person assignment messages:
//!
//! - `csv`: quote-tolerant CSV parsing into a `Grid`
//! - `dates`: English month/day headers to compact `N月D日` dates
//! - `cell`: compact `"<slot> <name>[ / <assistant>]"` cell decoding
//! - `extract`: grid walk producing `AssignmentRecord`s
//! - `render`: message templates and display titles
//! - `source` / `client`: sheet URL detection and HTTP loading
//!
//! Everything except `client` is synchronous and pure.

pub mod cell;
pub mod client;
pub mod csv;
pub mod dates;
pub mod error;
pub mod extract;
pub mod models;
pub mod render;
pub mod source;

pub use client::{check_proxy_sentinel, load_bytes, load_text, LoadOptions, SheetClient};
pub use csv::Grid;
pub use dates::{CrossMonthStyle, DateTransliterator};
pub use error::{CoreError, LoadError};
pub use extract::{Extractor, SlotFilter};
pub use models::{AssignmentFragment, AssignmentRecord, RenderedMessage, Role, Schedule};
pub use render::{MessageRenderer, Templates};
pub use source::SheetSource;
