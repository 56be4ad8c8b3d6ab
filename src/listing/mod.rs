//! Turning directory-index HTML into [`ListingEntry`](crate::domain::ListingEntry) rows.
//!
//! ```text
//! HTML → RawRow (per <tr>) → ListingEntry
//! ```

pub mod classifier;
pub mod parser;

pub use classifier::{classify, describe, is_playable_video};
pub use parser::{ListingParser, RawRow};
