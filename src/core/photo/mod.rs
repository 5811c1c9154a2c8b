//! # Photo Module
//!
//! The photo records the analysis engine works on, and the ordered set that
//! owns them.

mod record;
mod set;

pub use record::{PhotoMetadata, PhotoRecord};
pub use set::{PhotoSet, SortOrder};
