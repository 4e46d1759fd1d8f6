//! Address handling for Trawl
//!
//! This module turns raw anchor references into absolute, fragment-free
//! addresses and tidies user-supplied start addresses.

mod canonical;
mod start;

pub use canonical::canonicalize_link;
pub use start::normalize_start_address;
