//! Faceted search: filter state, query compilation, and tiered pagination
//!
//! The flow is: a `FilterSelection` plus a keyword compiles into a
//! `SearchRequest` (see [`compiler`]), the request goes to the search API,
//! and the result total feeds the pager for page-bounds enforcement.

pub mod compiler;
pub mod fields;
pub mod filters;
pub mod pager;

pub use compiler::{compile, PageRequest};
pub use fields::DEFAULT_SCOPES;
pub use filters::FilterSelection;
pub use pager::{effective_page, page_window, AccessTier, BlockReason, PageDecision, PageWindow};
