//! Join-filter-paginate-summarize engine.
//!
//! Takes raw entity collections fetched by the `tracker` crate and turns them
//! into display-ready JSON payloads: foreign keys resolve through lookup maps,
//! derived fields (age in days, reformatted timestamps) are computed, an
//! enumerated set of optional predicates narrows the set, and the result is
//! either paginated, cross-tabulated into summary matrices, or scanned for
//! distinct filter-option values.
//!
//! Everything in this crate is pure and request-local; nothing here performs
//! I/O or holds state across calls.

pub mod filter;
pub mod jira_counts;
pub mod normalize;
pub mod options;
pub mod paginate;
pub mod summary;
