//! Client for the remote engagement-tracking REST API.
//!
//! The remote exposes paginated JSON collections (engagements, tests, users,
//! products, environments) and accepts partial-field PUT updates. Every call
//! carries a static token and a fixed timeout; there are no retries and no
//! caching, each fetch is an independent snapshot read.

pub mod client;
pub mod entities;
pub mod error;
pub mod lookups;
pub mod metrics_defs;

pub use client::Tracker;
pub use error::TrackerError;
pub use lookups::{LookupMap, Lookups};
