//! Reference lookup maps (id → display name).
//!
//! Built fresh per request from full collection fetches and never persisted.
//! Reference fetches fail open: a transport or parse failure degrades to an
//! empty map, so callers see every foreign key resolve to the `"N/A"`
//! sentinel instead of the whole request aborting. The degradation is
//! observable through a warn log and a counter.

use crate::client::Tracker;
use crate::entities::RawUser;
use crate::metrics_defs::LOOKUP_FETCH_FAILED;
use std::collections::HashMap;

pub type LookupMap = HashMap<i64, String>;

/// Bundle of the four reference maps. Endpoints fill only the kinds they
/// join against; the rest stay empty and resolve to the sentinel.
#[derive(Debug, Default, Clone)]
pub struct Lookups {
    pub users: LookupMap,
    pub products: LookupMap,
    pub engagements: LookupMap,
    pub environments: LookupMap,
}

/// Display name for a user: "first last" trimmed, then username, then "N/A".
fn user_display_name(user: &RawUser) -> String {
    let first = user.first_name.as_deref().unwrap_or("");
    let last = user.last_name.as_deref().unwrap_or("");
    let full = format!("{first} {last}").trim().to_string();
    if !full.is_empty() {
        return full;
    }
    match user.username.as_deref() {
        Some(username) if !username.is_empty() => username.to_string(),
        _ => "N/A".to_string(),
    }
}

fn degraded(kind: &'static str, error: &crate::TrackerError) -> LookupMap {
    tracing::warn!(kind, error = %error, "reference fetch failed, degrading to empty lookup map");
    metrics::counter!(LOOKUP_FETCH_FAILED.name, "kind" => kind).increment(1);
    LookupMap::new()
}

impl Tracker {
    pub async fn users_map(&self) -> LookupMap {
        match self.users().await {
            Ok(users) => users
                .iter()
                .filter_map(|user| user.id.map(|id| (id, user_display_name(user))))
                .collect(),
            Err(error) => degraded("users", &error),
        }
    }

    pub async fn products_map(&self) -> LookupMap {
        match self.products().await {
            Ok(products) => named_map(products),
            Err(error) => degraded("products", &error),
        }
    }

    pub async fn engagements_map(&self) -> LookupMap {
        match self.engagements().await {
            Ok(engagements) => engagements
                .into_iter()
                .filter_map(|eng| {
                    eng.id
                        .map(|id| (id, eng.name.unwrap_or_else(|| "N/A".to_string())))
                })
                .collect(),
            Err(error) => degraded("engagements", &error),
        }
    }

    pub async fn environments_map(&self) -> LookupMap {
        match self.environments().await {
            Ok(environments) => named_map(environments),
            Err(error) => degraded("environments", &error),
        }
    }
}

fn named_map(records: Vec<crate::entities::RawNamed>) -> LookupMap {
    records
        .into_iter()
        .filter_map(|record| {
            record
                .id
                .map(|id| (id, record.name.unwrap_or_else(|| "N/A".to_string())))
        })
        .collect()
}
