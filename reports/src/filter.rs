//! Predicate filter engine.
//!
//! Each entity kind has a fixed, enumerated set of optional filter options;
//! this is not a query language. An absent or empty option is no constraint,
//! configured options AND together, and evaluation short-circuits on the
//! first failing predicate. Four predicate kinds exist: case-insensitive
//! substring, case-sensitive exact match, string-cast id equality, and
//! inclusive lexicographic date range (the `"N/A"` sentinel always passes
//! range checks so records are never dropped for missing dates).

use crate::normalize::{EngagementRow, NA, TestRow};
use serde::Deserialize;

/// Recognized filter options for engagement listings. Deserializes directly
/// from the request query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngagementFilter {
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub mentor_status: Option<String>,
    pub lead_status: Option<String>,
    pub product: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub appsec_eta_from: Option<String>,
    pub appsec_eta_to: Option<String>,
    pub rm_eta_from: Option<String>,
    pub rm_eta_to: Option<String>,
}

/// Recognized filter options for test listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestFilter {
    pub title: Option<String>,
    pub jira_status: Option<String>,
    pub jira_type: Option<String>,
    pub analysis_status: Option<String>,
    pub assigned_to: Option<String>,
    pub build_type: Option<String>,
    pub task: Option<String>,
}

/// A configured option: present and non-empty. Engagement options match
/// verbatim, whitespace included.
fn active(option: &Option<String>) -> Option<&str> {
    option.as_deref().filter(|v| !v.is_empty())
}

/// Test-side options additionally ignore surrounding whitespace.
fn active_trimmed(option: &Option<String>) -> Option<&str> {
    active(option).map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// String-cast id equality, tolerating a numeric id arriving as filter text.
fn id_matches(filter: &str, id: Option<i64>) -> bool {
    id.is_some_and(|id| filter == id.to_string())
}

/// Inclusive lexicographic range over `YYYY-MM-DD`-shaped strings. A record
/// whose field is the sentinel always passes.
fn in_range(value: &str, from: Option<&str>, to: Option<&str>) -> bool {
    if value == NA {
        return true;
    }
    if from.is_some_and(|from| value < from) {
        return false;
    }
    if to.is_some_and(|to| value > to) {
        return false;
    }
    true
}

pub fn matches_engagement(row: &EngagementRow, filter: &EngagementFilter) -> bool {
    if let Some(needle) = active(&filter.task_name) {
        if !contains_ci(&row.name, needle) {
            return false;
        }
    }
    if let Some(status) = active(&filter.status) {
        if row.status != status {
            return false;
        }
    }
    if let Some(lead) = active(&filter.assigned_to) {
        if !id_matches(lead, row.lead_id) {
            return false;
        }
    }
    if let Some(mentor_status) = active(&filter.mentor_status) {
        if row.build_id != mentor_status {
            return false;
        }
    }
    if let Some(lead_status) = active(&filter.lead_status) {
        if row.commit_hash != lead_status {
            return false;
        }
    }
    if let Some(product) = active(&filter.product) {
        if !id_matches(product, row.product_id) {
            return false;
        }
    }
    in_range(
        &row.created,
        active(&filter.created_from),
        active(&filter.created_to),
    ) && in_range(
        &row.target_start,
        active(&filter.appsec_eta_from),
        active(&filter.appsec_eta_to),
    ) && in_range(
        &row.target_end,
        active(&filter.rm_eta_from),
        active(&filter.rm_eta_to),
    )
}

pub fn matches_test(row: &TestRow, filter: &TestFilter) -> bool {
    if let Some(needle) = active_trimmed(&filter.title) {
        if !contains_ci(&row.title, needle) {
            return false;
        }
    }
    if let Some(jira_status) = active_trimmed(&filter.jira_status) {
        if row.branch_tag != jira_status {
            return false;
        }
    }
    if let Some(jira_type) = active_trimmed(&filter.jira_type) {
        if row.commit_hash != jira_type {
            return false;
        }
    }
    if let Some(analysis_status) = active_trimmed(&filter.analysis_status) {
        if row.build_id != analysis_status {
            return false;
        }
    }
    if let Some(lead) = active_trimmed(&filter.assigned_to) {
        if !id_matches(lead, row.lead_id) {
            return false;
        }
    }
    if let Some(environment) = active_trimmed(&filter.build_type) {
        if !id_matches(environment, row.environment_id) {
            return false;
        }
    }
    if let Some(engagement) = active_trimmed(&filter.task) {
        if !id_matches(engagement, row.engagement_id) {
            return false;
        }
    }
    true
}
