//! Raw entity types as the remote API serves them.
//!
//! The remote shape is not under our control: fields may be absent, null, or
//! the wrong flavor of empty, and collection pages may contain null entries.
//! Everything here is optional; normalization into display-ready records
//! happens downstream with explicit per-field defaults.

use serde::Deserialize;

/// One page of an upstream collection, `{"results": [entity | null, ...]}`.
#[derive(Debug, Deserialize)]
pub struct ResultsPage<T> {
    #[serde(default = "Option::default")]
    pub results: Option<Vec<Option<T>>>,
}

impl<T> ResultsPage<T> {
    /// Flattens the page, dropping a null `results` field and null entries.
    pub fn into_records(self) -> Vec<T> {
        self.results.unwrap_or_default().into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEngagement {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub target_start: Option<String>,
    pub target_end: Option<String>,
    pub lead: Option<i64>,
    pub product: Option<i64>,
    /// Overloaded upstream field: holds a mentor-status string, not a build id.
    pub build_id: Option<String>,
    /// Overloaded upstream field: holds a lead-status string, not a hash.
    pub commit_hash: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTest {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub created: Option<String>,
    pub tags: Option<Vec<Option<String>>>,
    /// Overloaded upstream field: holds a jira-status string.
    pub branch_tag: Option<String>,
    /// Overloaded upstream field: holds a jira-type string.
    pub commit_hash: Option<String>,
    /// Overloaded upstream field: holds an analysis-status string.
    pub build_id: Option<String>,
    pub lead: Option<i64>,
    pub environment: Option<i64>,
    pub engagement: Option<i64>,
    pub target_start: Option<String>,
    pub target_end: Option<String>,
    pub test_type: Option<i64>,
    pub test_type_name: Option<String>,
}

impl RawTest {
    /// Iterates the non-null tags of this test.
    pub fn tag_iter(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .flatten()
            .flatten()
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUser {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Products, environments, and the engagement side of lookup maps only need
/// an id and a display name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawNamed {
    pub id: Option<i64>,
    pub name: Option<String>,
}
