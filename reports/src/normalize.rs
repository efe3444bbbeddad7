//! Record normalization.
//!
//! Maps one loosely-typed raw record into a display-ready row, or excludes it
//! with an explicit reason. The hard inclusion predicates live here rather
//! than in the filter engine because they depend on fields (tags, analysis
//! status) that must first be safely extracted from the untrusted input.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracker::entities::{RawEngagement, RawTest};
use tracker::{LookupMap, Lookups};

/// Sentinel for missing or unresolvable values.
pub const NA: &str = "N/A";

/// Engagement lifecycle statuses this system tracks. Records with any other
/// status are excluded upstream and never represented.
pub const ALLOWED_STATUSES: [&str; 3] = ["Not Started", "In Progress", "On Hold"];

/// Analysis statuses (carried in the upstream `build_id` field) that keep a
/// test visible in listings, options, and the jira summary.
pub const OPEN_ANALYSIS_STATUSES: [&str; 2] = ["Pending", "On Hold"];

/// Marker substring identifying jira-linked tests. Matched case-insensitively
/// against every tag; tests without it are invisible to this system.
pub const JIRA_TAG_MARKER: &str = "mcr_jira";

/// Result of normalizing one raw record.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Kept(T),
    Excluded(ExcludeReason),
}

impl<T> Outcome<T> {
    pub fn kept(self) -> Option<T> {
        match self {
            Outcome::Kept(row) => Some(row),
            Outcome::Excluded(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeReason {
    /// Engagement status outside the allowed lifecycle set.
    StatusNotTracked,
    /// Test has no tag containing the jira marker.
    MissingJiraTag,
    /// Test analysis status is neither "Pending" nor "On Hold".
    AnalysisNotOpen,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EngagementRow {
    pub id: Option<i64>,
    pub created: String,
    pub aging: i64,
    pub name: String,
    pub lead: String,
    pub lead_id: Option<i64>,
    pub target_start: String,
    pub target_end: String,
    pub status: String,
    pub build_id: String,
    pub commit_hash: String,
    pub product: String,
    pub product_id: Option<i64>,
    pub version: String,
    pub updated: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TestRow {
    pub id: Option<i64>,
    pub created: String,
    pub title: String,
    pub branch_tag: String,
    pub commit_hash: String,
    pub build_id: String,
    pub lead: String,
    pub lead_id: Option<i64>,
    pub environment: String,
    pub environment_id: Option<i64>,
    pub engagement: String,
    pub engagement_id: Option<i64>,
    pub target_start: String,
    pub target_end: String,
    pub test_type: Option<i64>,
    pub test_type_name: String,
}

/// True if any tag contains the jira marker, case-insensitively.
pub fn has_jira_tag(raw: &RawTest) -> bool {
    raw.tag_iter()
        .any(|tag| tag.to_lowercase().contains(JIRA_TAG_MARKER))
}

/// True if the engagement carries one of the tracked lifecycle statuses.
pub fn engagement_status_tracked(raw: &RawEngagement) -> bool {
    raw.status
        .as_deref()
        .is_some_and(|status| ALLOWED_STATUSES.contains(&status))
}

/// The trimmed analysis status of a test, if it is one of the open ones.
pub fn open_analysis_status(raw: &RawTest) -> Option<&str> {
    let status = raw.build_id.as_deref().unwrap_or("").trim();
    OPEN_ANALYSIS_STATUSES.contains(&status).then_some(status)
}

/// Both hard inclusion predicates for tests: jira marker plus open analysis
/// status. Used by listings, filter options, and the jira summary alike.
pub fn test_is_eligible(raw: &RawTest) -> bool {
    has_jira_tag(raw) && open_analysis_status(raw).is_some()
}

/// Resolve a foreign key through a lookup map, defaulting to the sentinel.
pub fn resolve_name(map: &LookupMap, id: Option<i64>) -> String {
    id.and_then(|id| map.get(&id).cloned())
        .unwrap_or_else(|| NA.to_string())
}

/// First ten characters of a date-ish string, or the whole string if shorter
/// (or if byte 10 is not a character boundary).
fn date_prefix(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_prefix(value), "%Y-%m-%d").ok()
}

/// Reformat an ISO-like `YYYY-MM-DDTHH:MM:SS` prefix into
/// `YYYY-MM-DD HH:MM:SS`, falling back to the date prefix of the raw value.
fn reformat_timestamp(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let prefix = value.get(..19).unwrap_or(value);
    match NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => date_prefix(value).to_string(),
    }
}

fn or_sentinel(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NA.to_string(),
    }
}

/// Normalize one raw engagement, excluding untracked statuses.
///
/// `today` is injected so age computation is deterministic under test.
pub fn normalize_engagement(
    raw: &RawEngagement,
    lookups: &Lookups,
    today: NaiveDate,
) -> Outcome<EngagementRow> {
    if !engagement_status_tracked(raw) {
        return Outcome::Excluded(ExcludeReason::StatusNotTracked);
    }

    let created_raw = raw.created.as_deref().unwrap_or("");
    let (created, aging) = if created_raw.is_empty() {
        (NA.to_string(), 0)
    } else {
        let aging = parse_date(created_raw)
            .map(|date| (today - date).num_days().max(0))
            .unwrap_or(0);
        (date_prefix(created_raw).to_string(), aging)
    };

    Outcome::Kept(EngagementRow {
        id: raw.id,
        created,
        aging,
        name: or_sentinel(&raw.name),
        lead: resolve_name(&lookups.users, raw.lead),
        lead_id: raw.lead,
        target_start: or_sentinel(&raw.target_start),
        target_end: or_sentinel(&raw.target_end),
        status: raw.status.clone().unwrap_or_else(|| NA.to_string()),
        build_id: or_sentinel(&raw.build_id),
        commit_hash: or_sentinel(&raw.commit_hash),
        product: resolve_name(&lookups.products, raw.product),
        product_id: raw.product,
        version: or_sentinel(&raw.version),
        updated: reformat_timestamp(raw.updated.as_deref().unwrap_or("")),
        description: raw.description.clone().unwrap_or_default(),
    })
}

/// Normalize one raw test, enforcing the jira-marker and open-analysis
/// inclusion predicates.
pub fn normalize_test(raw: &RawTest, lookups: &Lookups) -> Outcome<TestRow> {
    if !has_jira_tag(raw) {
        return Outcome::Excluded(ExcludeReason::MissingJiraTag);
    }
    let Some(analysis_status) = open_analysis_status(raw) else {
        return Outcome::Excluded(ExcludeReason::AnalysisNotOpen);
    };

    let created_raw = raw.created.as_deref().unwrap_or("");
    let created = if created_raw.is_empty() {
        String::new()
    } else {
        // Parsing and reformatting with the same pattern amounts to keeping
        // the validated prefix.
        date_prefix(created_raw).to_string()
    };

    Outcome::Kept(TestRow {
        id: raw.id,
        created,
        title: raw.title.clone().unwrap_or_default(),
        branch_tag: raw.branch_tag.clone().unwrap_or_default(),
        commit_hash: raw.commit_hash.clone().unwrap_or_default(),
        build_id: analysis_status.to_string(),
        lead: resolve_name(&lookups.users, raw.lead),
        lead_id: raw.lead,
        environment: resolve_name(&lookups.environments, raw.environment),
        environment_id: raw.environment,
        engagement: resolve_name(&lookups.engagements, raw.engagement),
        engagement_id: raw.engagement,
        target_start: raw.target_start.clone().unwrap_or_default(),
        target_end: raw.target_end.clone().unwrap_or_default(),
        test_type: raw.test_type,
        test_type_name: raw.test_type_name.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookups() -> Lookups {
        Lookups {
            users: LookupMap::from([(1, "Alice".to_string())]),
            products: LookupMap::from([(5, "Widget".to_string())]),
            engagements: LookupMap::from([(42, "Q1 review".to_string())]),
            environments: LookupMap::from([(10, "Production".to_string())]),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn tracked_engagement() -> RawEngagement {
        RawEngagement {
            id: Some(100),
            name: Some("Q1 review".into()),
            status: Some("In Progress".into()),
            created: Some("2024-01-01T08:30:00.123Z".into()),
            updated: Some("2024-01-15T10:20:30.456Z".into()),
            lead: Some(1),
            product: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn untracked_status_is_excluded() {
        for status in ["Closed", "Completed", ""] {
            let raw = RawEngagement {
                status: Some(status.into()),
                ..tracked_engagement()
            };
            assert_eq!(
                normalize_engagement(&raw, &lookups(), today()),
                Outcome::Excluded(ExcludeReason::StatusNotTracked)
            );
        }

        let no_status = RawEngagement {
            status: None,
            ..tracked_engagement()
        };
        assert!(normalize_engagement(&no_status, &lookups(), today())
            .kept()
            .is_none());
    }

    #[test]
    fn engagement_joins_and_derives_fields() {
        let row = normalize_engagement(&tracked_engagement(), &lookups(), today())
            .kept()
            .unwrap();

        assert_eq!(row.created, "2024-01-01");
        assert_eq!(row.aging, 30);
        assert_eq!(row.lead, "Alice");
        assert_eq!(row.lead_id, Some(1));
        assert_eq!(row.product, "Widget");
        assert_eq!(row.updated, "2024-01-15 10:20:30");
    }

    #[test]
    fn aging_is_zero_on_unparseable_created_and_never_negative() {
        let garbage = RawEngagement {
            created: Some("not-a-date-at-all".into()),
            ..tracked_engagement()
        };
        let row = normalize_engagement(&garbage, &lookups(), today())
            .kept()
            .unwrap();
        assert_eq!(row.aging, 0);
        // Prefix is preserved, not defaulted to the sentinel.
        assert_eq!(row.created, "not-a-date");

        let future = RawEngagement {
            created: Some("2024-06-01T00:00:00Z".into()),
            ..tracked_engagement()
        };
        let row = normalize_engagement(&future, &lookups(), today())
            .kept()
            .unwrap();
        assert_eq!(row.aging, 0);
    }

    #[test]
    fn missing_fields_default_to_sentinels() {
        let raw = RawEngagement {
            id: Some(1),
            status: Some("On Hold".into()),
            ..Default::default()
        };
        let row = normalize_engagement(&raw, &lookups(), today())
            .kept()
            .unwrap();

        assert_eq!(row.created, NA);
        assert_eq!(row.name, NA);
        assert_eq!(row.lead, NA);
        assert_eq!(row.target_start, NA);
        assert_eq!(row.build_id, NA);
        assert_eq!(row.version, NA);
        assert_eq!(row.updated, "");
        assert_eq!(row.description, "");
    }

    #[test]
    fn malformed_updated_falls_back_to_date_prefix() {
        let raw = RawEngagement {
            updated: Some("2024-01-15 already spaced".into()),
            ..tracked_engagement()
        };
        let row = normalize_engagement(&raw, &lookups(), today())
            .kept()
            .unwrap();
        assert_eq!(row.updated, "2024-01-15");

        let short = RawEngagement {
            updated: Some("soon".into()),
            ..tracked_engagement()
        };
        let row = normalize_engagement(&short, &lookups(), today())
            .kept()
            .unwrap();
        assert_eq!(row.updated, "soon");
    }

    fn eligible_test() -> RawTest {
        RawTest {
            id: Some(7),
            title: Some("JIRA-123 regression".into()),
            created: Some("2024-01-10T09:00:00Z".into()),
            tags: Some(vec![Some("MCR_JIRA-123".into())]),
            build_id: Some("  Pending ".into()),
            lead: Some(1),
            environment: Some(10),
            engagement: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_without_jira_tag_is_excluded() {
        let raw = RawTest {
            tags: Some(vec![Some("regression".into()), None]),
            ..eligible_test()
        };
        assert_eq!(
            normalize_test(&raw, &lookups()),
            Outcome::Excluded(ExcludeReason::MissingJiraTag)
        );

        let untagged = RawTest {
            tags: None,
            ..eligible_test()
        };
        assert!(normalize_test(&untagged, &lookups()).kept().is_none());
    }

    #[test]
    fn test_with_closed_analysis_status_is_excluded() {
        for status in ["Approved", "Rejected", "", "pending"] {
            let raw = RawTest {
                build_id: Some(status.into()),
                ..eligible_test()
            };
            assert_eq!(
                normalize_test(&raw, &lookups()),
                Outcome::Excluded(ExcludeReason::AnalysisNotOpen),
                "status {status:?} should be excluded"
            );
        }
    }

    #[test]
    fn jira_tag_marker_is_case_insensitive_and_analysis_status_is_trimmed() {
        let row = normalize_test(&eligible_test(), &lookups()).kept().unwrap();
        assert_eq!(row.build_id, "Pending");
        assert_eq!(row.created, "2024-01-10");
        assert_eq!(row.lead, "Alice");
        assert_eq!(row.environment, "Production");
        assert_eq!(row.engagement, "Q1 review");
    }

    #[test]
    fn unresolved_foreign_keys_become_sentinels() {
        let raw = RawTest {
            lead: Some(999),
            environment: None,
            engagement: Some(42),
            ..eligible_test()
        };
        let row = normalize_test(&raw, &lookups()).kept().unwrap();
        assert_eq!(row.lead, NA);
        assert_eq!(row.lead_id, Some(999));
        assert_eq!(row.environment, NA);
        assert_eq!(row.environment_id, None);
    }
}
