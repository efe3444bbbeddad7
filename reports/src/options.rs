//! Filter-option collection.
//!
//! Scans the filter-eligible record set (hard inclusion predicates only, no
//! optional filters) and produces the distinct values used to populate the
//! UI's filter controls. Options must reflect everything selectable, not the
//! currently narrowed listing. Distinct strings come back sorted; id/name
//! pairs are sorted by name. Ids that do not resolve through the relevant
//! lookup map are dropped from the options, even though the records
//! themselves still show up in listings with the sentinel.

use crate::normalize::{NA, engagement_status_tracked, open_analysis_status, test_is_eligible};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracker::entities::{RawEngagement, RawTest};
use tracker::{LookupMap, Lookups};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IdName {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct EngagementFilterOptions {
    pub assigned_to: Vec<IdName>,
    pub mentor_status: Vec<String>,
    pub lead_status: Vec<String>,
    pub products: Vec<IdName>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct TestFilterOptions {
    pub jira_status: Vec<String>,
    pub jira_type: Vec<String>,
    pub analysis_status: Vec<String>,
    pub assigned_to: Vec<IdName>,
    pub build_type: Vec<IdName>,
    pub task: Vec<IdName>,
}

/// Resolve an id through a map, keeping only resolvable entries.
fn resolved_pair(map: &LookupMap, id: Option<i64>) -> Option<(i64, String)> {
    let id = id?;
    map.get(&id).map(|name| (id, name.clone()))
}

fn sorted_by_name(pairs: BTreeMap<i64, String>) -> Vec<IdName> {
    let mut options: Vec<IdName> = pairs
        .into_iter()
        .map(|(id, name)| IdName { id, name })
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    options
}

fn non_sentinel(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != NA)
}

pub fn engagement_filter_options(
    raws: &[RawEngagement],
    lookups: &Lookups,
) -> EngagementFilterOptions {
    let mut assigned_to = BTreeMap::new();
    let mut mentor_status = BTreeSet::new();
    let mut lead_status = BTreeSet::new();
    let mut products = BTreeMap::new();

    for raw in raws.iter().filter(|raw| engagement_status_tracked(raw)) {
        if let Some((id, name)) = resolved_pair(&lookups.users, raw.lead) {
            if non_sentinel(Some(&name)).is_some() {
                assigned_to.insert(id, name);
            }
        }
        if let Some(status) = non_sentinel(raw.build_id.as_deref()) {
            mentor_status.insert(status.to_string());
        }
        if let Some(status) = non_sentinel(raw.commit_hash.as_deref()) {
            lead_status.insert(status.to_string());
        }
        if let Some((id, name)) = resolved_pair(&lookups.products, raw.product) {
            if non_sentinel(Some(&name)).is_some() {
                products.insert(id, name);
            }
        }
    }

    EngagementFilterOptions {
        assigned_to: sorted_by_name(assigned_to),
        mentor_status: mentor_status.into_iter().collect(),
        lead_status: lead_status.into_iter().collect(),
        products: sorted_by_name(products),
    }
}

pub fn test_filter_options(raws: &[RawTest], lookups: &Lookups) -> TestFilterOptions {
    let mut jira_status = BTreeSet::new();
    let mut jira_type = BTreeSet::new();
    let mut analysis_status = BTreeSet::new();
    let mut assigned_to = BTreeMap::new();
    let mut build_type = BTreeMap::new();
    let mut task = BTreeMap::new();

    for raw in raws.iter().filter(|raw| test_is_eligible(raw)) {
        if let Some(status) = raw.branch_tag.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            jira_status.insert(status.to_string());
        }
        if let Some(kind) = raw.commit_hash.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            jira_type.insert(kind.to_string());
        }
        if let Some(status) = open_analysis_status(raw) {
            analysis_status.insert(status.to_string());
        }
        if let Some((id, name)) = resolved_pair(&lookups.users, raw.lead) {
            assigned_to.insert(id, name);
        }
        if let Some((id, name)) = resolved_pair(&lookups.environments, raw.environment) {
            build_type.insert(id, name);
        }
        if let Some((id, name)) = resolved_pair(&lookups.engagements, raw.engagement) {
            task.insert(id, name);
        }
    }

    TestFilterOptions {
        jira_status: jira_status.into_iter().collect(),
        jira_type: jira_type.into_iter().collect(),
        analysis_status: analysis_status.into_iter().collect(),
        assigned_to: sorted_by_name(assigned_to),
        build_type: sorted_by_name(build_type),
        task: sorted_by_name(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker::LookupMap;

    fn lookups() -> Lookups {
        Lookups {
            users: LookupMap::from([(1, "Alice".to_string()), (2, "Bob".to_string())]),
            products: LookupMap::from([(5, "Widget".to_string())]),
            engagements: LookupMap::from([(42, "Q1 review".to_string())]),
            environments: LookupMap::from([(10, "Production".to_string())]),
        }
    }

    #[test]
    fn engagement_options_skip_untracked_statuses_and_unresolved_ids() {
        let raws = vec![
            RawEngagement {
                status: Some("In Progress".into()),
                lead: Some(2),
                product: Some(5),
                build_id: Some("Assigned".into()),
                ..Default::default()
            },
            RawEngagement {
                status: Some("Not Started".into()),
                lead: Some(1),
                commit_hash: Some("Active".into()),
                ..Default::default()
            },
            // Unresolvable ids are dropped from options.
            RawEngagement {
                status: Some("On Hold".into()),
                lead: Some(99),
                product: Some(98),
                ..Default::default()
            },
            // Untracked status contributes nothing.
            RawEngagement {
                status: Some("Closed".into()),
                lead: Some(1),
                build_id: Some("Never shown".into()),
                ..Default::default()
            },
        ];

        let options = engagement_filter_options(&raws, &lookups());

        assert_eq!(
            options.assigned_to,
            vec![
                IdName { id: 1, name: "Alice".into() },
                IdName { id: 2, name: "Bob".into() },
            ]
        );
        assert_eq!(options.mentor_status, vec!["Assigned"]);
        assert_eq!(options.lead_status, vec!["Active"]);
        assert_eq!(options.products, vec![IdName { id: 5, name: "Widget".into() }]);
    }

    #[test]
    fn engagement_options_ignore_sentinel_values() {
        let raws = vec![RawEngagement {
            status: Some("In Progress".into()),
            build_id: Some("N/A".into()),
            commit_hash: Some(String::new()),
            ..Default::default()
        }];
        let options = engagement_filter_options(&raws, &lookups());
        assert!(options.mentor_status.is_empty());
        assert!(options.lead_status.is_empty());
    }

    fn eligible_test() -> RawTest {
        RawTest {
            tags: Some(vec![Some("mcr_jira-77".into())]),
            build_id: Some("Pending".into()),
            branch_tag: Some("In Review".into()),
            commit_hash: Some("security".into()),
            lead: Some(1),
            environment: Some(10),
            engagement: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_options_apply_hard_predicates_but_no_optional_filters() {
        let raws = vec![
            eligible_test(),
            RawTest {
                build_id: Some("On Hold".into()),
                branch_tag: Some("Blocked".into()),
                ..eligible_test()
            },
            // Ineligible: no jira marker.
            RawTest {
                tags: Some(vec![Some("manual".into())]),
                branch_tag: Some("Never shown".into()),
                ..eligible_test()
            },
            // Ineligible: closed analysis status.
            RawTest {
                build_id: Some("Approved".into()),
                branch_tag: Some("Never shown".into()),
                ..eligible_test()
            },
        ];

        let options = test_filter_options(&raws, &lookups());

        assert_eq!(options.jira_status, vec!["Blocked", "In Review"]);
        assert_eq!(options.jira_type, vec!["security"]);
        assert_eq!(options.analysis_status, vec!["On Hold", "Pending"]);
        assert_eq!(options.assigned_to, vec![IdName { id: 1, name: "Alice".into() }]);
        assert_eq!(options.build_type, vec![IdName { id: 10, name: "Production".into() }]);
        assert_eq!(options.task, vec![IdName { id: 42, name: "Q1 review".into() }]);
    }

    #[test]
    fn test_options_drop_unresolvable_ids() {
        let raws = vec![RawTest {
            lead: Some(999),
            environment: None,
            ..eligible_test()
        }];
        let options = test_filter_options(&raws, &lookups());
        assert!(options.assigned_to.is_empty());
        assert!(options.build_type.is_empty());
        assert_eq!(options.task.len(), 1);
    }
}
