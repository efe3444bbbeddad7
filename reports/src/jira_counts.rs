//! Per-engagement jira tally counters.
//!
//! Operates on the raw tests of a single engagement. Only the jira marker
//! gates inclusion here; unlike listings, closed analysis statuses still
//! count. The counters are independent: one test can contribute to several.

use crate::normalize::has_jira_tag;
use serde::Serialize;
use tracker::entities::RawTest;

/// Branch states (carried in the upstream `branch_tag` field) considered
/// done-like.
pub const DONE_BRANCH_STATES: [&str; 3] = ["ready for testing", "ready for security", "done"];

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct JiraCounts {
    /// Total jira-tagged tests.
    #[serde(rename = "T")]
    pub total: u64,
    /// Decided analysis statuses (approved or rejected).
    #[serde(rename = "C")]
    pub decided: u64,
    /// Open analysis statuses (pending or on hold).
    #[serde(rename = "P")]
    pub pending: u64,
    /// Security-typed tests.
    #[serde(rename = "S")]
    pub security: u64,
    /// Tests of any other non-empty type.
    #[serde(rename = "F")]
    pub functional: u64,
    /// Done-like branch states.
    #[serde(rename = "D")]
    pub done: u64,
    /// Any other non-empty branch state.
    #[serde(rename = "ND")]
    pub not_done: u64,
}

fn lower_trim(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_lowercase()
}

pub fn jira_counts(tests: &[RawTest]) -> JiraCounts {
    let mut counts = JiraCounts::default();

    for test in tests {
        if !has_jira_tag(test) {
            continue;
        }
        counts.total += 1;

        let analysis_status = lower_trim(test.build_id.as_deref());
        let jira_type = lower_trim(test.commit_hash.as_deref());
        let branch_state = lower_trim(test.branch_tag.as_deref());

        if matches!(analysis_status.as_str(), "approved" | "rejected") {
            counts.decided += 1;
        }
        if matches!(analysis_status.as_str(), "pending" | "on hold") {
            counts.pending += 1;
        }
        if jira_type == "security" {
            counts.security += 1;
        }
        if !jira_type.is_empty() && jira_type != "security" {
            counts.functional += 1;
        }
        if DONE_BRANCH_STATES.contains(&branch_state.as_str()) {
            counts.done += 1;
        }
        if !branch_state.is_empty() && !DONE_BRANCH_STATES.contains(&branch_state.as_str()) {
            counts.not_done += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(build_id: &str, commit_hash: &str, branch_tag: &str) -> RawTest {
        RawTest {
            tags: Some(vec![Some("mcr_jira-1".into())]),
            build_id: Some(build_id.into()),
            commit_hash: Some(commit_hash.into()),
            branch_tag: Some(branch_tag.into()),
            ..Default::default()
        }
    }

    #[test]
    fn pending_security_test_counts_in_t_p_and_s_only() {
        let counts = jira_counts(&[tagged("Pending", "security", "")]);
        assert_eq!(
            counts,
            JiraCounts {
                total: 1,
                decided: 0,
                pending: 1,
                security: 1,
                functional: 0,
                done: 0,
                not_done: 0,
            }
        );
    }

    #[test]
    fn untagged_tests_are_invisible() {
        let untagged = RawTest {
            build_id: Some("Pending".into()),
            ..Default::default()
        };
        assert_eq!(jira_counts(&[untagged]), JiraCounts::default());
    }

    #[test]
    fn comparisons_are_trimmed_and_case_insensitive() {
        let counts = jira_counts(&[tagged(" APPROVED ", "Functional", "Done")]);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.decided, 1);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.functional, 1);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.not_done, 0);
    }

    #[test]
    fn counters_are_independent() {
        let tests = vec![
            tagged("Pending", "security", "In Review"),
            tagged("On Hold", "functional", "ready for testing"),
            tagged("Rejected", "", ""),
        ];
        let counts = jira_counts(&tests);

        assert_eq!(counts.total, 3);
        assert_eq!(counts.decided, 1);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.security, 1);
        assert_eq!(counts.functional, 1);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.not_done, 1);
    }

    #[test]
    fn wire_keys_are_single_letters() {
        let json = serde_json::to_value(jira_counts(&[tagged("Pending", "security", "")])).unwrap();
        assert_eq!(json["T"], 1);
        assert_eq!(json["P"], 1);
        assert_eq!(json["S"], 1);
        assert_eq!(json["C"], 0);
        assert_eq!(json["ND"], 0);
    }
}
