//! Cross-tabulated summary reports.
//!
//! Two independent matrices, both computed over the full filtered-and-
//! normalized set (pagination never applies first):
//!
//! - engagements: lead × lifecycle status, with row and column totals;
//! - jira tests: lead × environment × open analysis status. The column set
//!   is whatever environments are actually observed in the eligible tests,
//!   so columns vary per request.
//!
//! Totals are derived on every call, never stored. `BTreeMap` keeps row and
//! column iteration deterministic for a fixed input.

use crate::normalize::{EngagementRow, TestRow};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EngagementSummaryRow {
    pub lead: String,
    pub not_started: u64,
    pub in_progress: u64,
    pub on_hold: u64,
    pub total: u64,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct EngagementSummaryTotals {
    pub not_started: u64,
    pub in_progress: u64,
    pub on_hold: u64,
    pub total: u64,
}

/// Tally engagements per lead and lifecycle status.
///
/// A lead is required to appear: rows without a lead id are excluded from
/// this report entirely, not grouped under the sentinel. Rows come back
/// sorted by lead name.
pub fn engagement_summary(
    rows: &[EngagementRow],
) -> (Vec<EngagementSummaryRow>, EngagementSummaryTotals) {
    let mut by_lead: BTreeMap<&str, [u64; 3]> = BTreeMap::new();

    for row in rows {
        if row.lead_id.is_none() {
            continue;
        }
        let counts = by_lead.entry(&row.lead).or_default();
        match row.status.as_str() {
            "Not Started" => counts[0] += 1,
            "In Progress" => counts[1] += 1,
            "On Hold" => counts[2] += 1,
            // Untracked statuses are excluded during normalization.
            _ => {}
        }
    }

    let mut totals = EngagementSummaryTotals::default();
    let data = by_lead
        .into_iter()
        .map(|(lead, [not_started, in_progress, on_hold])| {
            let total = not_started + in_progress + on_hold;
            totals.not_started += not_started;
            totals.in_progress += in_progress;
            totals.on_hold += on_hold;
            totals.total += total;
            EngagementSummaryRow {
                lead: lead.to_string(),
                not_started,
                in_progress,
                on_hold,
                total,
            }
        })
        .collect();

    (data, totals)
}

/// One observed environment column, sorted into place by resolved name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvColumn {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JiraSummaryRow {
    pub lead: String,
    /// Dynamic per-environment sub-columns, keyed `env_<id>_pending` and
    /// `env_<id>_onhold`. Missing combinations are emitted as 0, not absent.
    #[serde(flatten)]
    pub cells: BTreeMap<String, u64>,
    pub total: u64,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct JiraSummary {
    pub data: Vec<JiraSummaryRow>,
    pub environments: Vec<EnvColumn>,
    pub col_totals: BTreeMap<String, u64>,
    pub grand_total: u64,
}

fn pending_key(env_id: i64) -> String {
    format!("env_{env_id}_pending")
}

fn on_hold_key(env_id: i64) -> String {
    format!("env_{env_id}_onhold")
}

/// Tally eligible tests per (lead, environment) pair, split by open analysis
/// status. Tests missing either the lead or the environment are excluded.
pub fn jira_summary(rows: &[TestRow]) -> JiraSummary {
    let mut env_names: BTreeMap<i64, String> = BTreeMap::new();
    // lead name -> environment id -> (pending, on hold)
    let mut counts: BTreeMap<&str, BTreeMap<i64, (u64, u64)>> = BTreeMap::new();

    for row in rows {
        if row.lead_id.is_none() {
            continue;
        }
        let Some(env_id) = row.environment_id else {
            continue;
        };

        env_names
            .entry(env_id)
            .or_insert_with(|| row.environment.clone());
        let pair = counts
            .entry(&row.lead)
            .or_default()
            .entry(env_id)
            .or_default();
        match row.build_id.as_str() {
            "Pending" => pair.0 += 1,
            "On Hold" => pair.1 += 1,
            // Other analysis statuses are excluded during normalization.
            _ => {}
        }
    }

    let mut environments: Vec<EnvColumn> = env_names
        .into_iter()
        .map(|(id, name)| EnvColumn { id, name })
        .collect();
    environments.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let mut col_totals: BTreeMap<String, u64> = BTreeMap::new();
    let mut grand_total = 0;
    let data = counts
        .into_iter()
        .map(|(lead, by_env)| {
            let mut cells = BTreeMap::new();
            let mut total = 0;
            for env in &environments {
                let (pending, on_hold) = by_env.get(&env.id).copied().unwrap_or_default();
                cells.insert(pending_key(env.id), pending);
                cells.insert(on_hold_key(env.id), on_hold);
                *col_totals.entry(pending_key(env.id)).or_default() += pending;
                *col_totals.entry(on_hold_key(env.id)).or_default() += on_hold;
                total += pending + on_hold;
            }
            grand_total += total;
            JiraSummaryRow {
                lead: lead.to_string(),
                cells,
                total,
            }
        })
        .collect();

    // Make sure every column appears in the totals even with no data rows.
    for env in &environments {
        col_totals.entry(pending_key(env.id)).or_default();
        col_totals.entry(on_hold_key(env.id)).or_default();
    }

    JiraSummary {
        data,
        environments,
        col_totals,
        grand_total,
    }
}
