// ABOUTME: View assembler composing computed outputs into immutable snapshots
// ABOUTME: Pure aggregation and selection; all numeric derivation happens upstream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Snapshot and summary assembly.
//!
//! Composition only: the assembler selects and counts what the normalizer,
//! grouper, analyzers, and goal tracker already computed. Snapshots are
//! created fresh each pass and replaced wholesale, never patched.

use crate::grouper::TypeCohort;
use crate::models::{
    GlobalSummary, GoalStatus, MovementStat, OverviewMetrics, ProgressSeries, WorkoutSnapshot,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Compose the snapshot for one workout type.
///
/// Returns `None` for a cohort with no sessions, which grouping can never
/// produce.
#[must_use]
pub fn assemble_snapshot(
    cohort: &TypeCohort,
    movements: BTreeMap<String, MovementStat>,
    progress: Vec<ProgressSeries>,
    goals: Vec<GoalStatus>,
    as_of: NaiveDate,
) -> Option<WorkoutSnapshot> {
    let first_session = cohort.sessions.first()?.date;
    let last_session = cohort.sessions.last()?.date;

    let overview = OverviewMetrics {
        total_sessions: cohort.sessions.len(),
        unique_movements: movements.len(),
        total_volume: cohort.sessions.iter().map(|s| s.total_volume).sum(),
        first_session,
        last_session,
        days_tracked: (last_session - first_session).num_days(),
        days_since_last: (as_of - last_session).num_days(),
    };

    Some(WorkoutSnapshot {
        workout_type: cohort.workout_type.clone(),
        overview,
        sessions: cohort.sessions.clone(),
        movements,
        progress,
        goals,
    })
}

/// Compose the cross-type summary from the assembled snapshots.
#[must_use]
pub fn assemble_summary(
    snapshots: &BTreeMap<String, WorkoutSnapshot>,
    total_records: usize,
) -> GlobalSummary {
    let total_sessions: usize = snapshots.values().map(|s| s.overview.total_sessions).sum();

    let unique_movements: BTreeSet<&str> = snapshots
        .values()
        .flat_map(|s| s.movements.keys().map(String::as_str))
        .collect();

    let first_date = snapshots.values().map(|s| s.overview.first_session).min();
    let last_date = snapshots.values().map(|s| s.overview.last_session).max();

    let most_recent_type = snapshots
        .values()
        .max_by_key(|s| s.overview.last_session)
        .map(|s| s.workout_type.clone());

    let sessions_per_week = match (first_date, last_date) {
        (Some(first), Some(last)) => {
            let span_days = (last - first).num_days() + 1;
            total_sessions as f64 * 7.0 / span_days as f64
        }
        _ => 0.0,
    };

    GlobalSummary {
        total_records,
        total_sessions,
        workout_type_count: snapshots.len(),
        unique_movements: unique_movements.len(),
        most_recent_type,
        first_date,
        last_date,
        sessions_per_week,
    }
}

/// The explicit empty state: zero valid entries after normalization.
#[must_use]
pub fn empty_summary() -> GlobalSummary {
    GlobalSummary {
        total_records: 0,
        total_sessions: 0,
        workout_type_count: 0,
        unique_movements: 0,
        most_recent_type: None,
        first_date: None,
        last_date: None,
        sessions_per_week: 0.0,
    }
}
