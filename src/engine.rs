// ABOUTME: Orchestration of one full recomputation pass over a raw-row snapshot
// ABOUTME: Normalize, group, analyze cohorts in parallel, evaluate goals, assemble views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! The analytics engine.
//!
//! One pass is a pure function of (raw rows, goals, evaluation date): no
//! module-level state, no clock reads, no side effects beyond tracing. The
//! engine is safe to invoke repeatedly and concurrently with independent
//! snapshots; an abandoned in-flight pass needs no rollback.

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::goals::{evaluate_goals, goal_matches_cohort, undetermined_status, GoalContext};
use crate::grouper::{group_sessions, TypeCohort};
use crate::models::{
    AnalyticsReport, CohortFailure, Goal, GoalStatus, RawRow, WorkoutSnapshot,
};
use crate::movement::analyze_movements;
use crate::normalizer::normalize;
use crate::progress::build_series;
use crate::snapshot::{assemble_snapshot, assemble_summary, empty_summary};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// The analytics engine: configuration plus a pure `run` pass.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    /// Create an engine after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationOutOfRange`] for invalid
    /// configuration; values are refused, not clamped.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration this engine runs with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one recomputation pass over a snapshot of raw rows.
    ///
    /// `as_of` is the evaluation date for deadlines, recency metrics, and
    /// trend extrapolation; identical inputs always produce an identical
    /// report.
    #[must_use]
    pub fn run(&self, rows: &[RawRow], goals: &[Goal], as_of: NaiveDate) -> AnalyticsReport {
        let batch = normalize(rows, &self.config);
        let total_records = batch.entries.len();

        if batch.entries.is_empty() {
            debug!("no valid entries after normalization; returning empty state");
            return AnalyticsReport {
                as_of,
                snapshots: BTreeMap::new(),
                summary: empty_summary(),
                quarantined: batch.quarantined,
                warnings: batch.warnings,
                unmatched_goals: goals
                    .iter()
                    .map(|g| undetermined_status(g, as_of))
                    .collect(),
                cohort_failures: Vec::new(),
            };
        }

        let cohorts = group_sessions(&batch.entries);

        // Cohorts are independent; analyze them in parallel. A failure in one
        // cohort is recorded and never aborts the others.
        let outcomes: Vec<(String, String, EngineResult<CohortOutcome>)> = cohorts
            .par_iter()
            .map(|(key, cohort)| {
                (
                    key.clone(),
                    cohort.workout_type.clone(),
                    self.analyze_cohort(cohort, goals, as_of),
                )
            })
            .collect();

        let mut snapshots = BTreeMap::new();
        let mut cohort_failures = Vec::new();
        let mut matched_goals: BTreeSet<usize> = BTreeSet::new();
        for (key, workout_type, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    matched_goals.extend(outcome.matched_goals);
                    snapshots.insert(key, outcome.snapshot);
                }
                Err(err) => {
                    warn!(workout_type = %workout_type, error = %err, "cohort analysis failed");
                    cohort_failures.push(CohortFailure {
                        workout_type,
                        message: err.to_string(),
                    });
                }
            }
        }

        let unmatched_goals: Vec<GoalStatus> = goals
            .iter()
            .enumerate()
            .filter(|(index, _)| !matched_goals.contains(index))
            .map(|(_, goal)| undetermined_status(goal, as_of))
            .collect();

        let summary = assemble_summary(&snapshots, total_records);
        debug!(
            snapshots = snapshots.len(),
            sessions = summary.total_sessions,
            "recomputation pass complete"
        );

        AnalyticsReport {
            as_of,
            snapshots,
            summary,
            quarantined: batch.quarantined,
            warnings: batch.warnings,
            unmatched_goals,
            cohort_failures,
        }
    }

    /// Analyze one cohort end to end.
    fn analyze_cohort(
        &self,
        cohort: &TypeCohort,
        goals: &[Goal],
        as_of: NaiveDate,
    ) -> EngineResult<CohortOutcome> {
        let analysis = analyze_movements(&cohort.sessions, &self.config);
        let progress = build_series(&cohort.sessions, &self.config);

        let ctx = GoalContext {
            workout_type_key: &cohort.workout_type_key,
            movement_series: &analysis.series,
            progress: &progress,
        };
        let matched_goals: Vec<usize> = goals
            .iter()
            .enumerate()
            .filter(|(_, goal)| goal_matches_cohort(goal, &ctx))
            .map(|(index, _)| index)
            .collect();
        let goal_statuses = evaluate_goals(goals, &ctx, &self.config, as_of);

        let snapshot = assemble_snapshot(cohort, analysis.stats, progress, goal_statuses, as_of)
            .ok_or_else(|| {
                EngineError::Statistics(format!(
                    "cohort '{}' has no sessions",
                    cohort.workout_type
                ))
            })?;

        Ok(CohortOutcome {
            snapshot,
            matched_goals,
        })
    }
}

/// Result of analyzing one cohort.
struct CohortOutcome {
    snapshot: WorkoutSnapshot,
    /// Indices into the goal slice that this cohort's data covered
    matched_goals: Vec<usize>,
}
