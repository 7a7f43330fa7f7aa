// ABOUTME: Goal tracker evaluating user-declared targets against computed metrics
// ABOUTME: Direction-parameterized states: expired, achieved, on-track, behind, undetermined
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Goal evaluation.
//!
//! Goals arrive as-is from the external goal store. Each is compared to the
//! latest relevant metric value, with state rules applied in priority order:
//! expired, achieved, on-track (by linear extrapolation of the recent
//! series), behind. A goal referencing data the log does not contain is
//! reported as undetermined, never an error.

use crate::config::EngineConfig;
use crate::models::{
    canonical_key, Goal, GoalMetric, GoalState, GoalStatus, ProgressMetric, ProgressPoint,
    ProgressSeries,
};
use crate::movement::MovementSeries;
use crate::statistics::fit_by_days;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Computed metrics of one cohort, as seen by the goal tracker.
#[derive(Debug, Clone, Copy)]
pub struct GoalContext<'a> {
    /// Canonical workout-type identity of the cohort
    pub workout_type_key: &'a str,
    /// Best-set series per movement, keyed by canonical identity
    pub movement_series: &'a BTreeMap<String, MovementSeries>,
    /// Cohort progress series
    pub progress: &'a [ProgressSeries],
}

/// Whether a goal is scoped to this cohort.
///
/// A goal names a workout type, a movement, or both. Movement-only goals
/// attach to every cohort where the movement appears and are evaluated
/// against that cohort's data alone.
#[must_use]
pub fn goal_matches_cohort(goal: &Goal, ctx: &GoalContext<'_>) -> bool {
    match (&goal.workout_type, &goal.movement) {
        (Some(workout_type), _) => canonical_key(workout_type) == ctx.workout_type_key,
        (None, Some(movement)) => ctx.movement_series.contains_key(&canonical_key(movement)),
        (None, None) => false,
    }
}

/// Evaluate all goals scoped to one cohort.
#[must_use]
pub fn evaluate_goals(
    goals: &[Goal],
    ctx: &GoalContext<'_>,
    config: &EngineConfig,
    as_of: NaiveDate,
) -> Vec<GoalStatus> {
    goals
        .iter()
        .filter(|goal| goal_matches_cohort(goal, ctx))
        .map(|goal| evaluate_goal(goal, ctx, config, as_of))
        .collect()
}

/// Status for a goal that matched no cohort at all.
#[must_use]
pub fn undetermined_status(goal: &Goal, as_of: NaiveDate) -> GoalStatus {
    GoalStatus {
        goal_id: goal.id.clone(),
        state: GoalState::Undetermined,
        current_value: None,
        percent_to_target: None,
        days_remaining: goal.deadline.map(|d| (d - as_of).num_days()),
    }
}

/// Evaluate one goal against one cohort's metrics.
#[must_use]
pub fn evaluate_goal(
    goal: &Goal,
    ctx: &GoalContext<'_>,
    config: &EngineConfig,
    as_of: NaiveDate,
) -> GoalStatus {
    let Some(points) = resolve_series(goal, ctx) else {
        return undetermined_status(goal, as_of);
    };
    let Some(latest) = points.last() else {
        return undetermined_status(goal, as_of);
    };

    let current = latest.value;
    let met = goal.metric.meets(current, goal.target_value);
    let days_remaining = goal.deadline.map(|d| (d - as_of).num_days());
    let percent_to_target = if goal.target_value > 0.0 {
        Some((current / goal.target_value * 100.0).min(100.0))
    } else {
        None
    };

    let state = classify(goal, points, met, config, as_of);
    debug!(goal_id = %goal.id, ?state, current, "goal evaluated");

    GoalStatus {
        goal_id: goal.id.clone(),
        state,
        current_value: Some(current),
        percent_to_target,
        days_remaining,
    }
}

/// State rules in priority order.
fn classify(
    goal: &Goal,
    points: &[ProgressPoint],
    met: bool,
    config: &EngineConfig,
    as_of: NaiveDate,
) -> GoalState {
    if let Some(deadline) = goal.deadline {
        if deadline < as_of && !met {
            return GoalState::Expired;
        }
    }
    if met {
        return GoalState::Achieved;
    }

    let start = points.len().saturating_sub(config.trend_window_size);
    let recent = &points[start..];

    match goal.deadline {
        Some(deadline) => {
            // On-track when the extrapolated recent trend reaches the target
            // on or before the deadline
            let Ok(fit) = fit_by_days(recent) else {
                return GoalState::Behind;
            };
            let Some(first) = recent.first() else {
                return GoalState::Behind;
            };
            let projected = fit.project((deadline - first.date).num_days() as f64);
            if goal.metric.meets(projected, goal.target_value) {
                GoalState::OnTrack
            } else {
                GoalState::Behind
            }
        }
        None => {
            // No deadline: on-track when the recent trend moves toward the
            // target beyond the configured tolerance
            let Ok(fit) = fit_by_days(recent) else {
                return GoalState::Behind;
            };
            let trending = if goal.metric.higher_is_better() {
                fit.slope > config.trend_slope_tolerance
            } else {
                fit.slope < -config.trend_slope_tolerance
            };
            if trending {
                GoalState::OnTrack
            } else {
                GoalState::Behind
            }
        }
    }
}

/// Pick the metric series a goal is measured against.
///
/// Returns `None` when the goal references a movement the cohort has no data
/// for, or names a metric that needs a movement scope without one.
fn resolve_series<'a>(goal: &Goal, ctx: &GoalContext<'a>) -> Option<&'a [ProgressPoint]> {
    let movement_key = goal.movement.as_deref().map(canonical_key);
    match goal.metric {
        GoalMetric::MaxWeight => {
            let key = movement_key?;
            ctx.movement_series
                .get(&key)
                .map(|s| s.weight_points.as_slice())
        }
        GoalMetric::TotalVolume => match movement_key {
            Some(key) => ctx
                .movement_series
                .get(&key)
                .map(|s| s.volume_points.as_slice()),
            None => progress_points(ctx, ProgressMetric::TotalVolumePerSession),
        },
        GoalMetric::Frequency => progress_points(ctx, ProgressMetric::SessionFrequencyPerWeek),
    }
}

fn progress_points<'a>(
    ctx: &GoalContext<'a>,
    metric: ProgressMetric,
) -> Option<&'a [ProgressPoint]> {
    ctx.progress
        .iter()
        .find(|s| s.metric == metric)
        .map(|s| s.points.as_slice())
}
