// ABOUTME: Value objects for the workout analytics data model
// ABOUTME: Raw rows, normalized set entries, sessions, movement stats, progress series, goals, and snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Data model for the analytics engine.
//!
//! Everything here is a plain serde value object with no behavior beyond
//! construction helpers. Outputs are created fresh on every recomputation
//! pass and never patched in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One untyped record as delivered by the data-source connector.
///
/// The connector guarantees column presence; the engine owns all further
/// validation and never mutates the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Date cell as logged, format resolved against the configured preference list
    pub date: String,
    /// Workout type tag (e.g. "ct,tri"), free-form
    pub workout_type: String,
    /// Exercise name (e.g. "Squat"), free-form
    pub movement: String,
    /// 1-based set number within the session
    pub set_index: i64,
    /// Weight used; absent means bodyweight
    pub weight: Option<f64>,
    /// Repetitions performed
    pub reps: Option<i64>,
    /// Free-form notes, carried through untouched
    pub notes: Option<String>,
}

/// A validated, typed workout set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Calendar date of the set
    pub date: NaiveDate,
    /// Workout type, trimmed, original casing preserved for display
    pub workout_type: String,
    /// Canonical workout type identity (trimmed, lowercased)
    pub workout_type_key: String,
    /// Movement name, trimmed, original casing preserved for display
    pub movement: String,
    /// Canonical movement identity (trimmed, lowercased)
    pub movement_key: String,
    /// 1-based set number within the session
    pub set_index: u32,
    /// Weight used; `None` means bodyweight
    pub weight: Option<f64>,
    /// Repetitions performed
    pub reps: u32,
    /// True when the raw date parsed differently under more than one
    /// configured format; the first-preference result was kept
    pub ambiguous_date: bool,
}

impl SetEntry {
    /// Volume contribution of this set: weight x reps, zero for bodyweight sets.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight.map_or(0.0, |w| w * f64::from(self.reps))
    }
}

/// Why a raw row was quarantined instead of normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineReason {
    /// Date cell empty or unparseable under every configured format
    MissingDate,
    /// Weight, reps, or set index negative or non-finite
    InvalidNumeric,
    /// Workout type or movement empty after trimming
    EmptyTypeOrMovement,
}

/// A raw row that failed validation, kept on record rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantinedRow {
    /// Position of the row in the input snapshot
    pub row_index: usize,
    /// Which validation rule rejected it
    pub reason: QuarantineReason,
    /// The offending row, unmodified
    pub row: RawRow,
}

/// A soft warning attached to a surviving row (never a drop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowWarning {
    /// Position of the row in the input snapshot
    pub row_index: usize,
    /// Human-readable description of the ambiguity
    pub message: String,
}

/// All sets logged for one workout type on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session date
    pub date: NaiveDate,
    /// Workout type display name
    pub workout_type: String,
    /// Canonical workout type identity
    pub workout_type_key: String,
    /// Set entries in logged order
    pub entries: Vec<SetEntry>,
    /// Total volume: sum of weight x reps over weighted entries
    pub total_volume: f64,
}

/// Axis on which a personal record was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrAxis {
    /// Heavier weight at equal-or-greater reps than the prior max
    Weight,
    /// More volume at equal-or-greater weight than the prior best
    Volume,
}

/// A personal-record event for one movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrEvent {
    /// Session date the record was set
    pub date: NaiveDate,
    /// Which improvement axis fired
    pub axis: PrAxis,
    /// Weight of the record set
    pub weight: f64,
    /// Reps of the record set
    pub reps: u32,
    /// Volume of the record set
    pub volume: f64,
}

/// Direction of a movement's best-set volume trend over the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Linear trend positive beyond tolerance
    Improving,
    /// Linear trend within tolerance of flat
    Plateau,
    /// Linear trend negative beyond tolerance
    Declining,
    /// Too few data points to call a trend
    InsufficientData,
}

/// Per-movement statistics within one workout-type cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementStat {
    /// Movement display name
    pub movement: String,
    /// Heaviest weight ever recorded; `None` for bodyweight-only movements
    pub max_weight: Option<f64>,
    /// Best single-set volume ever recorded
    pub best_set_volume: f64,
    /// Sessions in which this movement appeared
    pub session_count: usize,
    /// Total reps across all sets
    pub total_reps: u64,
    /// Most recent session date featuring this movement
    pub last_performed: NaiveDate,
    /// Trend of best-set volume over the trailing window
    pub trend: TrendDirection,
    /// Personal-record events in date order
    pub pr_events: Vec<PrEvent>,
}

/// Named metric of a progress series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMetric {
    /// Session total volume, one point per session
    TotalVolumePerSession,
    /// Count of sessions in the trailing frequency window ending at each session date
    SessionFrequencyPerWeek,
    /// Mean weight over weighted entries, one point per session
    AverageWeightPerSession,
}

/// One point in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// Point date; unique per metric within one workout type
    pub date: NaiveDate,
    /// Metric value at that date
    pub value: f64,
}

/// A named, date-ordered series of progress points.
///
/// Series are per-session granular so any weekly/monthly bucketing stays a
/// pure view operation on the consumer side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSeries {
    /// Which metric this series tracks
    pub metric: ProgressMetric,
    /// Points in ascending date order
    pub points: Vec<ProgressPoint>,
}

/// Metric a goal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    /// Heaviest single set for a movement
    MaxWeight,
    /// Best-set volume for a movement, or session volume for a workout type
    TotalVolume,
    /// Sessions per trailing frequency window
    Frequency,
}

impl GoalMetric {
    /// Whether larger values mean progress for this metric.
    ///
    /// Every metric in this domain is higher-is-better today, but evaluation
    /// is parameterized on this rather than hardcoded.
    #[must_use]
    pub const fn higher_is_better(self) -> bool {
        match self {
            Self::MaxWeight | Self::TotalVolume | Self::Frequency => true,
        }
    }

    /// Direction-aware comparison of a current value against a target.
    #[must_use]
    pub fn meets(self, current: f64, target: f64) -> bool {
        if self.higher_is_better() {
            current >= target
        } else {
            current <= target
        }
    }
}

/// A user-declared target, consumed as-is from the external goal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Opaque identifier assigned by the goal store
    pub id: String,
    /// Workout type scope, if any
    pub workout_type: Option<String>,
    /// Movement scope, if any
    pub movement: Option<String>,
    /// Metric the target applies to
    pub metric: GoalMetric,
    /// Target value in the metric's native unit
    pub target_value: f64,
    /// Optional deadline; a goal without one can never expire
    pub deadline: Option<NaiveDate>,
}

/// Evaluated state of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalState {
    /// Current value meets or exceeds the target
    Achieved,
    /// Extrapolated trend reaches the target in time (or trends positive for
    /// deadline-free goals)
    OnTrack,
    /// Not achieved and the trend does not get there
    Behind,
    /// Deadline passed without the target being met
    Expired,
    /// Goal references a workout type or movement with no data
    Undetermined,
}

/// Result of evaluating one goal against the computed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalStatus {
    /// Id of the evaluated goal
    pub goal_id: String,
    /// Evaluated state
    pub state: GoalState,
    /// Latest relevant metric value, absent when undetermined
    pub current_value: Option<f64>,
    /// Current value as a percentage of the target, capped at 100
    pub percent_to_target: Option<f64>,
    /// Days from the evaluation date to the deadline; negative once past,
    /// absent for deadline-free goals
    pub days_remaining: Option<i64>,
}

/// Headline metrics for one workout type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    /// Number of sessions on record
    pub total_sessions: usize,
    /// Distinct movements performed
    pub unique_movements: usize,
    /// All-time total volume
    pub total_volume: f64,
    /// Date of the first session
    pub first_session: NaiveDate,
    /// Date of the most recent session
    pub last_session: NaiveDate,
    /// Days between first and last session
    pub days_tracked: i64,
    /// Days between the most recent session and the evaluation date
    pub days_since_last: i64,
}

/// The immutable computed view for one workout type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSnapshot {
    /// Workout type display name
    pub workout_type: String,
    /// Headline metrics
    pub overview: OverviewMetrics,
    /// Sessions in ascending date order
    pub sessions: Vec<Session>,
    /// Per-movement statistics, keyed by canonical movement identity
    pub movements: BTreeMap<String, MovementStat>,
    /// Progress series for this workout type
    pub progress: Vec<ProgressSeries>,
    /// Statuses of goals scoped to this workout type
    pub goals: Vec<GoalStatus>,
}

/// Cross-type summary of the whole log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    /// Valid set entries across all types
    pub total_records: usize,
    /// Sessions across all types
    pub total_sessions: usize,
    /// Distinct workout types discovered
    pub workout_type_count: usize,
    /// Distinct movements across all types
    pub unique_movements: usize,
    /// Display name of the most recently trained type
    pub most_recent_type: Option<String>,
    /// Earliest session date on record
    pub first_date: Option<NaiveDate>,
    /// Latest session date on record
    pub last_date: Option<NaiveDate>,
    /// Sessions per week over the whole tracked span
    pub sessions_per_week: f64,
}

/// A workout-type cohort whose analysis failed; other cohorts are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortFailure {
    /// Display name of the failed workout type
    pub workout_type: String,
    /// What went wrong
    pub message: String,
}

/// Output of one full recomputation pass.
///
/// Created fresh each pass; consumers replace their previous report wholesale
/// and never observe a partial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Evaluation date the pass was run against
    pub as_of: NaiveDate,
    /// One snapshot per discovered workout type, keyed by canonical identity
    pub snapshots: BTreeMap<String, WorkoutSnapshot>,
    /// Cross-type summary
    pub summary: GlobalSummary,
    /// Rows that failed normalization
    pub quarantined: Vec<QuarantinedRow>,
    /// Soft warnings from normalization
    pub warnings: Vec<RowWarning>,
    /// Statuses of goals that matched no cohort
    pub unmatched_goals: Vec<GoalStatus>,
    /// Cohorts whose analysis failed in isolation
    pub cohort_failures: Vec<CohortFailure>,
}

impl AnalyticsReport {
    /// True when no valid set entries survived normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Canonical identity for workout types and movements: trimmed, lowercased.
///
/// Comparison is case-insensitive; display casing is preserved separately.
#[must_use]
pub fn canonical_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn set_volume_is_weight_times_reps() {
        let entry = SetEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            workout_type: "lg".into(),
            workout_type_key: "lg".into(),
            movement: "Squat".into(),
            movement_key: "squat".into(),
            set_index: 1,
            weight: Some(100.0),
            reps: 5,
            ambiguous_date: false,
        };
        assert!((entry.volume() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bodyweight_set_contributes_zero_volume() {
        let entry = SetEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            workout_type: "core".into(),
            workout_type_key: "core".into(),
            movement: "Plank".into(),
            movement_key: "plank".into(),
            set_index: 1,
            weight: None,
            reps: 10,
            ambiguous_date: false,
        };
        assert!(entry.volume().abs() < f64::EPSILON);
    }

    #[test]
    fn canonical_key_trims_and_lowercases() {
        assert_eq!(canonical_key("  Ct,Tri "), "ct,tri");
        assert_eq!(canonical_key("SQUAT"), "squat");
    }

    #[test]
    fn goal_metric_direction_is_parameterized() {
        assert!(GoalMetric::MaxWeight.higher_is_better());
        assert!(GoalMetric::MaxWeight.meets(150.0, 150.0));
        assert!(!GoalMetric::TotalVolume.meets(140.0, 150.0));
    }
}
