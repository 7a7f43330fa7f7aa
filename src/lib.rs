// ABOUTME: Analytics engine turning a personal workout log into computed views
// ABOUTME: Pure recomputation pass: sessions, movement stats, trends, PRs, and goal tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! # Liftlog Engine
//!
//! Converts a snapshot of raw workout-log rows (date, workout type, movement,
//! set, weight, reps) into analytical views: per-workout-type summaries,
//! progress trend series, movement-level statistics with personal-record
//! detection, and goal tracking.
//!
//! The engine is a pure, synchronous transformation. It holds no state
//! between passes, never reads the clock, and recomputes everything from
//! scratch on each refresh; the previous report is simply replaced. The data
//! source connector, rendering layer, and access control are external
//! collaborators.
//!
//! ```
//! use chrono::NaiveDate;
//! use liftlog_engine::{AnalyticsEngine, RawRow};
//!
//! let rows = vec![RawRow {
//!     date: "2024-01-08".into(),
//!     workout_type: "lg".into(),
//!     movement: "Squat".into(),
//!     set_index: 1,
//!     weight: Some(110.0),
//!     reps: Some(5),
//!     notes: None,
//! }];
//! let engine = AnalyticsEngine::default();
//! let as_of = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let report = engine.run(&rows, &[], as_of);
//! assert_eq!(report.summary.total_sessions, 1);
//! ```

/// Engine configuration with hard validation
pub mod config;
/// The recomputation pass orchestrator
pub mod engine;
/// Engine error taxonomy
pub mod errors;
/// Goal evaluation against computed metrics
pub mod goals;
/// Session and workout-type cohort construction
pub mod grouper;
/// Data model value objects
pub mod models;
/// Per-movement statistics and personal-record detection
pub mod movement;
/// Raw row validation and coercion
pub mod normalizer;
/// Progress trend series construction
pub mod progress;
/// Snapshot and global summary assembly
pub mod snapshot;
/// Linear regression and trend classification
pub mod statistics;

pub use config::EngineConfig;
pub use engine::AnalyticsEngine;
pub use errors::{EngineError, EngineResult};
pub use models::{
    AnalyticsReport, CohortFailure, GlobalSummary, Goal, GoalMetric, GoalState, GoalStatus,
    MovementStat,
    OverviewMetrics, PrAxis, PrEvent, ProgressMetric, ProgressPoint, ProgressSeries,
    QuarantineReason, QuarantinedRow, RawRow, RowWarning, Session, SetEntry, TrendDirection,
    WorkoutSnapshot,
};
