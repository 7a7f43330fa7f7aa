// ABOUTME: Progress engine building time-ordered trend series for one workout type
// ABOUTME: Per-session volume, sliding-window frequency, and average weight series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Trend series construction.
//!
//! Every series is per-session granular: weekly or monthly bucketing is a
//! pure view operation left to the consumer, so no raw detail is lost to
//! pre-bucketing. Dates are unique per metric within one workout type by
//! construction (sessions are maximal per-date groups).

use crate::config::EngineConfig;
use crate::models::{ProgressMetric, ProgressPoint, ProgressSeries, Session};
use chrono::Duration;

/// Build the standard progress series for the ordered sessions of one
/// workout type.
#[must_use]
pub fn build_series(sessions: &[Session], config: &EngineConfig) -> Vec<ProgressSeries> {
    vec![
        ProgressSeries {
            metric: ProgressMetric::TotalVolumePerSession,
            points: volume_per_session(sessions),
        },
        ProgressSeries {
            metric: ProgressMetric::SessionFrequencyPerWeek,
            points: frequency_per_window(sessions, config.frequency_window_days),
        },
        ProgressSeries {
            metric: ProgressMetric::AverageWeightPerSession,
            points: average_weight_per_session(sessions),
        },
    ]
}

/// One point per session: the session's total volume.
fn volume_per_session(sessions: &[Session]) -> Vec<ProgressPoint> {
    sessions
        .iter()
        .map(|s| ProgressPoint {
            date: s.date,
            value: s.total_volume,
        })
        .collect()
}

/// Sessions inside the trailing window ending at each session date.
fn frequency_per_window(sessions: &[Session], window_days: i64) -> Vec<ProgressPoint> {
    sessions
        .iter()
        .map(|s| {
            let window_start = s.date - Duration::days(window_days - 1);
            let count = sessions
                .iter()
                .filter(|other| other.date >= window_start && other.date <= s.date)
                .count();
            ProgressPoint {
                date: s.date,
                value: count as f64,
            }
        })
        .collect()
}

/// Mean weight over weighted entries per session.
///
/// Bodyweight entries are excluded from the denominator; a session with no
/// weighted entries contributes no point at all rather than a misleading
/// zero.
fn average_weight_per_session(sessions: &[Session]) -> Vec<ProgressPoint> {
    sessions
        .iter()
        .filter_map(|s| {
            let weights: Vec<f64> = s.entries.iter().filter_map(|e| e.weight).collect();
            if weights.is_empty() {
                return None;
            }
            let mean = weights.iter().sum::<f64>() / weights.len() as f64;
            Some(ProgressPoint {
                date: s.date,
                value: mean,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::grouper::group_sessions;
    use crate::models::SetEntry;
    use chrono::NaiveDate;

    fn entry(day: u32, weight: Option<f64>, reps: u32) -> SetEntry {
        SetEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            workout_type: "lg".into(),
            workout_type_key: "lg".into(),
            movement: "Squat".into(),
            movement_key: "squat".into(),
            set_index: 1,
            weight,
            reps,
            ambiguous_date: false,
        }
    }

    fn sessions(entries: Vec<SetEntry>) -> Vec<Session> {
        group_sessions(&entries)
            .remove("lg")
            .map_or(Vec::new(), |c| c.sessions)
    }

    fn series_for(all: &[ProgressSeries], metric: ProgressMetric) -> &ProgressSeries {
        all.iter().find(|s| s.metric == metric).unwrap()
    }

    #[test]
    fn session_volume_sums_weight_times_reps() {
        let all = build_series(
            &sessions(vec![entry(1, Some(100.0), 5), entry(1, Some(80.0), 8)]),
            &EngineConfig::default(),
        );
        let volume = series_for(&all, ProgressMetric::TotalVolumePerSession);
        assert_eq!(volume.points.len(), 1);
        assert!((volume.points[0].value - 1140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn frequency_counts_sessions_in_trailing_window() {
        // Sessions on days 1, 3, 6, 15
        let all = build_series(
            &sessions(vec![
                entry(1, Some(100.0), 5),
                entry(3, Some(100.0), 5),
                entry(6, Some(100.0), 5),
                entry(15, Some(100.0), 5),
            ]),
            &EngineConfig::default(),
        );
        let freq = series_for(&all, ProgressMetric::SessionFrequencyPerWeek);
        let values: Vec<f64> = freq.points.iter().map(|p| p.value).collect();
        // Day 1: itself; day 3: days 1,3; day 6: days 1,3,6; day 15: itself
        assert_eq!(values, vec![1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn average_weight_excludes_bodyweight_from_denominator() {
        let all = build_series(
            &sessions(vec![
                entry(1, Some(100.0), 5),
                entry(1, Some(80.0), 8),
                entry(1, None, 12),
            ]),
            &EngineConfig::default(),
        );
        let avg = series_for(&all, ProgressMetric::AverageWeightPerSession);
        assert!((avg.points[0].value - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bodyweight_only_session_emits_no_average_point() {
        let all = build_series(
            &sessions(vec![entry(1, None, 12), entry(3, Some(100.0), 5)]),
            &EngineConfig::default(),
        );
        let avg = series_for(&all, ProgressMetric::AverageWeightPerSession);
        assert_eq!(avg.points.len(), 1);
        assert_eq!(
            avg.points[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn series_dates_are_strictly_ascending() {
        let all = build_series(
            &sessions(vec![
                entry(8, Some(110.0), 5),
                entry(1, Some(100.0), 5),
                entry(4, Some(105.0), 5),
            ]),
            &EngineConfig::default(),
        );
        for series in &all {
            let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
            let mut sorted = dates.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(dates, sorted);
        }
    }
}
