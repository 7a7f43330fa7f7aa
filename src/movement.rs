// ABOUTME: Movement analyzer computing per-movement stats within one workout-type cohort
// ABOUTME: Running max weight, two-axis PR detection, trailing-window volume trend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Per-movement statistics.
//!
//! Sessions are walked in date order, maintaining per-movement running
//! records. A personal record can be a pure-weight or a pure-volume
//! improvement; the two axes are checked as independent predicates rather
//! than a single comparable score, so one never masks the other.

use crate::config::EngineConfig;
use crate::models::{
    MovementStat, PrAxis, PrEvent, ProgressPoint, Session, SetEntry, TrendDirection,
};
use crate::statistics::{fit_by_index, trend_from_slope};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum best-set observations before a trend is called.
const MIN_TREND_POINTS: usize = 3;

/// Per-session best-set history for one movement.
///
/// Consumed by the goal tracker for extrapolation; not part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementSeries {
    /// Best-set weight per session, date ascending
    pub weight_points: Vec<ProgressPoint>,
    /// Best-set volume per session, date ascending
    pub volume_points: Vec<ProgressPoint>,
}

/// Output of movement analysis for one cohort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementAnalysis {
    /// Stats per movement, keyed by canonical identity
    pub stats: BTreeMap<String, MovementStat>,
    /// Best-set series per movement, keyed by canonical identity
    pub series: BTreeMap<String, MovementSeries>,
}

/// Running per-movement records while walking sessions in date order.
#[derive(Debug, Default)]
struct RunningRecords {
    display_name: String,
    /// Heaviest set so far: (weight, reps at that weight)
    max_weight: Option<(f64, u32)>,
    /// Best single-set volume so far: (volume, weight of that set)
    best_volume: Option<(f64, f64)>,
    session_count: usize,
    total_reps: u64,
    last_performed: Option<chrono::NaiveDate>,
    pr_events: Vec<PrEvent>,
    series: MovementSeries,
}

/// Analyze the ordered sessions of one workout type.
#[must_use]
pub fn analyze_movements(sessions: &[Session], config: &EngineConfig) -> MovementAnalysis {
    let mut records: BTreeMap<String, RunningRecords> = BTreeMap::new();

    for session in sessions {
        // Movements present in this session, in first-logged order
        let mut seen: Vec<&str> = Vec::new();
        for entry in &session.entries {
            if !seen.contains(&entry.movement_key.as_str()) {
                seen.push(&entry.movement_key);
            }
        }

        for movement_key in seen {
            let sets: Vec<&SetEntry> = session
                .entries
                .iter()
                .filter(|e| e.movement_key == movement_key)
                .collect();

            let record = records
                .entry(movement_key.to_owned())
                .or_insert_with(|| RunningRecords {
                    display_name: sets[0].movement.clone(),
                    ..RunningRecords::default()
                });

            record.session_count += 1;
            record.total_reps += sets.iter().map(|s| u64::from(s.reps)).sum::<u64>();
            record.last_performed = Some(session.date);

            if let Some(best) = best_weighted_set(&sets) {
                observe_best_set(record, session.date, best);
            }
            for set in &sets {
                if let Some(weight) = set.weight {
                    advance_max_weight(record, weight, set.reps);
                }
            }
        }
    }

    let mut analysis = MovementAnalysis::default();
    for (key, record) in records {
        let Some(last_performed) = record.last_performed else {
            continue;
        };
        let trend = classify_trend(&record.series.volume_points, config);
        analysis.stats.insert(
            key.clone(),
            MovementStat {
                movement: record.display_name,
                max_weight: record.max_weight.map(|(w, _)| w),
                best_set_volume: record.best_volume.map_or(0.0, |(v, _)| v),
                session_count: record.session_count,
                total_reps: record.total_reps,
                last_performed,
                trend,
                pr_events: record.pr_events,
            },
        );
        analysis.series.insert(key, record.series);
    }

    debug!(movements = analysis.stats.len(), "movement analysis complete");
    analysis
}

/// The session's best set for a movement: the weighted set maximizing
/// weight x reps, ties broken by the heavier weight. Bodyweight sets carry no
/// best-set value.
fn best_weighted_set<'a>(sets: &[&'a SetEntry]) -> Option<&'a SetEntry> {
    sets.iter()
        .filter(|s| s.weight.is_some())
        .copied()
        .max_by(|a, b| {
            a.volume()
                .total_cmp(&b.volume())
                .then(a.weight.unwrap_or(0.0).total_cmp(&b.weight.unwrap_or(0.0)))
        })
}

/// Record the session's best set: extend the series, check both PR axes,
/// then advance the best-volume record.
fn observe_best_set(record: &mut RunningRecords, date: chrono::NaiveDate, best: &SetEntry) {
    let Some(weight) = best.weight else { return };
    let volume = best.volume();

    record.series.weight_points.push(ProgressPoint {
        date,
        value: weight,
    });
    record.series.volume_points.push(ProgressPoint {
        date,
        value: volume,
    });

    let weight_pr = match record.max_weight {
        // First weighted observation establishes the baseline and counts as a step
        None => true,
        Some((max_w, max_reps)) => weight > max_w && best.reps >= max_reps,
    };
    let volume_pr = match record.best_volume {
        None => false, // covered by the baseline weight event
        Some((best_v, best_v_weight)) => volume > best_v && weight >= best_v_weight,
    };

    if weight_pr || volume_pr {
        record.pr_events.push(PrEvent {
            date,
            axis: if weight_pr { PrAxis::Weight } else { PrAxis::Volume },
            weight,
            reps: best.reps,
            volume,
        });
    }

    match record.best_volume {
        None => record.best_volume = Some((volume, weight)),
        Some((best_v, _)) => {
            if volume > best_v {
                record.best_volume = Some((volume, weight));
            }
        }
    }
}

/// Advance the heaviest-set record. Every weighted set of the session
/// counts, not just the best-volume set, so a top single is never masked by
/// a higher-volume backoff set.
fn advance_max_weight(record: &mut RunningRecords, weight: f64, reps: u32) {
    match record.max_weight {
        None => record.max_weight = Some((weight, reps)),
        Some((max_w, max_reps)) => {
            if weight > max_w || (weight == max_w && reps > max_reps) {
                record.max_weight = Some((weight, reps));
            }
        }
    }
}

/// Trend of best-set volume over the trailing window.
fn classify_trend(volume_points: &[ProgressPoint], config: &EngineConfig) -> TrendDirection {
    if volume_points.len() < MIN_TREND_POINTS {
        return TrendDirection::InsufficientData;
    }
    let start = volume_points.len().saturating_sub(config.trend_window_size);
    let window: Vec<f64> = volume_points[start..].iter().map(|p| p.value).collect();
    match fit_by_index(&window) {
        Ok(fit) => trend_from_slope(fit.slope, config.trend_slope_tolerance, true),
        Err(_) => TrendDirection::InsufficientData,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::grouper::group_sessions;
    use chrono::NaiveDate;

    fn entry(day: u32, movement: &str, weight: Option<f64>, reps: u32) -> SetEntry {
        SetEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            workout_type: "lg".into(),
            workout_type_key: "lg".into(),
            movement: movement.into(),
            movement_key: movement.trim().to_lowercase(),
            set_index: 1,
            weight,
            reps,
            ambiguous_date: false,
        }
    }

    fn sessions(entries: Vec<SetEntry>) -> Vec<Session> {
        group_sessions(&entries).remove("lg").map_or(Vec::new(), |c| c.sessions)
    }

    #[test]
    fn increasing_weight_ladder_sets_a_pr_every_step() {
        let entries: Vec<_> = (0..6)
            .map(|i| entry(1 + i * 2, "Squat", Some(100.0 + f64::from(i) * 5.0), 5))
            .collect();
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        let stat = &analysis.stats["squat"];

        assert_eq!(stat.pr_events.len(), 6);
        assert!(stat
            .pr_events
            .iter()
            .all(|pr| pr.axis == PrAxis::Weight));
        assert_eq!(stat.trend, TrendDirection::Improving);
        assert_eq!(stat.max_weight, Some(125.0));
    }

    #[test]
    fn two_sessions_are_insufficient_for_a_trend() {
        // Day 1: Squat 100x5 then 105x5; day 8: Squat 110x5
        let entries = vec![
            entry(1, "Squat", Some(100.0), 5),
            entry(1, "Squat", Some(105.0), 5),
            entry(8, "Squat", Some(110.0), 5),
        ];
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        let stat = &analysis.stats["squat"];

        assert_eq!(stat.max_weight, Some(110.0));
        assert_eq!(stat.pr_events.len(), 2);
        assert_eq!(stat.trend, TrendDirection::InsufficientData);
    }

    #[test]
    fn volume_pr_fires_at_equal_weight() {
        // Same weight, more reps: volume axis, not weight axis
        let entries = vec![
            entry(1, "Bench", Some(80.0), 8),
            entry(3, "Bench", Some(80.0), 10),
        ];
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        let prs = &analysis.stats["bench"].pr_events;

        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].axis, PrAxis::Weight); // baseline
        assert_eq!(prs[1].axis, PrAxis::Volume);
        assert!((prs[1].volume - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lighter_high_rep_set_is_not_a_pr() {
        // 60x10 = 600 volume beats nothing: lighter weight blocks the volume axis
        let entries = vec![
            entry(1, "Bench", Some(80.0), 5),
            entry(3, "Bench", Some(60.0), 10),
        ];
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        assert_eq!(analysis.stats["bench"].pr_events.len(), 1);
    }

    #[test]
    fn heavy_single_sets_the_max_even_when_a_backoff_set_wins_on_volume() {
        // Day 1: top single 150x1 next to a 120x8 backoff set (the
        // higher-volume set); day 8: 125x8 beats the backoff on volume but
        // never the 150 max
        let entries = vec![
            entry(1, "Squat", Some(150.0), 1),
            entry(1, "Squat", Some(120.0), 8),
            entry(8, "Squat", Some(125.0), 8),
        ];
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        let stat = &analysis.stats["squat"];

        assert_eq!(stat.max_weight, Some(150.0));
        assert_eq!(stat.pr_events.len(), 2);
        assert_eq!(stat.pr_events[0].axis, PrAxis::Weight); // baseline
        assert_eq!(stat.pr_events[1].axis, PrAxis::Volume);
    }

    #[test]
    fn declining_volume_reads_declining() {
        let entries: Vec<_> = (0..5)
            .map(|i| entry(1 + i * 2, "Row", Some(100.0 - f64::from(i) * 10.0), 5))
            .collect();
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        assert_eq!(analysis.stats["row"].trend, TrendDirection::Declining);
    }

    #[test]
    fn flat_volume_reads_plateau() {
        let entries: Vec<_> = (0..5)
            .map(|i| entry(1 + i * 2, "Press", Some(60.0), 8))
            .collect();
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        assert_eq!(analysis.stats["press"].trend, TrendDirection::Plateau);
    }

    #[test]
    fn bodyweight_only_movement_has_no_weight_records() {
        let entries = vec![
            entry(1, "Plank", None, 1),
            entry(3, "Plank", None, 1),
        ];
        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        let stat = &analysis.stats["plank"];

        assert_eq!(stat.max_weight, None);
        assert!(stat.pr_events.is_empty());
        assert_eq!(stat.trend, TrendDirection::InsufficientData);
        assert_eq!(stat.session_count, 2);
    }

    #[test]
    fn trend_window_limits_the_regression() {
        // Long decline followed by a strong 5-session climb: the default
        // window of 5 sees only the climb
        let mut entries: Vec<_> = (0..5)
            .map(|i| entry(1 + i, "Curl", Some(100.0 - f64::from(i) * 10.0), 5))
            .collect();
        entries.extend((0..5).map(|i| entry(10 + i, "Curl", Some(60.0 + f64::from(i) * 15.0), 5)));

        let analysis = analyze_movements(&sessions(entries), &EngineConfig::default());
        assert_eq!(analysis.stats["curl"].trend, TrendDirection::Improving);
    }
}
