// ABOUTME: Record normalizer turning raw sheet rows into typed set entries
// ABOUTME: Validates per row, quarantines failures with a reason, flags ambiguous dates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Raw row validation and coercion.
//!
//! Rules apply independently per row; the two outputs partition the input
//! exactly. Nothing is silently discarded.

use crate::config::EngineConfig;
use crate::models::{
    canonical_key, QuarantineReason, QuarantinedRow, RawRow, RowWarning, SetEntry,
};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Output of one normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Rows that passed validation
    pub entries: Vec<SetEntry>,
    /// Rows that failed, with the rule that rejected them
    pub quarantined: Vec<QuarantinedRow>,
    /// Soft warnings for surviving rows
    pub warnings: Vec<RowWarning>,
}

/// Validate and coerce a snapshot of raw rows.
#[must_use]
pub fn normalize(rows: &[RawRow], config: &EngineConfig) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (row_index, row) in rows.iter().enumerate() {
        match normalize_row(row, config) {
            Ok((entry, ambiguity)) => {
                if let Some(message) = ambiguity {
                    warn!(row_index, %message, "ambiguous date format");
                    batch.warnings.push(RowWarning { row_index, message });
                }
                batch.entries.push(entry);
            }
            Err(reason) => {
                warn!(row_index, ?reason, "quarantined raw row");
                batch.quarantined.push(QuarantinedRow {
                    row_index,
                    reason,
                    row: row.clone(),
                });
            }
        }
    }

    debug!(
        normalized = batch.entries.len(),
        quarantined = batch.quarantined.len(),
        warnings = batch.warnings.len(),
        "normalization pass complete"
    );
    batch
}

fn normalize_row(
    row: &RawRow,
    config: &EngineConfig,
) -> Result<(SetEntry, Option<String>), QuarantineReason> {
    let (date, ambiguity) = parse_date(&row.date, &config.date_format_preference)
        .ok_or(QuarantineReason::MissingDate)?;

    if let Some(weight) = row.weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(QuarantineReason::InvalidNumeric);
        }
    }
    let reps = match row.reps {
        Some(r) => u32::try_from(r).map_err(|_| QuarantineReason::InvalidNumeric)?,
        None => 0,
    };
    let set_index =
        u32::try_from(row.set_index).map_err(|_| QuarantineReason::InvalidNumeric)?;
    if set_index == 0 {
        return Err(QuarantineReason::InvalidNumeric);
    }

    let workout_type = row.workout_type.trim();
    let movement = row.movement.trim();
    if workout_type.is_empty() || movement.is_empty() {
        return Err(QuarantineReason::EmptyTypeOrMovement);
    }

    Ok((
        SetEntry {
            date,
            workout_type: workout_type.to_owned(),
            workout_type_key: canonical_key(workout_type),
            movement: movement.to_owned(),
            movement_key: canonical_key(movement),
            set_index,
            weight: row.weight,
            reps,
            ambiguous_date: ambiguity.is_some(),
        },
        ambiguity,
    ))
}

/// Parse a date cell against the preference-ordered format list.
///
/// The first format that parses wins. When a later format parses the same
/// text to a *different* calendar date, the row survives with an ambiguity
/// message rather than being dropped.
fn parse_date(raw: &str, formats: &[String]) -> Option<(NaiveDate, Option<String>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut chosen: Option<NaiveDate> = None;
    let mut alternate: Option<NaiveDate> = None;
    for format in formats {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            match chosen {
                None => chosen = Some(parsed),
                Some(first) if parsed != first && alternate.is_none() => {
                    alternate = Some(parsed);
                }
                Some(_) => {}
            }
        }
    }

    let date = chosen?;
    let ambiguity = alternate.map(|other| {
        format!("date '{trimmed}' also parses as {other}; kept first-preference reading {date}")
    });
    Some((date, ambiguity))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn raw(date: &str, workout: &str, movement: &str) -> RawRow {
        RawRow {
            date: date.into(),
            workout_type: workout.into(),
            movement: movement.into(),
            set_index: 1,
            weight: Some(100.0),
            reps: Some(5),
            notes: None,
        }
    }

    #[test]
    fn outputs_partition_the_input() {
        let rows = vec![
            raw("2024-01-01", "lg", "Squat"),
            raw("", "lg", "Squat"),
            raw("2024-01-02", "  ", "Squat"),
            RawRow {
                weight: Some(-10.0),
                ..raw("2024-01-03", "lg", "Squat")
            },
        ];
        let batch = normalize(&rows, &EngineConfig::default());
        assert_eq!(batch.entries.len() + batch.quarantined.len(), rows.len());
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.quarantined.len(), 3);
    }

    #[test]
    fn quarantine_reasons_match_the_failed_rule() {
        let rows = vec![
            raw("not-a-date", "lg", "Squat"),
            RawRow {
                reps: Some(-3),
                ..raw("2024-01-01", "lg", "Squat")
            },
            raw("2024-01-01", "lg", "   "),
            RawRow {
                set_index: 0,
                ..raw("2024-01-01", "lg", "Squat")
            },
        ];
        let batch = normalize(&rows, &EngineConfig::default());
        let reasons: Vec<_> = batch.quarantined.iter().map(|q| q.reason).collect();
        assert_eq!(
            reasons,
            vec![
                QuarantineReason::MissingDate,
                QuarantineReason::InvalidNumeric,
                QuarantineReason::EmptyTypeOrMovement,
                QuarantineReason::InvalidNumeric,
            ]
        );
    }

    #[test]
    fn reps_beyond_range_are_quarantined_not_saturated() {
        let batch = normalize(
            &[RawRow {
                reps: Some(i64::from(u32::MAX) + 1),
                ..raw("2024-01-01", "lg", "Squat")
            }],
            &EngineConfig::default(),
        );
        assert!(batch.entries.is_empty());
        assert_eq!(batch.quarantined[0].reason, QuarantineReason::InvalidNumeric);
    }

    #[test]
    fn ambiguous_date_survives_with_warning() {
        // 03/04/2024 reads as March 4 (m/d) or April 3 (d/m)
        let batch = normalize(&[raw("03/04/2024", "lg", "Squat")], &EngineConfig::default());
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.warnings.len(), 1);
        assert!(batch.entries[0].ambiguous_date);
        // First-preference format (m/d/Y) wins
        assert_eq!(
            batch.entries[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn unambiguous_day_first_date_has_no_warning() {
        // 25/03/2024 only parses day-first
        let batch = normalize(&[raw("25/03/2024", "lg", "Squat")], &EngineConfig::default());
        assert_eq!(batch.entries.len(), 1);
        assert!(batch.warnings.is_empty());
        assert!(!batch.entries[0].ambiguous_date);
    }

    #[test]
    fn casing_is_preserved_for_display_and_folded_for_identity() {
        let batch = normalize(&[raw("2024-01-01", "  Legs ", "SQUAT")], &EngineConfig::default());
        let entry = &batch.entries[0];
        assert_eq!(entry.workout_type, "Legs");
        assert_eq!(entry.workout_type_key, "legs");
        assert_eq!(entry.movement, "SQUAT");
        assert_eq!(entry.movement_key, "squat");
    }

    #[test]
    fn absent_reps_normalize_to_zero() {
        let batch = normalize(
            &[RawRow {
                reps: None,
                ..raw("2024-01-01", "lg", "Squat")
            }],
            &EngineConfig::default(),
        );
        assert_eq!(batch.entries[0].reps, 0);
    }
}
