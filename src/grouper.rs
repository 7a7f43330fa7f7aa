// ABOUTME: Workout grouper partitioning set entries into sessions and type cohorts
// ABOUTME: Sessions are maximal (date, workout_type) groups; types are discovered, never enumerated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Session and cohort construction.
//!
//! A session is the maximal group of entries sharing (date, workout type).
//! Entry order within a session follows input order, assumed chronological
//! within a day as logged. Session order within a cohort is ascending by
//! date; the sort is stable so first-appearance order survives should a
//! sub-day session key ever be introduced.

use crate::models::{Session, SetEntry};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// All sessions of one discovered workout type, ordered by date ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCohort {
    /// Display name: first-seen original casing
    pub workout_type: String,
    /// Canonical identity
    pub workout_type_key: String,
    /// Sessions ascending by date
    pub sessions: Vec<Session>,
}

/// Partition normalized entries into per-type session cohorts.
///
/// Workout types are discovered from the data: any distinct canonical value
/// becomes a new cohort. The map is keyed by canonical identity so cohort
/// iteration order is deterministic.
#[must_use]
pub fn group_sessions(entries: &[SetEntry]) -> BTreeMap<String, TypeCohort> {
    let mut cohorts: BTreeMap<String, TypeCohort> = BTreeMap::new();
    // Session position per (type, date), preserving first-appearance order
    let mut session_slots: HashMap<(String, chrono::NaiveDate), usize> = HashMap::new();

    for entry in entries {
        let cohort = cohorts
            .entry(entry.workout_type_key.clone())
            .or_insert_with(|| TypeCohort {
                workout_type: entry.workout_type.clone(),
                workout_type_key: entry.workout_type_key.clone(),
                sessions: Vec::new(),
            });

        let slot_key = (entry.workout_type_key.clone(), entry.date);
        let slot = *session_slots.entry(slot_key).or_insert_with(|| {
            cohort.sessions.push(Session {
                date: entry.date,
                workout_type: cohort.workout_type.clone(),
                workout_type_key: cohort.workout_type_key.clone(),
                entries: Vec::new(),
                total_volume: 0.0,
            });
            cohort.sessions.len() - 1
        });

        let session = &mut cohort.sessions[slot];
        session.total_volume += entry.volume();
        session.entries.push(entry.clone());
    }

    for cohort in cohorts.values_mut() {
        cohort.sessions.sort_by_key(|s| s.date);
    }

    debug!(cohorts = cohorts.len(), "grouped entries into cohorts");
    cohorts
}
