// ABOUTME: Error taxonomy for the analytics engine
// ABOUTME: Configuration problems are hard errors; malformed rows are data (quarantine), not errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Engine error types.
//!
//! Row-level problems never surface here: a malformed row is routed to the
//! quarantine list and the pass continues. Errors are reserved for caller
//! mistakes (out-of-range configuration) and isolated per-cohort analysis
//! failures.

use thiserror::Error;

/// Errors produced by the analytics engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed validation; refused rather than silently clamped.
    #[error("configuration out of range: {0}")]
    ConfigurationOutOfRange(String),

    /// Too few data points for a statistical computation.
    #[error("insufficient data points: need at least {needed}, got {got}")]
    InsufficientData {
        /// Minimum points required
        needed: usize,
        /// Points actually available
        got: usize,
    },

    /// Degenerate input to a statistical computation (e.g. zero variance).
    #[error("statistical computation failed: {0}")]
    Statistics(String),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
