// ABOUTME: Linear regression and trend classification for progress series
// ABOUTME: Slope, fit quality, and tolerance-gated trend direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Statistical primitives shared by the movement analyzer and goal tracker.

#![allow(clippy::cast_precision_loss)] // Safe: personal-scale point counts

use crate::errors::{EngineError, EngineResult};
use crate::models::{ProgressPoint, TrendDirection};
use serde::{Deserialize, Serialize};

/// Linear regression over a series of observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Rate of change per unit of x
    pub slope: f64,
    /// Value of the fitted line at x = 0
    pub intercept: f64,
    /// Coefficient of determination (goodness of fit, 0-1)
    pub r_squared: f64,
    /// Pearson correlation coefficient (-1 to 1)
    pub correlation: f64,
}

impl RegressionResult {
    /// Value of the fitted line at `x`.
    #[must_use]
    pub fn project(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Least-squares fit of `y` against explicit `x` coordinates.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientData`] for fewer than two points and
/// [`EngineError::Statistics`] when all x values coincide.
pub fn linear_fit(x_values: &[f64], y_values: &[f64]) -> EngineResult<RegressionResult> {
    let n = x_values.len().min(y_values.len());
    if n < 2 {
        return Err(EngineError::InsufficientData { needed: 2, got: n });
    }
    let x_values = &x_values[..n];
    let y_values = &y_values[..n];
    let n_f = n as f64;

    let sum_x: f64 = x_values.iter().sum();
    let sum_y: f64 = y_values.iter().sum();
    let sum_xx: f64 = x_values.iter().map(|x| x * x).sum();
    let sum_yy: f64 = y_values.iter().map(|y| y * y).sum();
    let sum_xy: f64 = x_values.iter().zip(y_values).map(|(x, y)| x * y).sum();

    let mean_x = sum_x / n_f;
    let mean_y = sum_y / n_f;

    let denominator = (n_f * mean_x).mul_add(-mean_x, sum_xx);
    if denominator.abs() < f64::EPSILON {
        return Err(EngineError::Statistics(
            "zero variance in x; cannot fit a line".into(),
        ));
    }

    let slope = (n_f * mean_x).mul_add(-mean_y, sum_xy) / denominator;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let corr_numerator = (n_f * mean_x).mul_add(-mean_y, sum_xy);
    let corr_denominator =
        ((n_f * mean_x).mul_add(-mean_x, sum_xx) * (n_f * mean_y).mul_add(-mean_y, sum_yy)).sqrt();
    let correlation = if corr_denominator == 0.0 {
        0.0
    } else {
        corr_numerator / corr_denominator
    };

    Ok(RegressionResult {
        slope,
        intercept,
        r_squared: correlation * correlation,
        correlation,
    })
}

/// Fit a series against its observation index (0, 1, 2, ...).
///
/// # Errors
///
/// Same as [`linear_fit`].
pub fn fit_by_index(values: &[f64]) -> EngineResult<RegressionResult> {
    let x_values: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    linear_fit(&x_values, values)
}

/// Fit progress points against days elapsed since the first point.
///
/// Day-based x coordinates let the result be projected to a calendar
/// deadline.
///
/// # Errors
///
/// Same as [`linear_fit`].
pub fn fit_by_days(points: &[ProgressPoint]) -> EngineResult<RegressionResult> {
    let Some(first) = points.first() else {
        return Err(EngineError::InsufficientData { needed: 2, got: 0 });
    };
    let x_values: Vec<f64> = points
        .iter()
        .map(|p| (p.date - first.date).num_days() as f64)
        .collect();
    let y_values: Vec<f64> = points.iter().map(|p| p.value).collect();
    linear_fit(&x_values, &y_values)
}

/// Classify a slope into a trend direction, gated by the configured
/// tolerance. `higher_is_better` flips the reading for metrics where a
/// falling value is progress.
#[must_use]
pub fn trend_from_slope(slope: f64, tolerance: f64, higher_is_better: bool) -> TrendDirection {
    if slope.abs() <= tolerance {
        return TrendDirection::Plateau;
    }
    let improving = if higher_is_better {
        slope > 0.0
    } else {
        slope < 0.0
    };
    if improving {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}
