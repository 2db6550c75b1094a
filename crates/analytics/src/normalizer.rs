use crate::error::AnalyticsError;
use core_types::{NormalizedPoint, Window};
use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of one indicator over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl FieldStats {
    /// Computes the mean and the (n - 1) sample standard deviation of `values`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` when fewer than two values are given.
    /// * `DegenerateSeries` when every value is identical.
    pub fn compute(field: &str, values: &[f64]) -> Result<Self, AnalyticsError> {
        let count = values.len();
        if count < 2 {
            return Err(AnalyticsError::InsufficientData { count });
        }

        // Checked on the inputs: the computed deviation of a constant run can be rounding noise.
        let first = values[0];
        if values.iter().all(|v| *v == first) {
            return Err(AnalyticsError::DegenerateSeries(field.to_string()));
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std_dev = (sum_sq / (count - 1) as f64).sqrt();

        if std_dev == 0.0 {
            return Err(AnalyticsError::DegenerateSeries(field.to_string()));
        }
        if !std_dev.is_finite() || !mean.is_finite() {
            return Err(AnalyticsError::Calculation(format!(
                "non-finite statistics for '{field}' (mean={mean}, std_dev={std_dev})"
            )));
        }

        Ok(Self { mean, std_dev })
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// The z-scored window plus the statistics used to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub points: Vec<NormalizedPoint>,
    pub strength: FieldStats,
    pub breadth: FieldStats,
}

/// Standardizes strength and breadth independently over a window.
#[derive(Debug, Default)]
pub struct ZScoreNormalizer {}

impl ZScoreNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&self, window: &Window) -> Result<Normalization, AnalyticsError> {
        let observations = window.observations();
        if observations.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                count: observations.len(),
            });
        }

        let strengths: Vec<f64> = observations.iter().map(|o| o.strength).collect();
        let breadths: Vec<f64> = observations.iter().map(|o| o.breadth).collect();

        let strength = FieldStats::compute("strength", &strengths)?;
        let breadth = FieldStats::compute("breadth", &breadths)?;

        tracing::debug!(
            count = observations.len(),
            strength_mean = strength.mean,
            strength_std = strength.std_dev,
            breadth_mean = breadth.mean,
            breadth_std = breadth.std_dev,
            "Computed window statistics."
        );

        let points = observations
            .iter()
            .map(|o| NormalizedPoint {
                date: o.date,
                z_strength: strength.z_score(o.strength),
                z_breadth: breadth.z_score(o.breadth),
            })
            .collect();

        Ok(Normalization {
            points,
            strength,
            breadth,
        })
    }
}
