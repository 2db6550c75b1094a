use crate::classifier::QuadrantClassifier;
use crate::error::AnalyticsError;
use crate::normalizer::FieldStats;
use core_types::{ClassifiedPoint, NormalizedPoint, Quadrant, Window};
use serde::{Deserialize, Serialize};

/// The statistics a report's z-scores were computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub strength: FieldStats,
    pub breadth: FieldStats,
}

/// A renderable snapshot of the current sentiment window.
///
/// This struct is the final output of the `AnalyticsEngine` and the payload
/// handed to the dashboard. It is rebuilt on every fetch and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Every point in the window, oldest first.
    pub points: Vec<ClassifiedPoint>,
    /// The most recent point, also the last entry of `points`.
    pub latest: ClassifiedPoint,
    /// The date of `latest` as `YYYY-MM-DD`.
    pub as_of_date: String,
    /// The configured window length (the number of points may be smaller).
    pub window_size: usize,
    pub stats: Option<WindowStats>,
}

impl Report {
    pub fn with_stats(mut self, strength: FieldStats, breadth: FieldStats) -> Self {
        self.stats = Some(WindowStats { strength, breadth });
        self
    }

    /// All points except the latest.
    pub fn history(&self) -> &[ClassifiedPoint] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    pub fn count_in(&self, quadrant: Quadrant) -> usize {
        self.points.iter().filter(|p| p.quadrant == quadrant).count()
    }
}

/// Packages a window's normalized points into a `Report`.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    classifier: QuadrantClassifier,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `points` and stamps the report with the latest date.
    ///
    /// `points` must be the normalization of `window`, one per observation.
    /// An empty window yields `AnalyticsError::NoDataAvailable`.
    pub fn assemble(
        &self,
        window: &Window,
        points: &[NormalizedPoint],
    ) -> Result<Report, AnalyticsError> {
        if window.is_empty() || points.is_empty() {
            return Err(AnalyticsError::NoDataAvailable);
        }
        if points.len() != window.len() {
            return Err(AnalyticsError::Calculation(format!(
                "window has {} observations but {} normalized points were given",
                window.len(),
                points.len()
            )));
        }

        let points: Vec<ClassifiedPoint> = points
            .iter()
            .map(|p| self.classifier.classify_point(*p))
            .collect();
        let latest = *points.last().ok_or(AnalyticsError::NoDataAvailable)?;

        Ok(Report {
            as_of_date: latest.point.date.format("%Y-%m-%d").to_string(),
            latest,
            points,
            window_size: window.capacity(),
            stats: None,
        })
    }
}
