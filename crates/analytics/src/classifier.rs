use core_types::{ClassifiedPoint, NormalizedPoint, Quadrant};

/// Assigns a normalized point to a sentiment quadrant.
///
/// Points on an axis (a z-score of exactly zero, either sign) count as
/// non-negative, so the four regions partition the plane with no gaps.
#[derive(Debug, Default)]
pub struct QuadrantClassifier {}

impl QuadrantClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, point: &NormalizedPoint) -> Quadrant {
        Self::quadrant_of(point.z_breadth, point.z_strength)
    }

    pub fn classify_point(&self, point: NormalizedPoint) -> ClassifiedPoint {
        ClassifiedPoint {
            point,
            quadrant: self.classify(&point),
        }
    }

    /// Breadth is the x axis, strength the y axis.
    pub fn quadrant_of(z_breadth: f64, z_strength: f64) -> Quadrant {
        match (z_breadth >= 0.0, z_strength >= 0.0) {
            (true, true) => Quadrant::Greed,
            (false, true) => Quadrant::Mixed,
            (false, false) => Quadrant::Fear,
            (true, false) => Quadrant::Recovery,
        }
    }
}
