use crate::aligner::{LabeledSeries, SeriesAligner};
use crate::error::AnalyticsError;
use crate::normalizer::ZScoreNormalizer;
use crate::report::{Report, ReportAssembler};
use crate::window::WindowSelector;

/// A stateless pipeline from two raw indicators to a `Report`.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    aligner: SeriesAligner,
    selector: WindowSelector,
    normalizer: ZScoreNormalizer,
    assembler: ReportAssembler,
}

impl AnalyticsEngine {
    pub fn new(window_size: usize) -> Result<Self, AnalyticsError> {
        Ok(Self {
            selector: WindowSelector::new(window_size)?,
            ..Self::default()
        })
    }

    pub fn window_size(&self) -> usize {
        self.selector.size()
    }

    /// The main entry point: align, window, normalize, classify and assemble.
    ///
    /// # Arguments
    ///
    /// * `strength` - The stock price strength indicator.
    /// * `breadth` - The stock price breadth indicator.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Report` or the first `AnalyticsError` hit.
    pub fn calculate(
        &self,
        strength: &LabeledSeries,
        breadth: &LabeledSeries,
    ) -> Result<Report, AnalyticsError> {
        let series = self.aligner.align(strength, breadth)?;
        let window = self.selector.select(&series)?;
        tracing::debug!(
            aligned = series.len(),
            window = window.len(),
            "Selected trailing window."
        );

        let normalization = self.normalizer.normalize(&window)?;
        let report = self
            .assembler
            .assemble(&window, &normalization.points)?
            .with_stats(normalization.strength, normalization.breadth);

        tracing::debug!(
            as_of = %report.as_of_date,
            quadrant = %report.latest.quadrant,
            "Assembled sentiment report."
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core_types::Quadrant;

    const DAY_MS: f64 = 86_400_000.0;
    // 2024-01-01T00:00:00Z
    const JAN_1: f64 = 1_704_067_200_000.0;

    fn indicator(label: &str, values: &[f64]) -> LabeledSeries {
        LabeledSeries::from_millis(
            label,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (JAN_1 + i as f64 * DAY_MS, v)),
        )
        .unwrap()
    }

    #[test]
    fn worked_example() {
        let engine = AnalyticsEngine::new(3).unwrap();
        let report = engine
            .calculate(
                &indicator("strength", &[10.0, 20.0, 30.0]),
                &indicator("breadth", &[1.0, 2.0, 3.0]),
            )
            .unwrap();

        let stats = report.stats.unwrap();
        assert_abs_diff_eq!(stats.strength.mean, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.strength.std_dev, 10.0, epsilon = 1e-12);
        let z: Vec<f64> = report.points.iter().map(|p| p.point.z_strength).collect();
        assert_abs_diff_eq!(z[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z[2], 1.0, epsilon = 1e-12);

        assert_eq!(report.as_of_date, "2024-01-03");
        assert_eq!(report.points[0].quadrant, Quadrant::Fear);
        assert_eq!(report.points[1].quadrant, Quadrant::Greed);
        assert_eq!(report.latest.quadrant, Quadrant::Greed);
    }

    #[test]
    fn only_the_trailing_window_is_normalized() {
        let strength: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).cos() * 10.0).collect();
        let breadth: Vec<f64> = (0..40).map(|i| i as f64).collect();

        let report = AnalyticsEngine::default()
            .calculate(&indicator("strength", &strength), &indicator("breadth", &breadth))
            .unwrap();

        assert_eq!(report.points.len(), 20);
        assert_eq!(report.as_of_date, "2024-02-09");
        assert_abs_diff_eq!(report.stats.unwrap().breadth.mean, 29.5, epsilon = 1e-12);
    }

    #[test]
    fn errors_propagate() {
        let engine = AnalyticsEngine::default();

        let disjoint = LabeledSeries::from_millis("breadth", vec![(JAN_1 - DAY_MS, 1.0)]).unwrap();
        assert!(matches!(
            engine.calculate(&indicator("strength", &[1.0]), &disjoint),
            Err(AnalyticsError::EmptyAlignment(_, _))
        ));

        assert_eq!(
            engine
                .calculate(&indicator("strength", &[1.0]), &indicator("breadth", &[2.0]))
                .unwrap_err(),
            AnalyticsError::InsufficientData { count: 1 }
        );

        assert_eq!(
            engine
                .calculate(
                    &indicator("strength", &[5.0, 5.0, 5.0]),
                    &indicator("breadth", &[1.0, 2.0, 3.0])
                )
                .unwrap_err(),
            AnalyticsError::DegenerateSeries("strength".into())
        );
    }

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(
            AnalyticsEngine::new(0).unwrap_err(),
            AnalyticsError::InvalidWindowSize(0)
        );
    }
}
