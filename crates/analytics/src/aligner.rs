use crate::error::AnalyticsError;
use chrono::{DateTime, NaiveDate};
use core_types::{CoreError, Observation, Series};
use std::collections::BTreeMap;

/// A single indicator keyed by UTC calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    label: String,
    values: BTreeMap<NaiveDate, f64>,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, values: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Builds a series from `(epoch milliseconds, value)` pairs.
    ///
    /// Timestamps are truncated to their UTC day. When several pairs land on
    /// the same day, the one appearing last wins.
    pub fn from_millis<I>(label: impl Into<String>, points: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut values = BTreeMap::new();
        for (timestamp_ms, value) in points {
            values.insert(day_of(timestamp_ms)?, value);
        }
        Ok(Self::new(label, values))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.values.get(date).copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn day_of(timestamp_ms: f64) -> Result<NaiveDate, CoreError> {
    if !timestamp_ms.is_finite() || timestamp_ms.abs() > i64::MAX as f64 {
        return Err(CoreError::InvalidTimestamp(timestamp_ms));
    }
    DateTime::from_timestamp_millis(timestamp_ms.floor() as i64)
        .map(|dt| dt.date_naive())
        .ok_or(CoreError::InvalidTimestamp(timestamp_ms))
}

/// Joins the strength and breadth indicators on their shared dates.
#[derive(Debug, Default)]
pub struct SeriesAligner {}

impl SeriesAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inner-joins the two indicators by date.
    ///
    /// Dates present in only one input are dropped. Returns
    /// `AnalyticsError::EmptyAlignment` if nothing is left.
    pub fn align(
        &self,
        strength: &LabeledSeries,
        breadth: &LabeledSeries,
    ) -> Result<Series, AnalyticsError> {
        let observations: Vec<Observation> = strength
            .values
            .iter()
            .filter_map(|(date, &s)| breadth.get(date).map(|b| Observation::new(*date, s, b)))
            .collect();

        if observations.is_empty() {
            return Err(AnalyticsError::EmptyAlignment(
                strength.label.clone(),
                breadth.label.clone(),
            ));
        }

        tracing::debug!(
            strength = strength.len(),
            breadth = breadth.len(),
            aligned = observations.len(),
            "Aligned indicator series."
        );

        Ok(Series::new(observations)?)
    }
}
