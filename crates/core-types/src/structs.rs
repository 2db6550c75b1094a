use crate::enums::Quadrant;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day of paired indicator readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Stock price strength (net new 52-week highs vs lows).
    pub strength: f64,
    /// Stock price breadth (McClellan volume summation).
    pub breadth: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, strength: f64, breadth: f64) -> Self {
        Self {
            date,
            strength,
            breadth,
        }
    }
}

/// A chronologically ordered run of observations with at most one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Builds a series, sorting the input by date.
    ///
    /// Returns `CoreError::DuplicateDate` if two observations share a date.
    pub fn new(mut observations: Vec<Observation>) -> Result<Self, CoreError> {
        observations.sort_by_key(|o| o.date);
        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(CoreError::DuplicateDate(pair[0].date));
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }
}

/// The trailing slice of a `Series` that normalization runs over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    series: Series,
    capacity: usize,
}

impl Window {
    /// Wraps `series` as a window of at most `capacity` observations.
    pub fn new(series: Series, capacity: usize) -> Result<Self, CoreError> {
        if series.len() > capacity {
            return Err(CoreError::WindowOverflow {
                len: series.len(),
                capacity,
            });
        }
        Ok(Self { series, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn observations(&self) -> &[Observation] {
        self.series.observations()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.series.latest()
    }
}

/// An observation re-expressed as z-scores against its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub z_strength: f64,
    pub z_breadth: f64,
}

/// A normalized point together with the sentiment region it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    #[serde(flatten)]
    pub point: NormalizedPoint,
    pub quadrant: Quadrant,
}
