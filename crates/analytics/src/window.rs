use crate::error::AnalyticsError;
use core_types::{Series, Window};

/// The trailing window length used when none is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Keeps the most recent `size` observations of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSelector {
    size: usize,
}

impl WindowSelector {
    pub fn new(size: usize) -> Result<Self, AnalyticsError> {
        if size == 0 {
            return Err(AnalyticsError::InvalidWindowSize(size));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the last `size` observations in chronological order, or the
    /// whole series when it is shorter. An empty series gives an empty window.
    pub fn select(&self, series: &Series) -> Result<Window, AnalyticsError> {
        let start = series.len().saturating_sub(self.size);
        let tail = Series::new(series.observations()[start..].to_vec())?;
        Ok(Window::new(tail, self.size)?)
    }
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
        }
    }
}
