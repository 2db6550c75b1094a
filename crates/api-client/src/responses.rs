use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Only the fields we read are modelled; serde ignores the rest of the payload.

/// The body of `GET /index/feargreed/static/data`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    /// The headline index, when the feed includes it.
    #[serde(default)]
    pub fear_and_greed: Option<HeadlineIndex>,
    /// Component indicators keyed by name (e.g. `stock_price_strength`).
    #[serde(default)]
    pub indicators: HashMap<String, IndicatorPayload>,
}

/// The current value of the composite Fear & Greed index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineIndex {
    pub score: f64,
    pub rating: String,
}

/// One component indicator and its history.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorPayload {
    #[serde(default)]
    pub rating: Option<String>,
    pub data: Vec<RawPoint>,
}

/// A single `{x, y}` sample: `x` is epoch milliseconds, `y` the indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

/// The raw history of one indicator as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub rating: Option<String>,
    pub points: Vec<RawPoint>,
}

impl IndicatorSeries {
    /// `(timestamp_ms, value)` pairs in feed order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }
}

/// Everything the dashboard needs from one feed fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub strength: IndicatorSeries,
    pub breadth: IndicatorSeries,
    pub headline: Option<HeadlineIndex>,
    /// When the payload was fetched from the network (not when it was read from cache).
    pub fetched_at: DateTime<Utc>,
}
