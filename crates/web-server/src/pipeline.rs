use crate::error::AppError;
use analytics::{AnalyticsEngine, AnalyticsError, LabeledSeries, Report};
use api_client::{FeedClient, FeedSnapshot, HeadlineIndex};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A report plus the feed context it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub report: Report,
    pub headline: Option<HeadlineIndex>,
    /// The feed's own verdict on each indicator, e.g. `"extreme fear"`.
    pub strength_rating: Option<String>,
    pub breadth_rating: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Runs the analytics pipeline over an already-fetched snapshot.
pub fn build_report(
    snapshot: &FeedSnapshot,
    engine: &AnalyticsEngine,
) -> Result<Report, AnalyticsError> {
    let strength = LabeledSeries::from_millis(&snapshot.strength.name, snapshot.strength.pairs())?;
    let breadth = LabeledSeries::from_millis(&snapshot.breadth.name, snapshot.breadth.pairs())?;
    engine.calculate(&strength, &breadth)
}

/// Fetches the feed and builds a fresh view. Nothing is stored between calls
/// apart from whatever the feed client caches.
pub async fn load_view(
    feed: &dyn FeedClient,
    engine: &AnalyticsEngine,
) -> Result<DashboardView, AppError> {
    let snapshot = feed.fetch_snapshot().await?;
    let report = build_report(&snapshot, engine)?;
    tracing::info!(
        as_of = %report.as_of_date,
        quadrant = %report.latest.quadrant,
        points = report.points.len(),
        "Built sentiment report."
    );
    Ok(DashboardView {
        report,
        headline: snapshot.headline,
        strength_rating: snapshot.strength.rating,
        breadth_rating: snapshot.breadth.rating,
        fetched_at: snapshot.fetched_at,
    })
}
