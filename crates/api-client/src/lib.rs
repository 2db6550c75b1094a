use crate::error::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use configuration::FeedConfig;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub mod cache;
pub mod error;
pub mod responses;

// --- Public API ---
pub use cache::{CachedBody, FeedCache};
pub use responses::{FeedResponse, FeedSnapshot, HeadlineIndex, IndicatorSeries, RawPoint};

/// The source of raw sentiment indicators.
///
/// The dashboard only ever talks to this trait, so the live client can be
/// swapped for a stub in tests.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetches the strength and breadth histories.
    async fn fetch_snapshot(&self) -> Result<FeedSnapshot, ApiError>;
}

/// Client for the CNN Fear & Greed static data endpoint.
#[derive(Debug, Clone)]
pub struct FearGreedClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    strength_indicator: String,
    breadth_indicator: String,
    cache: FeedCache,
}

impl FearGreedClient {
    pub fn new(feed: &FeedConfig, cache: FeedCache) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&feed.user_agent)
                .map_err(|e| ApiError::ClientBuild(format!("invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(feed.timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            url: feed.url.clone(),
            timeout: feed.timeout,
            strength_indicator: feed.strength_indicator.clone(),
            breadth_indicator: feed.breadth_indicator.clone(),
            cache,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the response body and whether it came off the network.
    async fn fetch_body(&self) -> Result<(CachedBody, bool), ApiError> {
        if let Some(cached) = self.cache.get(&self.url).await {
            tracing::debug!(url = %self.url, fetched_at = %cached.fetched_at, "Feed cache hit.");
            return Ok((cached, false));
        }

        tracing::info!(url = %self.url, "Fetching sentiment feed.");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Feed returned a non-success status.");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let fetched = CachedBody {
            body,
            fetched_at: Utc::now(),
        };
        Ok((fetched, true))
    }

    fn classify(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Request(error)
        }
    }
}

#[async_trait]
impl FeedClient for FearGreedClient {
    async fn fetch_snapshot(&self) -> Result<FeedSnapshot, ApiError> {
        let (body, fresh) = self.fetch_body().await?;
        let snapshot = parse_snapshot(&body, &self.strength_indicator, &self.breadth_indicator)?;

        // Only payloads that parsed are worth keeping.
        if fresh {
            let purged = self.cache.purge_expired().await;
            self.cache.insert(self.url.clone(), body).await;
            let ttl = self.cache.ttl().await;
            tracing::debug!(ttl = ?ttl, purged, "Cached feed body.");
        }

        tracing::debug!(
            strength = snapshot.strength.points.len(),
            breadth = snapshot.breadth.points.len(),
            "Parsed feed snapshot."
        );
        Ok(snapshot)
    }
}

/// Extracts the two named indicators from a raw feed body.
pub fn parse_snapshot(
    cached: &CachedBody,
    strength_indicator: &str,
    breadth_indicator: &str,
) -> Result<FeedSnapshot, ApiError> {
    let mut response: FeedResponse = serde_json::from_str(&cached.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let mut take = |name: &str| {
        response
            .indicators
            .remove(name)
            .map(|payload| IndicatorSeries {
                name: name.to_string(),
                rating: payload.rating,
                points: payload.data,
            })
            .ok_or_else(|| ApiError::MissingIndicator(name.to_string()))
    };
    let strength = take(strength_indicator)?;
    let breadth = take(breadth_indicator)?;

    Ok(FeedSnapshot {
        strength,
        breadth,
        headline: response.fear_and_greed,
        fetched_at: cached.fetched_at,
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FIXTURE: &str = r#"{
        "fear_and_greed": {"score": 41.2, "rating": "fear", "timestamp": "2024-01-03T23:59:59+00:00"},
        "fear_and_greed_historical": {"data": []},
        "indicators": {
            "stock_price_strength": {
                "score": 30.0,
                "rating": "fear",
                "data": [
                    {"x": 1704067200000.0, "y": 10.0, "rating": "fear"},
                    {"x": 1704153600000, "y": 20.0, "rating": "neutral"},
                    {"x": 1704240000000.0, "y": 30.0, "rating": "greed"}
                ]
            },
            "stock_price_breadth": {
                "data": [
                    {"x": 1704067200000.0, "y": 1.0},
                    {"x": 1704153600000.0, "y": 2.0},
                    {"x": 1704240000000.0, "y": 3.0}
                ]
            },
            "put_call_options": {"data": []}
        }
    }"#;

    fn cached(body: &str) -> CachedBody {
        CachedBody {
            body: body.to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn feed_config(addr: SocketAddr, timeout: Duration) -> FeedConfig {
        FeedConfig {
            url: format!("http://{addr}/data"),
            timeout,
            ..FeedConfig::default()
        }
    }

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        addr
    }

    /// Serves the fixture to browser-like clients only, counting hits.
    fn fixture_router(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/data",
                get(|State(hits): State<Arc<AtomicUsize>>, headers: AxumHeaders| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let browser = headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .is_some_and(|ua| ua.starts_with("Mozilla/"));
                    if browser {
                        (StatusCode::OK, FIXTURE)
                    } else {
                        (StatusCode::IM_A_TEAPOT, "blocked")
                    }
                }),
            )
            .with_state(hits)
    }

    #[test]
    fn parses_named_indicators() {
        let snapshot =
            parse_snapshot(&cached(FIXTURE), "stock_price_strength", "stock_price_breadth")
                .unwrap();

        assert_eq!(snapshot.strength.name, "stock_price_strength");
        assert_eq!(snapshot.strength.rating.as_deref(), Some("fear"));
        assert_eq!(
            snapshot.strength.pairs().collect::<Vec<_>>(),
            vec![
                (1_704_067_200_000.0, 10.0),
                (1_704_153_600_000.0, 20.0),
                (1_704_240_000_000.0, 30.0)
            ]
        );
        assert_eq!(snapshot.breadth.points.len(), 3);
        assert_eq!(
            snapshot.headline,
            Some(HeadlineIndex {
                score: 41.2,
                rating: "fear".into()
            })
        );
    }

    #[test]
    fn missing_indicator_is_reported_by_name() {
        let err = parse_snapshot(&cached(FIXTURE), "stock_price_strength", "junk_bond_demand")
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingIndicator(name) if name == "junk_bond_demand"));
    }

    #[test]
    fn malformed_payload_is_a_deserialization_error() {
        for body in ["<html>blocked</html>", r#"{"indicators": {"stock_price_strength": {"data": "nope"}}}"#] {
            let err = parse_snapshot(&cached(body), "stock_price_strength", "stock_price_breadth")
                .unwrap_err();
            assert!(matches!(err, ApiError::Deserialization(_)), "{body}");
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("공포와탐욕", 2), "공포...");
    }

    #[tokio::test]
    async fn fetches_with_browser_headers_and_caches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = spawn(fixture_router(hits.clone())).await;
        let cache = FeedCache::new(Duration::from_secs(60));
        let client = FearGreedClient::new(&feed_config(addr, Duration::from_secs(5)), cache.clone())
            .unwrap();

        let first = client.fetch_snapshot().await.unwrap();
        let second = client.fetch_snapshot().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(cache.get(client.url()).await.is_some());
    }

    #[tokio::test]
    async fn disabled_cache_fetches_every_time() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = spawn(fixture_router(hits.clone())).await;
        let client =
            FearGreedClient::new(&feed_config(addr, Duration::from_secs(5)), FeedCache::disabled())
                .unwrap();

        client.fetch_snapshot().await.unwrap();
        client.fetch_snapshot().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_failure_and_not_cached() {
        let addr = spawn(Router::new().route(
            "/data",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        ))
        .await;
        let cache = FeedCache::new(Duration::from_secs(60));
        let client = FearGreedClient::new(&feed_config(addr, Duration::from_secs(5)), cache.clone())
            .unwrap();

        let err = client.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, ref body } if body == "try later"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn slow_feed_times_out() {
        let addr = spawn(Router::new().route(
            "/data",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                FIXTURE
            }),
        ))
        .await;
        let client = FearGreedClient::new(
            &feed_config(addr, Duration::from_millis(100)),
            FeedCache::disabled(),
        )
        .unwrap();

        let err = client.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(100)));
    }
}
