use analytics::AnalyticsError;
use api_client::error::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Feed error: {0}")]
    Feed(#[from] ApiError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Feed(_) => StatusCode::BAD_GATEWAY,
            AppError::Analytics(
                AnalyticsError::EmptyAlignment(..)
                | AnalyticsError::InsufficientData { .. }
                | AnalyticsError::DegenerateSeries(_)
                | AnalyticsError::NoDataAvailable
                | AnalyticsError::Core(_),
            ) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Analytics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Feed(e) => tracing::error!(error = ?e, "Feed fetch failed."),
            AppError::Analytics(e) => tracing::warn!(error = ?e, "Could not build report."),
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
