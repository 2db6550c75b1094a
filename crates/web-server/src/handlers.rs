use crate::{AppState, error::AppError, page, pipeline};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// GET /
///
/// The dashboard. Falls back to a message page when the feed or the
/// analytics fail, so the page itself never errors.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    match pipeline::load_view(state.feed.as_ref(), &state.engine).await {
        Ok(view) => {
            let svg = state.chart.render(&view.report);
            Html(page::render_dashboard(&state.dashboard, &view, &svg)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Serving fallback dashboard.");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(page::render_fallback(&state.dashboard)),
            )
                .into_response()
        }
    }
}

/// GET /chart.svg
pub async fn chart_svg(State(state): State<Arc<AppState>>) -> Response {
    let (status, svg) = match pipeline::load_view(state.feed.as_ref(), &state.engine).await {
        Ok(view) => (StatusCode::OK, state.chart.render(&view.report)),
        Err(e) => {
            tracing::warn!(error = %e, "Serving fallback chart.");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                state.chart.render_fallback(&state.dashboard.fallback_message),
            )
        }
    };
    (status, [(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response()
}

/// GET /api/report
pub async fn get_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<pipeline::DashboardView>, AppError> {
    let view = pipeline::load_view(state.feed.as_ref(), &state.engine).await?;
    Ok(Json(view))
}

/// GET /api/health
pub async fn health() -> &'static str {
    "OK"
}
