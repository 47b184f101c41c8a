//! Request timing middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::Metrics;

/// Route label for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Record every request in the duration histogram, labeled by method,
/// route template and the status actually returned. Requests that hit
/// the fallback share one route label so unknown paths stay bounded.
pub async fn track_request_duration(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |path| path.as_str().to_string());

    let response = next.run(request).await;

    metrics.observe_request(&method, &route, response.status().as_u16(), start.elapsed());
    response
}
