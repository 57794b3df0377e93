pub mod search;

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::SecondsFormat;
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, warn};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api_index).fallback(not_found))
        .route("/health", get(api_health).fallback(not_found))
        .route("/search", post(search::api_search).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        // Panics inside a handler become a JSON 500
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        )
}

// --- Helpers ---

/// RFC 3339 UTC with millisecond precision.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `{error, message, timestamp}` with the given status.
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message,
            "timestamp": timestamp(),
        })),
    )
        .into_response()
}

fn configured(flag: bool) -> &'static str {
    if flag {
        "configured"
    } else {
        "missing"
    }
}

// --- Handlers ---

pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "Hunta Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "POST /search": "Search for second-hand items",
            "GET /health": "Health check",
            "GET /": "API information",
        },
        "timestamp": timestamp(),
    }))
}

/// Reports whether each outbound credential is configured, not whether the
/// service behind it is reachable.
pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp(),
        "services": {
            "scrapingbee": configured(state.scrapingbee_configured),
            "openai": configured(state.openai_configured),
        },
    }))
}

pub async fn not_found(method: Method, uri: Uri) -> Response {
    warn!(%method, path = uri.path(), "No route");
    error_response(
        StatusCode::NOT_FOUND,
        "Endpoint not found",
        &format!("{} {} is not a valid endpoint", method, uri.path()),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    error!(panic = %message, "Unhandled error");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", &message)
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hunta_common::SiteProfile;
    use hunta_scout::testing::{MockModel, MockProxy};
    use hunta_scout::{Extractor, Fetcher, SearchPipeline};
    use tower::ServiceExt;

    use super::*;

    /// State with no outbound credentials configured.
    pub(crate) fn unconfigured_state() -> Arc<AppState> {
        let site = SiteProfile::gumtree();
        Arc::new(AppState {
            pipeline: SearchPipeline::new(
                Fetcher::new(None, site.clone()),
                Extractor::new(None, site),
            ),
            scrapingbee_configured: false,
            openai_configured: false,
        })
    }

    pub(crate) fn mocked_state(proxy: &Arc<MockProxy>, model: &Arc<MockModel>) -> Arc<AppState> {
        Arc::new(AppState {
            pipeline: hunta_scout::testing::pipeline_with(proxy, model),
            scrapingbee_configured: true,
            openai_configured: true,
        })
    }

    pub(crate) async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn index_lists_endpoints() {
        let app = router(unconfigured_state());
        let req = Request::get("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Hunta Backend API");
        assert_eq!(body["status"], "running");
        assert!(body["endpoints"]["POST /search"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn health_reports_missing_credentials() {
        let app = router(unconfigured_state());
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["scrapingbee"], "missing");
        assert_eq!(body["services"]["openai"], "missing");
    }

    #[tokio::test]
    async fn health_reports_configured_credentials() {
        let proxy = Arc::new(MockProxy::returning(""));
        let model = Arc::new(MockModel::returning("[]"));
        let app = router(mocked_state(&proxy, &model));
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let body = body_json(app.oneshot(req).await.unwrap()).await;

        assert_eq!(body["services"]["scrapingbee"], "configured");
        assert_eq!(body["services"]["openai"], "configured");
        assert_eq!(proxy.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = router(unconfigured_state());
        let req = Request::delete("/listings/7").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Endpoint not found");
        assert_eq!(body["message"], "DELETE /listings/7 is not a valid endpoint");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn wrong_method_on_known_path_is_404() {
        let app = router(unconfigured_state());
        let req = Request::get("/search").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "GET /search is not a valid endpoint");
    }

    #[tokio::test]
    async fn handler_panic_is_json_500() {
        let app: Router = Router::new()
            .route("/boom", get(|| async { panic!("boom") as () }))
            .layer(CatchPanicLayer::custom(handle_panic));
        let req = Request::get("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "boom");
    }
}
