use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pooling_core::{AdviceError, RouteAdvice, RouteQuery, RoutePoolingAdvisor};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    advisor: Arc<RoutePoolingAdvisor>,
}

impl AppState {
    pub fn new(advisor: RoutePoolingAdvisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
        }
    }
}

/// Error body returned for failed requests
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Message returned when no advice could be obtained. Collaborator errors stay in the log.
pub const UNAVAILABLE_MESSAGE: &str = "Could not get route suggestions. Please try again.";

/// Error type for HTTP server
#[derive(Debug)]
pub enum ApiError {
    Advice(AdviceError),
    /// The body is not a JSON route query at all.
    MalformedBody(JsonRejection),
}

impl From<AdviceError> for ApiError {
    fn from(err: AdviceError) -> Self {
        Self::Advice(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedBody(rejection) => {
                warn!(error = %rejection.body_text(), "Malformed route query body");
                let body = Json(ErrorResponse {
                    error: rejection.body_text(),
                    field: None,
                });
                (rejection.status(), body).into_response()
            }
            Self::Advice(AdviceError::Validation { field, reason }) => {
                warn!(field, %reason, "Rejected route query");
                let body = Json(ErrorResponse {
                    error: reason,
                    field: Some(field.to_string()),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            Self::Advice(AdviceError::ServiceUnavailable(reason)) => {
                error!(%reason, "Route suggestion unavailable");
                let body = Json(ErrorResponse {
                    error: UNAVAILABLE_MESSAGE.to_string(),
                    field: None,
                });
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
        }
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/route-optimization", post(handle_route_optimization))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(advisor: RoutePoolingAdvisor, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting HTTP server on {}", addr);

    let app = router(AppState::new(advisor));

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Route pooling advisor is running"
}

/// Handler for route optimization requests
async fn handle_route_optimization(
    State(state): State<AppState>,
    payload: Result<Json<RouteQuery>, JsonRejection>,
) -> Result<Json<RouteAdvice>, ApiError> {
    let Json(query) = payload.map_err(ApiError::MalformedBody)?;
    let advice = state.advisor.advise(&query).await?;
    Ok(Json(advice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use pooling_core::{GeminiClient, GeminiConfig, GeminiError, GeminiResult, TextGenerator};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedGenerator(Result<String, u16>);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate_json(&self, _prompt: &str, _schema: &Value) -> GeminiResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(status_code) => Err(GeminiError::HttpError {
                    status_code: *status_code,
                    message: "upstream failed".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn app(reply: Result<&str, u16>) -> Router {
        let generator = Arc::new(FixedGenerator(reply.map(str::to_string)));
        router(AppState::new(RoutePoolingAdvisor::new(generator)))
    }

    async fn post_query(app: Router, body: Value) -> (StatusCode, Value) {
        post_raw(app, body.to_string()).await
    }

    async fn post_raw(app: Router, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/route-optimization")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn query_json(start: &str) -> Value {
        json!({
            "currentRouteDescription": "A ride from Downtown to Airport",
            "startLocation": start,
            "endLocation": "Airport",
            "stops": ["Central Station", "North Mall"]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Ok("{}"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_suggestion_response() {
        let reply = r#"{"suggestedRouteModifications": "Add North Mall pickup", "expectedImpact": "+3 riders", "justification": "Mall traffic"}"#;
        let (status, body) = post_query(app(Ok(reply)), query_json("Downtown")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "suggestion");
        assert_eq!(body["suggestedRouteModifications"], "Add North Mall pickup");
        assert_eq!(body["expectedImpact"], "+3 riders");
        assert_eq!(body["justification"], "Mall traffic");
    }

    #[tokio::test]
    async fn test_no_suggestion_response() {
        let reply = r#"{"suggestedRouteModifications": null, "expectedImpact": "", "justification": "Already direct"}"#;
        let (status, body) = post_query(app(Ok(reply)), query_json("Downtown")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_suggestion");
        assert_eq!(body["justification"], "Already direct");
    }

    #[tokio::test]
    async fn test_validation_is_unprocessable() {
        let (status, body) = post_query(app(Ok("{}")), query_json("")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "startLocation");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_unavailable() {
        let (status, body) = post_query(app(Err(502)), query_json("Downtown")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_model_keeps_api_key_private() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: Some("SUPERSECRETKEY123".to_string()),
            base_url: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: Some(5),
            ..GeminiConfig::default()
        })
        .unwrap();
        let app = router(AppState::new(RoutePoolingAdvisor::new(Arc::new(client))));

        let (status, body) = post_query(app, query_json("Downtown")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.to_string().contains("SUPERSECRETKEY123"));
    }

    #[tokio::test]
    async fn test_missing_start_names_field() {
        let body = json!({"currentRouteDescription": "d", "endLocation": "Airport"});
        let (status, body) = post_query(app(Ok("{}")), body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "startLocation");
    }

    #[tokio::test]
    async fn test_null_end_names_field() {
        let body = json!({
            "currentRouteDescription": "d",
            "startLocation": "Downtown",
            "endLocation": null
        });
        let (status, body) = post_query(app(Ok("{}")), body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "endLocation");
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (status, body) = post_raw(app(Ok("{}")), "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_unavailable() {
        let (status, _) = post_query(app(Ok("not json at all")), query_json("Downtown")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
