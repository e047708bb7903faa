//! HTTP surface for route planning

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::RouteError;
use crate::geocoding::GeocodingProvider;
use crate::planner::{RoutePlan, RoutePlanner, RouteRequest};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: RoutePlan,
    pub route: Vec<String>,
    pub total_distance: String,
    pub total_cost: String,
    pub geojson: Value,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: RouteError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
}

pub fn router<P: GeocodingProvider + 'static>(planner: Arc<RoutePlanner<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/route", post(plan_route::<P>))
        .with_state(planner)
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors),
        )
}

async fn health() -> &'static str {
    "ok"
}

async fn plan_route<P: GeocodingProvider + 'static>(
    State(planner): State<Arc<RoutePlanner<P>>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = planner.plan(&request).await.map_err(|e| {
        tracing::warn!("Route request failed: {}", e);
        error_response(e)
    })?;

    let route = plan.route_names().into_iter().map(String::from).collect();
    Ok(Json(PlanResponse {
        route,
        total_distance: plan.summary.format_distance(),
        total_cost: format!("{:.2}", plan.summary.total_cost),
        geojson: plan.route_map().to_geojson(),
        plan,
    }))
}

pub async fn run<P: GeocodingProvider + 'static>(
    port: u16,
    planner: Arc<RoutePlanner<P>>,
) -> Result<()> {
    let app = router(planner);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app)
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedProvider;

    #[async_trait]
    impl GeocodingProvider for FixedProvider {
        async fn search(&self, text: &str, _credential: &str) -> crate::Result<Vec<Coordinate>> {
            Ok(match text {
                "Katraj" => vec![Coordinate::new(18.4575, 73.8580)],
                "Hadapsar" => vec![Coordinate::new(18.5000, 73.9300)],
                _ => Vec::new(),
            })
        }
    }

    fn app() -> Router {
        router(Arc::new(RoutePlanner::new(FixedProvider)))
    }

    async fn post_json(body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::post("/api/route")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_plan_route() {
        let (status, body) = post_json(serde_json::json!({
            "credential": "key",
            "locations": ["Katraj", "Hadapsar"],
            "traffic_level": 0.0
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], serde_json::json!(["Katraj", "Hadapsar", "Katraj"]));
        assert_eq!(body["plan"]["tour"], serde_json::json!([0, 1, 0]));
        assert_eq!(body["plan"]["statuses"][0]["status"], "found");
        assert_eq!(body["geojson"]["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_plan_route_rejects_single_location() {
        let (status, body) = post_json(serde_json::json!({
            "credential": "key",
            "locations": ["Katraj"]
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least 2 locations"));
    }
}
