use axum::{extract::State, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::models::*;
use crate::topology;
use crate::AppState;

use super::ApiError;

/// Generate a synthetic topology, optionally loading it into the registry
pub async fn generate_topology(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateTopologyRequest>,
) -> Result<Json<Vec<Element>>, ApiError> {
    // A /8 pool holds ~16M addresses, so generation runs on the blocking pool
    let config = req.config.clone();
    let seed = req.seed;
    let elements = tokio::task::spawn_blocking(move || {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        topology::generate(&config, &mut rng)
    })
    .await
    .map_err(|e| ApiError::internal(format!("topology generation task failed: {}", e)))??;

    if req.load {
        let paths = state.store.bulk_upsert(elements.clone()).await?;
        tracing::info!(
            "Loaded {} generated elements for network '{}'",
            paths.len(),
            req.config.network_name
        );
    }

    Ok(Json(elements))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::store::ElementStore;
    use crate::AppState;

    async fn post(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/topology/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_generate_and_load() {
        let store = ElementStore::new();
        let state = Arc::new(AppState::new(store.clone(), Config::default()));
        let app = crate::router::build(state);

        let (status, body) = post(
            app,
            json!({
                "network_name": "corp",
                "cidr_block": "192.168.0.0/24",
                "routers": 1,
                "switches": 1,
                "seed": 7,
                "load": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["corp", "192.168.0.1", "192.168.0.255"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_generate_seeded_is_reproducible() {
        let request = json!({
            "network_name": "corp",
            "cidr_block": "10.0.0.0/24",
            "workstations_linux": 12,
            "iot": 4,
            "example_connections": true,
            "seed": 99
        });
        let app = crate::router::build(Arc::new(AppState::new(ElementStore::new(), Config::default())));
        let (_, first) = post(app.clone(), request.clone()).await;
        let (_, second) = post(app, request).await;
        assert_eq!(first.as_array().unwrap().len(), 1 + 16 + 2);
        // Timestamps may differ by a second between runs; compare everything else
        let strip = |v: &Value| -> Vec<Value> {
            v.as_array()
                .unwrap()
                .iter()
                .map(|e| {
                    let mut e = e.clone();
                    e["timestamp"] = Value::Null;
                    e
                })
                .collect()
        };
        assert_eq!(strip(&first), strip(&second));
    }

    #[tokio::test]
    async fn test_generate_rejects_oversized_request() {
        let store = ElementStore::new();
        let app = crate::router::build(Arc::new(AppState::new(store.clone(), Config::default())));
        let (status, body) = post(
            app,
            json!({
                "network_name": "tiny",
                "cidr_block": "10.0.0.0/30",
                "servers_linux": 4,
                "load": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("exhausted"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_cidr() {
        let app = crate::router::build(Arc::new(AppState::new(ElementStore::new(), Config::default())));
        let (status, _) = post(
            app,
            json!({ "network_name": "bad", "cidr_block": "192.168.0.1/24" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_rejects_reserved_network_name() {
        let store = ElementStore::new();
        let app = crate::router::build(Arc::new(AppState::new(store.clone(), Config::default())));
        let (status, body) = post(
            app,
            json!({
                "network_name": "10.0.0.1",
                "cidr_block": "10.0.0.0/24",
                "routers": 1,
                "load": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("reserved"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_generate_rejects_overflowing_counts() {
        let app = crate::router::build(Arc::new(AppState::new(ElementStore::new(), Config::default())));
        let (status, body) = post(
            app,
            json!({
                "network_name": "corp",
                "cidr_block": "10.0.0.0/24",
                "routers": u64::MAX,
                "switches": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("exhausted"));
    }
}
