//! # HTTP Surface
//!
//! Axum wiring for resource endpoints. Each resource mounts two routes,
//! `<base>` for the collection and `<base>/:id` for items; every method on
//! both routes flows into the dispatcher, so unsupported method/identifier
//! combinations produce the adapter's own 405 bodies rather than the
//! router's defaults.

pub mod config;

pub use config::ServerConfig;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collection::Collection;
use crate::resource::{Resource, ResourceRequest};

/// Build the router for one resource under the given base path
/// (e.g. `"/things"`).
pub fn router<C: Collection + 'static>(base_path: &str, resource: Arc<Resource<C>>) -> Router {
    let base = base_path.trim_end_matches('/').to_string();
    let item = format!("{}/:id", base);

    Router::new()
        .route(
            &base,
            get(collection_handler::<C>)
                .post(collection_handler::<C>)
                .put(collection_handler::<C>)
                .delete(collection_handler::<C>),
        )
        .route(
            &item,
            get(item_handler::<C>)
                .put(item_handler::<C>)
                .delete(item_handler::<C>)
                .post(item_handler::<C>),
        )
        .with_state(resource)
}

/// Collection-level requests: no identifier.
async fn collection_handler<C: Collection + 'static>(
    State(resource): State<Arc<Resource<C>>>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let req = ResourceRequest {
        method,
        id: None,
        query,
        headers,
        body: none_if_empty(body),
    };
    dispatch(&resource, req)
}

/// Item-level requests: identifier captured from the path.
async fn item_handler<C: Collection + 'static>(
    State(resource): State<Arc<Resource<C>>>,
    method: Method,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let req = ResourceRequest {
        method,
        id: Some(id),
        query,
        headers,
        body: none_if_empty(body),
    };
    dispatch(&resource, req)
}

fn dispatch<C: Collection>(resource: &Resource<C>, req: ResourceRequest) -> Response {
    match resource.dispatch(req) {
        Ok(resp) => resp.into_response(),
        Err(err) => err.into_response(),
    }
}

fn none_if_empty(body: String) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// HTTP server owning a composed router and its configuration.
pub struct ResourceServer {
    config: ServerConfig,
    router: Router,
}

impl ResourceServer {
    /// Wrap a router with the default configuration.
    pub fn new(router: Router) -> Self {
        Self::with_config(router, ServerConfig::default())
    }

    pub fn with_config(router: Router, config: ServerConfig) -> Self {
        Self { config, router }
    }

    /// Bind and serve until the task is cancelled.
    pub async fn serve(self) -> std::io::Result<()> {
        let cors = build_cors(&self.config);
        let app = self.router.layer(cors).layer(TraceLayer::new_for_http());

        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!(%addr, "resource server listening");
        axum::serve(listener, app).await
    }
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        // No origins configured: permissive, for development
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
