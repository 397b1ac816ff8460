use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use sortable_common::{error::Error, reindexer::PositionReindexer, resource::ResourceRegistry};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{cors::Any, trace::TraceLayer};
use tracing::{error, info};

use crate::handlers::{create_record, list_records, update_position};

#[derive(Debug, Clone)]
pub struct ContextData {
    pub reindexer: PositionReindexer,
    pub resources: Arc<ResourceRegistry>,
    /// Prefix every route is mounted under, without a trailing slash.
    pub base_path: Arc<str>,
}

impl ContextData {
    pub fn new(
        reindexer: PositionReindexer,
        resources: ResourceRegistry,
        base_path: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            reindexer,
            resources: Arc::new(resources),
            base_path: normalize_base_path(base_path)?.into(),
        })
    }

    /// Path the rows of `resource` are listed at.
    pub fn collection_path(&self, resource: &str) -> String {
        format!("{}/{}", self.base_path, urlencoding::encode(resource))
    }
}

fn normalize_base_path(base_path: &str) -> Result<String, Error> {
    let trimmed = base_path.trim().trim_end_matches('/');

    if !trimmed.is_empty() && !trimmed.starts_with('/') {
        return Err(Error::Config(format!(
            "base path '{base_path}' must start with '/'"
        )));
    }

    Ok(trimmed.to_string())
}

/// Builds the application router.
pub fn router(ctx: ContextData) -> Router {
    let base_path = ctx.base_path.clone();

    let routes = Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}/sorting/update_position",
            post(update_position),
        )
        .with_state(ctx);

    if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&base_path, routes)
    }
}

pub struct HttpServer {
    ctx: ContextData,
    listen_addr: SocketAddr,
}

impl HttpServer {
    pub fn new(ctx: ContextData, listen_addr: &str) -> Result<Self, Error> {
        let listen_addr: SocketAddr = listen_addr.parse().map_err(|e| {
            Error::Config(format!(
                "Failed to parse listen address for HTTP server: {}",
                e
            ))
        })?;

        Ok(Self { ctx, listen_addr })
    }

    pub async fn serve(&self) -> Result<JoinHandle<()>, Error> {
        let listener = TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| Error::Internal(format!("Failed to bind HTTP listener: {e}")))?;

        let listen_addr = self.listen_addr;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(Any);

        let app = router(self.ctx.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        let handle = tokio::spawn(async move {
            info!("HTTP server listening on http://{}", listen_addr);

            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                error!("HTTP server encountered an error: {}", e);
            } else {
                info!("HTTP server stopped gracefully.");
            }
        });

        Ok(handle)
    }
}
