//! Produtos API: REST backend for the Produto resource.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Produto, ProdutoInput, ProdutoPatch};
pub use routes::{common_routes, produto_routes};
pub use service::ProdutoService;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryProdutoStore, PgProdutoStore, ProdutoStore};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application router: common routes at the root, products under `/api/produtos`.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/produtos", produto_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
