//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::{middleware as axum_middleware, Router};

use crate::db::DbPool;

pub use routes::create_router;

/// Full application: `/api` routes with request logging and security
/// headers, bound to `pool`
pub fn app(pool: DbPool) -> Router {
    let router = Router::new()
        .nest("/api", create_router())
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    middleware::with_security_headers(router).with_state(pool)
}
