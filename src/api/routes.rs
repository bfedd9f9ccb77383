//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::error::AppError;
use crate::handlers::{
    CompanyWithTransfers, GetCompaniesWithRecentTransfersHandler, GetRecentMembershipsHandler,
    MembershipCreated, RecentMembership, RegisterCompanyMembershipHandler,
    RegisterMembershipCommand,
};

// =========================================================================
// API Router
// =========================================================================

/// Create the API router (mounted under `/api`)
pub fn create_router() -> Router<DbPool> {
    Router::new()
        .route("/health", get(health))
        .route("/companies/membership", post(register_membership))
        .route("/companies/recent-memberships", get(recent_memberships))
        .route(
            "/companies/with-recent-transfers",
            get(companies_with_recent_transfers),
        )
}

// =========================================================================
// GET /health
// =========================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// =========================================================================
// POST /companies/membership
// =========================================================================

/// Register a company and its membership request
async fn register_membership(
    State(pool): State<DbPool>,
    payload: Result<Json<RegisterMembershipCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<MembershipCreated>), AppError> {
    let Json(command) = payload?;
    let handler = RegisterCompanyMembershipHandler::from_pool(pool);

    let result = handler.execute(command).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

// =========================================================================
// GET /companies/recent-memberships
// =========================================================================

/// Memberships requested in the last 30 days
async fn recent_memberships(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<RecentMembership>>, AppError> {
    let handler = GetRecentMembershipsHandler::from_pool(pool);
    Ok(Json(handler.execute().await?))
}

// =========================================================================
// GET /companies/with-recent-transfers
// =========================================================================

/// Companies with TRANSFER activity in the last 30 days
async fn companies_with_recent_transfers(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<CompanyWithTransfers>>, AppError> {
    let handler = GetCompaniesWithRecentTransfersHandler::from_pool(pool);
    Ok(Json(handler.execute().await?))
}
