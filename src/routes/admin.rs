use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::properties::PropertyList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Property,
    response::ApiResponse,
    routes::params::AdminPropertyQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_all_properties))
        .route("/properties/{id}/status", patch(update_property_status))
        .route("/overview", get(overview))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePropertyStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewStats {
    pub properties_total: i64,
    pub properties_pending: i64,
    pub properties_approved: i64,
    pub properties_featured: i64,
    pub users_total: i64,
    pub inquiries_total: i64,
}

#[utoipa::path(
    get,
    path = "/api/admin/properties",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Get all properties, any status (admin only)", body = ApiResponse<PropertyList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminPropertyQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = admin_service::list_all_properties(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/properties/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    request_body = UpdatePropertyStatusRequest,
    responses(
        (status = 200, description = "Update property status", body = ApiResponse<Property>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_property_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyStatusRequest>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = admin_service::update_property_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/overview",
    responses(
        (status = 200, description = "Marketplace totals for the admin dashboard", body = ApiResponse<OverviewStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OverviewStats>>> {
    let resp = admin_service::overview(&state, &user).await?;
    Ok(Json(resp))
}
