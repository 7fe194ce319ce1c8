use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::properties::{CreatePropertyRequest, PropertyList, UpdatePropertyRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Property,
    response::ApiResponse,
    routes::params::{Pagination, PropertyQuery},
    services::property_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route("/mine", get(list_my_properties))
        .route(
            "/{id}",
            get(get_property).put(update_property).delete(delete_property),
        )
}

#[utoipa::path(
    get,
    path = "/api/properties",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in title and description"),
        ("city" = Option<String>, Query, description = "City substring filter"),
        ("property_type" = Option<String>, Query, description = "house, apartment, condo, land, commercial"),
        ("listing_type" = Option<String>, Query, description = "sale or rent"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
        ("bedrooms" = Option<i32>, Query, description = "Minimum bedrooms"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, views"),
        ("sort_order" = Option<String>, Query, description = "asc, desc")
    ),
    responses(
        (status = 200, description = "List published properties", body = ApiResponse<PropertyList>)
    ),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::list_properties(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List the caller's properties", body = ApiResponse<PropertyList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn list_my_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::list_my_properties(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Get property", body = ApiResponse<Property>),
        (status = 404, description = "Property not found"),
    ),
    tag = "Properties"
)]
pub async fn get_property(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::get_property(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 200, description = "Create property", body = ApiResponse<Property>),
        (status = 400, description = "Invalid type or price"),
        (status = 403, description = "Role not allowed to list properties")
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePropertyRequest>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::create_property(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Updated property", body = ApiResponse<Property>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::update_property(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Deleted property"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = property_service::delete_property(&state, &user, id).await?;
    Ok(Json(resp))
}
