use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::landlords::{CreateLandlordRequest, LandlordList, UpdateLandlordRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Landlord,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const WRITE_ROLES: [&str; 2] = ["landlord", "admin"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_landlords).post(create_landlord))
        .route(
            "/{id}",
            axum::routing::get(get_landlord)
                .put(update_landlord)
                .delete(delete_landlord),
        )
}

#[utoipa::path(
    get,
    path = "/api/landlords",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List landlords", body = ApiResponse<LandlordList>)
    ),
    tag = "Landlords"
)]
pub async fn list_landlords(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<LandlordList>>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Landlord>(
        "SELECT * FROM landlords ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM landlords")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = LandlordList { items };
    Ok(Json(ApiResponse::success("Landlords", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/landlords/{id}",
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    responses(
        (status = 200, description = "Get landlord", body = ApiResponse<Landlord>),
        (status = 404, description = "Landlord not found"),
    ),
    tag = "Landlords"
)]
pub async fn get_landlord(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Landlord>>> {
    let result = sqlx::query_as::<_, Landlord>("SELECT * FROM landlords WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Landlord", result, None)))
}

#[utoipa::path(
    post,
    path = "/api/landlords",
    request_body = CreateLandlordRequest,
    responses(
        (status = 200, description = "Create landlord", body = ApiResponse<Landlord>),
        (status = 400, description = "Duplicate email"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Landlords"
)]
pub async fn create_landlord(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLandlordRequest>,
) -> AppResult<Json<ApiResponse<Landlord>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM landlords WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".into()));
    }

    let id = Uuid::new_v4();
    let landlord = sqlx::query_as::<_, Landlord>(
        r#"
        INSERT INTO landlords (id, name, email, phone, company)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.company)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "landlord_create",
        Some("landlords"),
        Some(serde_json::json!({ "landlord_id": landlord.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Landlord created",
        landlord,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/landlords/{id}",
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    request_body = UpdateLandlordRequest,
    responses(
        (status = 200, description = "Updated landlord", body = ApiResponse<Landlord>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Landlord not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Landlords"
)]
pub async fn update_landlord(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLandlordRequest>,
) -> AppResult<Json<ApiResponse<Landlord>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let existing = sqlx::query_as::<_, Landlord>("SELECT * FROM landlords WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let phone = payload.phone.unwrap_or(existing.phone);
    let company = payload.company.or(existing.company);

    let landlord = sqlx::query_as::<_, Landlord>(
        r#"
        UPDATE landlords
        SET name = $2, phone = $3, company = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(company)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "landlord_update",
        Some("landlords"),
        Some(serde_json::json!({ "landlord_id": landlord.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Updated",
        landlord,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/landlords/{id}",
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    responses(
        (status = 200, description = "Deleted landlord"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Landlord not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Landlords"
)]
pub async fn delete_landlord(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let result = sqlx::query("DELETE FROM landlords WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "landlord_delete",
        Some("landlords"),
        Some(serde_json::json!({ "landlord_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
