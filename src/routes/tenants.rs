use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::tenants::{CreateTenantRequest, TenantList, UpdateTenantRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Tenant,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const WRITE_ROLES: [&str; 3] = ["tenant", "agent", "admin"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_tenants).post(create_tenant))
        .route(
            "/{id}",
            axum::routing::get(get_tenant)
                .put(update_tenant)
                .delete(delete_tenant),
        )
}

#[utoipa::path(
    get,
    path = "/api/tenants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List tenants", body = ApiResponse<TenantList>)
    ),
    tag = "Tenants"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TenantList>>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Tenant>(
        "SELECT * FROM tenants ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM tenants")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = TenantList { items };
    Ok(Json(ApiResponse::success("Tenants", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Get tenant", body = ApiResponse<Tenant>),
        (status = 404, description = "Tenant not found"),
    ),
    tag = "Tenants"
)]
pub async fn get_tenant(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Tenant>>> {
    let result = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Tenant", result, None)))
}

#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 200, description = "Create tenant", body = ApiResponse<Tenant>),
        (status = 400, description = "Duplicate email"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTenantRequest>,
) -> AppResult<Json<ApiResponse<Tenant>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tenants WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".into()));
    }

    let id = Uuid::new_v4();
    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        INSERT INTO tenants (id, name, email, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tenant_create",
        Some("tenants"),
        Some(serde_json::json!({ "tenant_id": tenant.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Tenant created",
        tenant,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Updated tenant", body = ApiResponse<Tenant>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tenants"
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> AppResult<Json<ApiResponse<Tenant>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let existing = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let phone = payload.phone.unwrap_or(existing.phone);
    let document_path = payload.document_path.or(existing.document_path);

    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        UPDATE tenants
        SET name = $2, phone = $3, document_path = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(document_path)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tenant_update",
        Some("tenants"),
        Some(serde_json::json!({ "tenant_id": tenant.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Updated",
        tenant,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Deleted tenant"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tenants"
)]
pub async fn delete_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_any_role(&user, &WRITE_ROLES)?;

    let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tenant_delete",
        Some("tenants"),
        Some(serde_json::json!({ "tenant_id": id })),
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
