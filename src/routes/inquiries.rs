use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::inquiries::{CreateInquiryRequest, InquiryList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Inquiry,
    response::{ApiResponse, Meta},
    routes::params::InquiryListQuery,
    state::AppState,
};

/// Inquiries are submitted by anonymous visitors; reading and managing them
/// is staff work.
const READ_ROLES: [&str; 2] = ["agent", "admin"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_inquiries).post(create_inquiry))
        .route(
            "/{id}",
            axum::routing::get(get_inquiry).delete(delete_inquiry),
        )
}

#[utoipa::path(
    post,
    path = "/api/inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 200, description = "Create inquiry", body = ApiResponse<Inquiry>),
        (status = 400, description = "Missing fields or unknown property")
    ),
    tag = "Inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateInquiryRequest>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.message.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "name, email and message are required".into(),
        ));
    }

    if let Some(property_id) = payload.property_id {
        let property_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM properties WHERE id = $1")
                .bind(property_id)
                .fetch_optional(&state.pool)
                .await?;
        if property_exists.is_none() {
            return Err(AppError::BadRequest("Property not found".into()));
        }
    }

    let id = Uuid::new_v4();
    let inquiry = sqlx::query_as::<_, Inquiry>(
        r#"
        INSERT INTO inquiries (id, name, email, phone, message, property_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.message)
    .bind(payload.property_id)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "inquiry_create",
        Some("inquiries"),
        Some(serde_json::json!({ "inquiry_id": inquiry.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Inquiry received",
        inquiry,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/inquiries",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("property_id" = Option<Uuid>, Query, description = "Filter by property")
    ),
    responses(
        (status = 200, description = "List inquiries", body = ApiResponse<InquiryList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Inquiries"
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InquiryListQuery>,
) -> AppResult<Json<ApiResponse<InquiryList>>> {
    ensure_any_role(&user, &READ_ROLES)?;
    let (page, limit, offset) = query.pagination.normalize();

    let (items, total) = if let Some(property_id) = query.property_id {
        let items = sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT * FROM inquiries
            WHERE property_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(property_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT count(*) FROM inquiries WHERE property_id = $1")
                .bind(property_id)
                .fetch_one(&state.pool)
                .await?;
        (items, total.0)
    } else {
        let items = sqlx::query_as::<_, Inquiry>(
            "SELECT * FROM inquiries ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT count(*) FROM inquiries")
            .fetch_one(&state.pool)
            .await?;
        (items, total.0)
    };

    let meta = Meta::new(page, limit, total);
    let data = InquiryList { items };
    Ok(Json(ApiResponse::success("Inquiries", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Get inquiry", body = ApiResponse<Inquiry>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Inquiry not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inquiries"
)]
pub async fn get_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    ensure_any_role(&user, &READ_ROLES)?;

    let result = sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Inquiry", result, None)))
}

#[utoipa::path(
    delete,
    path = "/api/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Deleted inquiry"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Inquiry not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inquiries"
)]
pub async fn delete_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_any_role(&user, &READ_ROLES)?;

    let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inquiry_delete",
        Some("inquiries"),
        Some(serde_json::json!({ "inquiry_id": id })),
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
