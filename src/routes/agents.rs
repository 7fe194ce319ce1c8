use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::agents::{AgentList, CreateAgentRequest, UpdateAgentRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Agent,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_agents).post(create_agent))
        .route(
            "/{id}",
            axum::routing::get(get_agent)
                .put(update_agent)
                .delete(delete_agent),
        )
}

#[utoipa::path(
    get,
    path = "/api/agents",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List agents", body = ApiResponse<AgentList>)
    ),
    tag = "Agents"
)]
pub async fn list_agents(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<AgentList>>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Agent>(
        "SELECT * FROM agents ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM agents")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = AgentList { items };
    Ok(Json(ApiResponse::success("Agents", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/agents/{id}",
    params(
        ("id" = Uuid, Path, description = "Agent ID")
    ),
    responses(
        (status = 200, description = "Get agent", body = ApiResponse<Agent>),
        (status = 404, description = "Agent not found"),
    ),
    tag = "Agents"
)]
pub async fn get_agent(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Agent>>> {
    let result = sqlx::query_as::<_, Agent>("SELECT * FROM agents WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Agent", result, None)))
}

#[utoipa::path(
    post,
    path = "/api/agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 200, description = "Create agent", body = ApiResponse<Agent>),
        (status = 400, description = "Duplicate email"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Agents"
)]
pub async fn create_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAgentRequest>,
) -> AppResult<Json<ApiResponse<Agent>>> {
    ensure_any_role(&user, &["agent", "admin"])?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM agents WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".into()));
    }

    let id = Uuid::new_v4();
    let agent = sqlx::query_as::<_, Agent>(
        r#"
        INSERT INTO agents (id, name, email, phone, agency, license_number)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.agency)
    .bind(payload.license_number)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "agent_create",
        Some("agents"),
        Some(serde_json::json!({ "agent_id": agent.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Agent created",
        agent,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/agents/{id}",
    params(
        ("id" = Uuid, Path, description = "Agent ID")
    ),
    request_body = UpdateAgentRequest,
    responses(
        (status = 200, description = "Updated agent", body = ApiResponse<Agent>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Agent not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Agents"
)]
pub async fn update_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAgentRequest>,
) -> AppResult<Json<ApiResponse<Agent>>> {
    ensure_any_role(&user, &["agent", "admin"])?;

    let existing = sqlx::query_as::<_, Agent>("SELECT * FROM agents WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let phone = payload.phone.unwrap_or(existing.phone);
    let agency = payload.agency.unwrap_or(existing.agency);
    let license_number = payload.license_number.or(existing.license_number);
    let document_path = payload.document_path.or(existing.document_path);

    let agent = sqlx::query_as::<_, Agent>(
        r#"
        UPDATE agents
        SET name = $2, phone = $3, agency = $4, license_number = $5, document_path = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(agency)
    .bind(license_number)
    .bind(document_path)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "agent_update",
        Some("agents"),
        Some(serde_json::json!({ "agent_id": agent.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Updated",
        agent,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/agents/{id}",
    params(
        ("id" = Uuid, Path, description = "Agent ID")
    ),
    responses(
        (status = 200, description = "Deleted agent"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Agent not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Agents"
)]
pub async fn delete_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_any_role(&user, &["agent", "admin"])?;

    let result = sqlx::query("DELETE FROM agents WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "agent_delete",
        Some("agents"),
        Some(serde_json::json!({ "agent_id": id })),
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
