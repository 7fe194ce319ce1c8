use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::properties::PropertyList,
    entity::{
        Inquiries, Users,
        properties::{ActiveModel as PropertyActive, Column as PropCol, Entity as Properties},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Property,
    response::{ApiResponse, Meta},
    routes::admin::{OverviewStats, UpdatePropertyStatusRequest},
    routes::params::{AdminPropertyQuery, SortOrder},
    services::property_service::property_from_entity,
    state::AppState,
};

pub const PROPERTY_STATUSES: [&str; 3] = ["pending", "approved", "featured"];

/// Moderation listing: every status is visible here, unlike the public list.
pub async fn list_all_properties(
    state: &AppState,
    user: &AuthUser,
    query: AdminPropertyQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(PropCol::Status.eq(status.clone()));
    }

    let mut finder = Properties::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(PropCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(PropCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(property_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = PropertyList { items };
    Ok(ApiResponse::success("Properties", data, Some(meta)))
}

pub async fn update_property_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePropertyStatusRequest,
) -> AppResult<ApiResponse<Property>> {
    ensure_admin(user)?;
    validate_property_status(&payload.status)?;

    let existing = Properties::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: PropertyActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let property = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "property_status_update",
        Some("properties"),
        Some(serde_json::json!({ "property_id": property.id, "status": property.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Property updated",
        property_from_entity(property),
        Some(Meta::empty()),
    ))
}

/// Dashboard counters for the admin overview page.
pub async fn overview(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OverviewStats>> {
    ensure_admin(user)?;

    let properties_total = Properties::find().count(&state.orm).await? as i64;
    let properties_pending = Properties::find()
        .filter(PropCol::Status.eq("pending"))
        .count(&state.orm)
        .await? as i64;
    let properties_approved = Properties::find()
        .filter(PropCol::Status.eq("approved"))
        .count(&state.orm)
        .await? as i64;
    let properties_featured = Properties::find()
        .filter(PropCol::Status.eq("featured"))
        .count(&state.orm)
        .await? as i64;
    let users_total = Users::find().count(&state.orm).await? as i64;
    let inquiries_total = Inquiries::find().count(&state.orm).await? as i64;

    let stats = OverviewStats {
        properties_total,
        properties_pending,
        properties_approved,
        properties_featured,
        users_total,
        inquiries_total,
    };

    Ok(ApiResponse::success("Overview", stats, Some(Meta::empty())))
}

fn validate_property_status(status: &str) -> Result<(), AppError> {
    if PROPERTY_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid property status".into()))
    }
}
