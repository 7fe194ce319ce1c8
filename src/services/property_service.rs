use uuid::Uuid;

use crate::dto::properties::{CreatePropertyRequest, PropertyList, UpdatePropertyRequest};
use crate::{
    audit::log_audit,
    entity::properties::{ActiveModel, Column, Entity as Properties, Model as PropertyModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::{Features, Location, Property},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, PropertyQuery, PropertySortBy, SortOrder},
    state::AppState,
};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub const PROPERTY_TYPES: [&str; 5] = ["house", "apartment", "condo", "land", "commercial"];
pub const LISTING_TYPES: [&str; 2] = ["sale", "rent"];

/// Statuses shown to unauthenticated visitors. Pending listings stay hidden
/// until an admin approves them.
const PUBLIC_STATUSES: [&str; 2] = ["approved", "featured"];

pub async fn list_properties(
    state: &AppState,
    query: PropertyQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(Column::Status.is_in(PUBLIC_STATUSES));

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Title).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(city) = query.city.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", city);
        condition = condition.add(Expr::col(Column::City).ilike(pattern));
    }

    if let Some(property_type) = query.property_type.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::PropertyType.eq(property_type.clone()));
    }

    if let Some(listing_type) = query.listing_type.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::ListingType.eq(listing_type.clone()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(bedrooms) = query.bedrooms {
        condition = condition.add(Column::Bedrooms.gte(bedrooms));
    }

    let sort_by = query.sort_by.unwrap_or(PropertySortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        PropertySortBy::CreatedAt => Column::CreatedAt,
        PropertySortBy::Price => Column::Price,
        PropertySortBy::Views => Column::Views,
    };

    let mut finder = Properties::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
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

/// Fetch a listing and bump its view counter in one statement, so two
/// concurrent reads never lose an increment.
pub async fn get_property(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Property>> {
    let result = sqlx::query_as::<_, Property>(
        "UPDATE properties SET views = views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;

    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Property", result, None))
}

pub async fn list_my_properties(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PropertyList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Properties::find()
        .filter(Column::OwnerId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt);

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
    Ok(ApiResponse::success("My properties", data, Some(meta)))
}

pub async fn create_property(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePropertyRequest,
) -> AppResult<ApiResponse<Property>> {
    ensure_any_role(user, &["landlord", "agent", "admin"])?;
    validate_property_type(&payload.property_type)?;
    validate_listing_type(&payload.listing_type)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        title: Set(payload.title),
        description: Set(payload.description),
        property_type: Set(payload.property_type),
        listing_type: Set(payload.listing_type),
        price: Set(payload.price),
        address: Set(payload.location.address),
        city: Set(payload.location.city),
        state: Set(payload.location.state),
        postal_code: Set(payload.location.postal_code),
        bedrooms: Set(payload.features.bedrooms),
        bathrooms: Set(payload.features.bathrooms),
        area_sqft: Set(payload.features.area_sqft),
        year_built: Set(payload.features.year_built),
        amenities: Set(payload.amenities),
        images: Set(payload.images),
        status: Set("pending".to_string()),
        owner_id: Set(user.user_id),
        views: NotSet,
        favorites: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    };
    let property = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "property_create",
        Some("properties"),
        Some(serde_json::json!({ "property_id": property.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Property created",
        property_from_entity(property),
        Some(Meta::empty()),
    ))
}

pub async fn update_property(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePropertyRequest,
) -> AppResult<ApiResponse<Property>> {
    let existing = Properties::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    ensure_owner_or_admin(user, existing.owner_id)?;

    if let Some(property_type) = payload.property_type.as_deref() {
        validate_property_type(property_type)?;
    }
    if let Some(listing_type) = payload.listing_type.as_deref() {
        validate_listing_type(listing_type)?;
    }
    if payload.price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(property_type) = payload.property_type {
        active.property_type = Set(property_type);
    }
    if let Some(listing_type) = payload.listing_type {
        active.listing_type = Set(listing_type);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(location) = payload.location {
        active.address = Set(location.address);
        active.city = Set(location.city);
        active.state = Set(location.state);
        active.postal_code = Set(location.postal_code);
    }
    if let Some(features) = payload.features {
        active.bedrooms = Set(features.bedrooms);
        active.bathrooms = Set(features.bathrooms);
        active.area_sqft = Set(features.area_sqft);
        active.year_built = Set(features.year_built);
    }
    if let Some(amenities) = payload.amenities {
        active.amenities = Set(amenities);
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    active.updated_at = Set(Utc::now().into());

    let property = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "property_update",
        Some("properties"),
        Some(serde_json::json!({ "property_id": property.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        property_from_entity(property),
        Some(Meta::empty()),
    ))
}

pub async fn delete_property(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Properties::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    ensure_owner_or_admin(user, existing.owner_id)?;

    Properties::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "property_delete",
        Some("properties"),
        Some(serde_json::json!({ "property_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn ensure_owner_or_admin(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.role != "admin" && owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn validate_property_type(property_type: &str) -> Result<(), AppError> {
    if PROPERTY_TYPES.contains(&property_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid property type".into()))
    }
}

fn validate_listing_type(listing_type: &str) -> Result<(), AppError> {
    if LISTING_TYPES.contains(&listing_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid listing type".into()))
    }
}

pub(crate) fn property_from_entity(model: PropertyModel) -> Property {
    Property {
        id: model.id,
        title: model.title,
        description: model.description,
        property_type: model.property_type,
        listing_type: model.listing_type,
        price: model.price,
        location: Location {
            address: model.address,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
        },
        features: Features {
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            area_sqft: model.area_sqft,
            year_built: model.year_built,
        },
        amenities: model.amenities,
        images: model.images,
        status: model.status,
        owner_id: model.owner_id,
        views: model.views,
        favorites: model.favorites,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
