use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::favorites::{AddFavoriteRequest, FavoritePropertyList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, Property},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

pub async fn list_favorites(
    db: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoritePropertyList>> {
    let (page, limit, offset) = pagination.normalize();
    let properties = sqlx::query_as::<_, Property>(
        r#"
        SELECT p.*
        FROM favorites f
        JOIN properties p ON p.id = f.property_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(db)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = FavoritePropertyList { items: properties };
    Ok(ApiResponse::success("OK", data, Some(meta)))
}

/// Insert and bump the denormalized counter in one transaction. The unique
/// (user_id, property_id) index makes the insert the only arbiter, so the
/// counter moves exactly once per pair even under concurrent requests.
pub async fn add_favorite(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let property_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM properties WHERE id = $1")
        .bind(payload.property_id)
        .fetch_optional(pool)
        .await?;

    if property_exists.is_none() {
        return Err(AppError::BadRequest("Property not found".into()));
    }

    let mut tx = pool.begin().await?;

    let inserted: Option<Favorite> = sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (id, user_id, property_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, property_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.property_id)
    .fetch_optional(&mut *tx)
    .await?;

    let favorite = match inserted {
        Some(fav) => fav,
        None => {
            return Err(AppError::BadRequest(
                "Property is already in favorites".into(),
            ));
        }
    };

    sqlx::query("UPDATE properties SET favorites = favorites + 1 WHERE id = $1")
        .bind(payload.property_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "favorite_add",
        Some("favorites"),
        Some(serde_json::json!({ "property_id": payload.property_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    pool: &DbPool,
    user: &AuthUser,
    property_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND property_id = $2")
        .bind(user.user_id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    sqlx::query("UPDATE properties SET favorites = GREATEST(favorites - 1, 0) WHERE id = $1")
        .bind(property_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "property_id": property_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
