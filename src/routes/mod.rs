use axum::{Router, routing::post};

use crate::state::AppState;

pub mod admin;
pub mod agents;
pub mod auth;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod inquiries;
pub mod landlords;
pub mod params;
pub mod properties;
pub mod tenants;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/properties", properties::router())
        .nest("/agents", agents::router())
        .nest("/tenants", tenants::router())
        .nest("/landlords", landlords::router())
        .nest("/inquiries", inquiries::router())
        .nest("/favorites", favorites::router())
        .nest("/admin", admin::router())
        .route("/uploads", post(uploads::upload_file))
}
