use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Property;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub property_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoritePropertyList {
    pub items: Vec<Property>,
}
