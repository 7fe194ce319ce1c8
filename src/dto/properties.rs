use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Features, Location, Property};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub listing_type: String,
    pub price: i64,
    pub location: Location,
    pub features: Features,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub price: Option<i64>,
    pub location: Option<Location>,
    pub features: Option<Features>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyList {
    pub items: Vec<Property>,
}
