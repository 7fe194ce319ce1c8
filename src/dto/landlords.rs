use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Landlord;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLandlordRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub company: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLandlordRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LandlordList {
    pub items: Vec<Landlord>,
}
