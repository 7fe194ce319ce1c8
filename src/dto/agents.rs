use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Agent;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub agency: String,
    pub license_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub agency: Option<String>,
    pub license_number: Option<String>,
    pub document_path: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentList {
    pub items: Vec<Agent>,
}
