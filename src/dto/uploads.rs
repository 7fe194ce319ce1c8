use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public path under which the stored file is served.
    pub path: String,
    pub original_name: String,
    pub content_type: String,
    pub size: usize,
}
