use axum::{
    Json,
    extract::{Multipart, State},
};
use std::path::Path;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::uploads::UploadResponse,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Listing photos and identity documents only.
const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
];

#[utoipa::path(
    post,
    path = "/api/uploads",
    responses(
        (status = 200, description = "Stored file", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file field, unsupported type or file too large"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        let extension = match ALLOWED_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
        {
            Some((_, ext)) => *ext,
            None => return Err(AppError::BadRequest("Unsupported file type".into())),
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest("File exceeds the 5MB limit".into()));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        let dest = Path::new(&state.config.upload_dir).join(&file_name);
        tokio::fs::write(&dest, &data)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        if let Err(err) = log_audit(
            &state.pool,
            Some(user.user_id),
            "upload_create",
            Some("uploads"),
            Some(serde_json::json!({ "file": file_name, "size": data.len() })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }

        let resp = UploadResponse {
            path: format!("/uploads/{file_name}"),
            original_name,
            content_type,
            size: data.len(),
        };
        return Ok(Json(ApiResponse::success(
            "File stored",
            resp,
            Some(Meta::empty()),
        )));
    }

    Err(AppError::BadRequest("Missing file field".into()))
}
