use axum::extract::FromRequestParts;
use axum_realty_api::{error::AppError, middleware::auth::AuthUser};

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let request = axum::http::Request::builder()
        .uri("/api/favorites")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let request = axum::http::Request::builder()
        .uri("/api/favorites")
        .header("authorization", "Basic bG9sOm5vcGU=")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}
