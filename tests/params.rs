use axum_realty_api::routes::params::Pagination;
use axum_realty_api::services::auth_service::new_investor_token;

#[test]
fn pagination_defaults_and_clamping() {
    let default = Pagination {
        page: None,
        per_page: None,
    };
    assert_eq!(default.normalize(), (1, 20, 0));

    let second_page = Pagination {
        page: Some(2),
        per_page: Some(50),
    };
    assert_eq!(second_page.normalize(), (2, 50, 50));

    // Out-of-range values are pulled back into bounds instead of erroring.
    let wild = Pagination {
        page: Some(-3),
        per_page: Some(10_000),
    };
    assert_eq!(wild.normalize(), (1, 100, 0));
}

#[test]
fn investor_tokens_are_display_identifiers() {
    let token = new_investor_token();
    assert!(token.starts_with("INV-"));
    assert_eq!(token.len(), "INV-".len() + 12);
    assert!(
        token["INV-".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
    );

    // Two signups never share a token.
    assert_ne!(token, new_investor_token());
}
