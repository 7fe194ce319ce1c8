use axum::{Json, extract::Path, extract::State};
use axum_realty_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::agents::{CreateAgentRequest, UpdateAgentRequest},
    error::AppError,
    middleware::auth::AuthUser,
    routes::agents::{create_agent, delete_agent, update_agent},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Directory contract: duplicate emails are rejected with a 400-class error
// and never create a second record; deletes of unknown ids are 404s.
#[tokio::test]
async fn agent_directory_rejects_duplicates() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    let auth_admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    let auth_tenant = AuthUser {
        user_id: Uuid::new_v4(),
        role: "tenant".into(),
    };

    // Tenants cannot manage the agent directory.
    let refused = create_agent(
        State(state.clone()),
        auth_tenant,
        Json(agent_payload("blocked@example.com")),
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    let created = create_agent(
        State(state.clone()),
        auth_admin.clone(),
        Json(agent_payload("jane@example.com")),
    )
    .await?;
    let agent = created.0.data.unwrap();
    assert_eq!(agent.email, "jane@example.com");

    let duplicate = create_agent(
        State(state.clone()),
        auth_admin.clone(),
        Json(agent_payload("jane@example.com")),
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM agents WHERE email = $1")
        .bind("jane@example.com")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 1);

    // Partial update keeps unspecified fields.
    let updated = update_agent(
        State(state.clone()),
        auth_admin.clone(),
        Path(agent.id),
        Json(UpdateAgentRequest {
            name: None,
            phone: Some("555-0100".into()),
            agency: None,
            license_number: None,
            document_path: Some("/uploads/doc.pdf".into()),
        }),
    )
    .await?;
    let updated = updated.0.data.unwrap();
    assert_eq!(updated.name, agent.name);
    assert_eq!(updated.phone, "555-0100");
    assert_eq!(updated.document_path.as_deref(), Some("/uploads/doc.pdf"));

    delete_agent(State(state.clone()), auth_admin.clone(), Path(agent.id)).await?;
    let gone = delete_agent(State(state.clone()), auth_admin, Path(agent.id)).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    Ok(())
}

fn agent_payload(email: &str) -> CreateAgentRequest {
    CreateAgentRequest {
        name: "Jane Doe".into(),
        email: email.to_string(),
        phone: "555-0199".into(),
        agency: "Portside Realty".into(),
        license_number: Some("CA-4411".into()),
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE agents, tenants, landlords RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        config: AppConfig {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            upload_dir: "uploads".to_string(),
        },
    })
}
