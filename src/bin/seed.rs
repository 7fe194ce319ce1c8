use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_realty_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let landlord_id = ensure_user(&pool, "landlord@example.com", "landlord123", "landlord").await?;
    let tenant_id = ensure_user(&pool, "tenant@example.com", "tenant123", "tenant").await?;
    seed_properties(&pool, landlord_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Landlord ID: {landlord_id}, Tenant ID: {tenant_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(email.split('@').next().unwrap_or("user"))
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_properties(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let listings = vec![
        (
            "Sunny two-bedroom apartment",
            "Bright apartment close to the waterfront",
            "apartment",
            "rent",
            185000_i64,
            ("12 Harbor Lane", "Portside", "CA", "90210"),
            (2, 1, 860),
            vec!["balcony", "parking"],
            "approved",
        ),
        (
            "Family house with garden",
            "Quiet street, renovated kitchen, large garden",
            "house",
            "sale",
            54900000_i64,
            ("48 Elm Street", "Maplewood", "NJ", "07040"),
            (4, 2, 2100),
            vec!["garden", "garage", "fireplace"],
            "featured",
        ),
        (
            "Downtown studio condo",
            "Compact condo next to the transit hub",
            "condo",
            "rent",
            120000_i64,
            ("301 Center Plaza", "Metro City", "NY", "10001"),
            (1, 1, 420),
            vec!["gym", "doorman"],
            "approved",
        ),
        (
            "Commercial corner lot",
            "Zoned for retail, high foot traffic",
            "commercial",
            "sale",
            89000000_i64,
            ("2 Market Square", "Portside", "CA", "90212"),
            (0, 0, 5200),
            vec![],
            "pending",
        ),
    ];

    for (title, desc, ptype, ltype, price, location, features, amenities, status) in listings {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM properties WHERE title = $1")
            .bind(title)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let (address, city, state, postal_code) = location;
        let (bedrooms, bathrooms, area_sqft) = features;
        let amenities: Vec<String> = amenities.into_iter().map(String::from).collect();

        sqlx::query(
            r#"
            INSERT INTO properties
                (id, title, description, property_type, listing_type, price,
                 address, city, state, postal_code,
                 bedrooms, bathrooms, area_sqft, amenities, status, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(desc)
        .bind(ptype)
        .bind(ltype)
        .bind(price)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(postal_code)
        .bind(bedrooms)
        .bind(bathrooms)
        .bind(area_sqft)
        .bind(amenities)
        .bind(status)
        .bind(owner_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded properties");
    Ok(())
}
