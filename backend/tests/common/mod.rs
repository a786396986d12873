#![allow(dead_code)]
use std::net::SocketAddr;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crewshift_backend::{api, AppState};

fn database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set; tests write and delete data")
}
pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
const JWT_EXPIRY_HOURS: u64 = 12;
pub const PASSWORD: &str = "testpass123";

/// Spin up a real Axum server on a random port, returning its address and the
/// database pool. Tests share one database; isolation comes from creating
/// unique employees and users per test and deleting them afterwards.
pub async fn setup_test_app() -> (SocketAddr, PgPool) {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url())
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: JWT_EXPIRY_HOURS,
        required_monthly_hours: None,
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, pool)
}

pub async fn create_test_employee(pool: &PgPool, name: &str, disabled: bool) -> Uuid {
    let id = Uuid::new_v4();
    let surname = format!("Test-{}", &id.to_string()[..8]);

    sqlx::query(
        "INSERT INTO employees (id, name, surname, position, has_disability_certificate) \
         VALUES ($1, $2, $3, 'driver', $4)",
    )
    .bind(id)
    .bind(name)
    .bind(&surname)
    .bind(disabled)
    .execute(pool)
    .await
    .expect("Failed to create test employee");

    id
}

/// Create a user with an Argon2-hashed [`PASSWORD`]. Returns the user id.
pub async fn create_test_user(
    pool: &PgPool,
    role: &str,
    email: &str,
    employee_id: Option<Uuid>,
    active: bool,
) -> Uuid {
    let user_id = Uuid::new_v4();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(PASSWORD.as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, email, password_hash, role, employee_id, is_active) \
         VALUES ($1, 'Test', 'User', $2, $3, $4::app_role, $5, $6)",
    )
    .bind(user_id)
    .bind(email)
    .bind(&hash)
    .bind(role)
    .bind(employee_id)
    .bind(active)
    .execute(pool)
    .await
    .expect("Failed to create test user");

    user_id
}

pub async fn absence_type_id(pool: &PgPool, code: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM absence_types WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .expect("Seeded absence type missing")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@test.local", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Log in via the HTTP API and return the JWT token.
pub async fn get_auth_token(addr: SocketAddr, email: &str) -> String {
    let resp = http_client()
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": PASSWORD,
        }))
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(resp.status(), 200, "Login should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("Response should contain token")
        .to_string()
}

/// A token signed with the test secret that expired an hour ago.
pub fn create_expired_token(user_id: Uuid) -> String {
    use crewshift_backend::auth::{Claims, Role};
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = time::OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        role: Role::Employee,
        exp: (now - time::Duration::hours(1)).unix_timestamp(),
        iat: (now - time::Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Remove test users and employees; schedule and work-card rows cascade.
pub async fn cleanup(pool: &PgPool, users: &[Uuid], employees: &[Uuid]) {
    let _ = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(users)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM employees WHERE id = ANY($1)")
        .bind(employees)
        .execute(pool)
        .await;
}
