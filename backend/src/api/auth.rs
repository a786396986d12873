use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{extract::State, Json};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::{create_token, AuthUser},
    error::{AppError, Result},
    models::user::{LoginRequest, LoginResponse, User, UserProfile},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, password_hash, role,
               employee_id, is_active, created_at
        FROM users
        WHERE email = $1 AND is_active = true
        "#,
    )
    .bind(&req.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid stored hash")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| {
            tracing::warn!(email = %req.email, "Login failed: wrong password");
            AppError::Unauthorized
        })?;

    let token = create_token(user.id, user.role.clone(), &state.jwt_secret, state.jwt_expiry_hours)
        .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

pub async fn me(State(pool): State<PgPool>, auth: AuthUser) -> Result<Json<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, email, first_name, last_name, role, employee_id, is_active
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(auth.id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(profile))
}
