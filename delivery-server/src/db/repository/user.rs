//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Validated registration data
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Already normalized (trimmed, lower-case)
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, first_name, last_name, phone, role, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Persist the profile fields of an already merged user
pub async fn update_profile(pool: &SqlitePool, user: &User) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET first_name = ?, last_name = ?, phone = ?, profile_image_url = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(&user.profile_image_url)
    .bind(now_millis())
    .bind(user.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {} not found", user.id)));
    }
    find_by_id(pool, user.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {} not found", user.id)))
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<()> {
    sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Change a user's role (provisioning admins is done out of band)
pub async fn set_role(pool: &SqlitePool, id: i64, role: Role) -> RepoResult<()> {
    sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
