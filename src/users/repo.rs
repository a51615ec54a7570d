use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed role set. Anything outside it is rejected at the serde and
/// database layers alike.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

/// User record in the database. Email is unique and never changes after
/// registration; the uuid is what owned resources reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub avatar_url: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub rating_sum: i64,
    pub rating_count: i64,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, name, phone, password_hash, role, status, \
     avatar_url, blood_group, district, upazila, rating_sum, rating_count, created_at";

/// Fields a user may change on their own profile. Absent fields are left
/// untouched; present fields are written as given, empty strings included.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub avatar_url: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Fields only an admin may change.
#[derive(Debug, Default)]
pub struct AdminChanges {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: &PgPool, new: &NewUser) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, phone, password_hash, role,
                               avatar_url, blood_group, district, upazila)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.password_hash)
        .bind(new.role)
        .bind(&new.avatar_url)
        .bind(&new.blood_group)
        .bind(&new.district)
        .bind(&new.upazila)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Self-service partial profile update, keyed by email. Returns the
    /// number of rows matched so callers can tell "no such user" apart
    /// from success.
    pub async fn update_profile(
        db: &PgPool,
        email: &str,
        changes: &ProfileChanges,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name        = COALESCE($2, name),
                phone       = COALESCE($3, phone),
                blood_group = COALESCE($4, blood_group),
                avatar_url  = COALESCE($5, avatar_url),
                district    = COALESCE($6, district),
                upazila     = COALESCE($7, upazila)
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.blood_group)
        .bind(&changes.avatar_url)
        .bind(&changes.district)
        .bind(&changes.upazila)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Admin-only role/status update, keyed by id.
    pub async fn update_admin(
        db: &PgPool,
        id: Uuid,
        changes: &AdminChanges,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                role   = COALESCE($2, role),
                status = COALESCE($3, status)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.role)
        .bind(changes.status)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Full listing, newest first. A `None` limit binds as LIMIT NULL,
    /// which Postgres reads as LIMIT ALL.
    pub async fn list_all(
        db: &PgPool,
        limit: Option<i64>,
        offset: i64,
    ) -> sqlx::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
