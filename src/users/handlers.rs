use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::session::Session,
    error::ApiError,
    policy,
    state::AppState,
    users::{
        dto::{AdminUserPatch, IsAdminResponse, Pagination, ProfilePatch, UpdatedUserResponse},
        repo::{AdminChanges, ProfileChanges, User},
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:email", patch(update_profile))
        .route("/users/admin/:email", get(is_admin_check))
        .route("/admin/users/:id", patch(admin_update_user))
}

/// Resolve the session email to the stored user record. The session only
/// proves the email; everything else (id, role) comes from the store.
pub(crate) async fn current_user(db: &PgPool, session: &Session) -> Result<User, ApiError> {
    User::find_by_email(db, &session.email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Unauthorized: Unknown user"))
}

/// Profile routes are strictly self-service; admins change role/status
/// through their own endpoint.
fn ensure_self(session_email: &str, target_email: &str) -> Result<(), ApiError> {
    if session_email == target_email {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden: Not your profile"))
    }
}

/// Decision core for the admin user patch. Existence wins: a missing id
/// is 404 for every caller; only then does the strict admin gate run.
fn locate_user_for_admin(target: Option<User>, actor: &User) -> Result<User, ApiError> {
    let target = target.ok_or_else(|| ApiError::not_found("User not found"))?;
    policy::require_admin(actor)?;
    Ok(target)
}

#[instrument(skip(state, session, patch))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Path(email): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    if let Err(e) = ensure_self(&session.email, &email) {
        warn!(session_email = %session.email, target = %email, "profile update on foreign profile");
        return Err(e);
    }

    let address = patch.address.unwrap_or_default();
    let changes = ProfileChanges {
        name: patch.name,
        phone: patch.phone,
        blood_group: patch.blood_group,
        avatar_url: patch.avatar_url,
        district: address.district,
        upazila: address.upazila,
    };

    let matched = User::update_profile(&state.db, &email, &changes).await?;
    if matched == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UpdatedUserResponse {
        message: "Profile updated successfully".into(),
        user,
    }))
}

#[instrument(skip(state, session))]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<User>>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    policy::require_admin(&actor)?;
    let users = User::list_all(&state.db, p.limit, p.offset).await?;
    Ok(Json(users))
}

#[instrument(skip(state, _session))]
pub async fn is_admin_check(
    State(state): State<AppState>,
    _session: Session,
    Path(email): Path<String>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(IsAdminResponse {
        is_admin: policy::is_admin(&user),
    }))
}

#[instrument(skip(state, session, patch))]
pub async fn admin_update_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(patch): Json<AdminUserPatch>,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    let target = locate_user_for_admin(User::find_by_id(&state.db, id).await?, &actor)?;

    let changes = AdminChanges {
        role: patch.role,
        status: patch.status,
    };
    User::update_admin(&state.db, target.id, &changes).await?;

    let user = User::find_by_id(&state.db, target.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(admin_id = %actor.id, user_id = %user.id, "role/status updated");
    Ok(Json(UpdatedUserResponse {
        message: "User updated successfully".into(),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::{Role, UserStatus};
    use time::OffsetDateTime;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            name: "U".into(),
            phone: None,
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            avatar_url: None,
            blood_group: None,
            district: None,
            upazila: None,
            rating_sum: 0,
            rating_count: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn profile_update_is_strictly_self() {
        assert!(ensure_self("me@example.com", "me@example.com").is_ok());
        let err = ensure_self("me@example.com", "other@example.com").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn missing_target_user_is_not_found_for_every_caller() {
        let plain = user_with_role(Role::User);
        let admin = user_with_role(Role::Admin);
        assert!(matches!(
            locate_user_for_admin(None, &plain).unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            locate_user_for_admin(None, &admin).unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn admin_patch_requires_the_admin_role() {
        let plain = user_with_role(Role::User);
        let admin = user_with_role(Role::Admin);
        let target = user_with_role(Role::User);
        assert!(matches!(
            locate_user_for_admin(Some(target.clone()), &plain).unwrap_err(),
            ApiError::Forbidden(_)
        ));
        let found = locate_user_for_admin(Some(target.clone()), &admin).expect("admin");
        assert_eq!(found.id, target.id);
    }
}
