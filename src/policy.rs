//! Authorization rules shared by every mutation endpoint.
//!
//! Ownership is decided against the resolved internal user id, never the
//! token email, so renumbering or re-keying identities cannot orphan a
//! resource. Callers must check resource existence first: a missing id is
//! always `NotFound`, never `Forbidden`.

use uuid::Uuid;

use crate::error::ApiError;
use crate::users::repo::{Role, User};

pub fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

pub fn can_mutate(user: &User, owner_id: Uuid) -> bool {
    user.id == owner_id
}

/// Composite rule for owner-scoped routes: admins may touch anything,
/// everyone else only their own records.
pub fn authorize_mutation(user: &User, owner_id: Uuid) -> Result<(), ApiError> {
    if is_admin(user) || can_mutate(user, owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden: Not your resource"))
    }
}

/// Strict admin gate for management routes. Ownership is not a substitute.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden: Admin only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::UserStatus;
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
    fn owner_may_mutate_own_resource() {
        let owner = user_with_role(Role::User);
        assert!(authorize_mutation(&owner, owner.id).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let stranger = user_with_role(Role::User);
        let err = authorize_mutation(&stranger, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn admin_overrides_ownership() {
        let admin = user_with_role(Role::Admin);
        assert!(authorize_mutation(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn require_admin_rejects_plain_owner() {
        let owner = user_with_role(Role::User);
        let err = require_admin(&owner).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(require_admin(&user_with_role(Role::Admin)).is_ok());
    }
}
