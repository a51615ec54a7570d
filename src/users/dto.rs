use serde::{Deserialize, Serialize};

use crate::auth::dto::Address;
use crate::users::repo::{Role, User, UserStatus};

/// Self-service profile patch. A field absent from the body is left
/// untouched; a field that is present is written as given (empty strings
/// included). Unknown fields are rejected outright.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub avatar_url: Option<String>,
    pub address: Option<Address>,
}

/// Admin patch: role and status only.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminUserPatch {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

/// Opt-in pagination. Without query params the full result set comes
/// back; `limit` only caps the page when the client asks for one.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}
