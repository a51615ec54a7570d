use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo::{Role, User};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Registration body. The frontend sends the plaintext secret in a field
/// named `passwordHash`; the name is historical and kept for compatibility.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "passwordHash")]
    pub password: String,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
    pub blood_group: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}
