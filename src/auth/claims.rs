use serde::{Deserialize, Serialize};

/// JWT payload used for session authentication.
///
/// The token binds to the user's email; ownership checks downstream always
/// resolve the email to the internal user id first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
