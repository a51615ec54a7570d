use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::router()
}
