pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;
pub mod validate;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::account_routes()
}
