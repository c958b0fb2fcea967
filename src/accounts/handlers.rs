use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    accounts::dto::{CreateAccountRequest, CreateAccountResponse, LoginRequest},
    accounts::model::Account,
    error::AccountError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/login", post(log_in))
        .route("/accounts/:id", get(get_by_id))
        .route("/accounts/username/:username", get(get_by_username))
        .route("/accounts/email/:email", get(get_by_email))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, AccountError> {
    let created = state.accounts.create_user(payload.into()).await?;
    Ok(Json(CreateAccountResponse {
        account: created.account,
        welcome_email_enqueued: created.welcome_email_enqueued,
    }))
}

#[instrument(skip(state, payload))]
pub async fn log_in(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Account>, AccountError> {
    let account = state
        .accounts
        .log_in(&payload.username, &payload.password)
        .await?;
    Ok(Json(account))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AccountError> {
    Ok(Json(state.accounts.get_user_by_id(id).await?))
}

#[instrument(skip(state))]
pub async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Account>, AccountError> {
    Ok(Json(state.accounts.get_user_by_username(&username).await?))
}

#[instrument(skip(state))]
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Account>, AccountError> {
    Ok(Json(state.accounts.get_user_by_email(&email).await?))
}
