//! Cross-cutting decorators around [`AccountService`].
//!
//! Both wrappers implement the service trait itself and hold the next
//! element of the chain, so they compose by construction rather than by
//! inheritance. `service::new` applies them in a fixed order.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::model::Account;
use crate::accounts::service::{AccountService, CreatedAccount};
use crate::error::AccountError;

/// Logs every call on exit: method name, key arguments (never the raw
/// password fields) and whether an error came back.
pub struct LoggingAccountService {
    inner: Arc<dyn AccountService>,
}

impl LoggingAccountService {
    pub fn new(inner: Arc<dyn AccountService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AccountService for LoggingAccountService {
    async fn create_user(&self, account: Account) -> Result<CreatedAccount, AccountError> {
        let username = account.username.clone();
        let email = account.email.clone();
        let result = self.inner.create_user(account).await;
        match &result {
            Ok(created) => info!(
                method = "create_user",
                %username,
                %email,
                user_id = %created.account.id,
                welcome_email_enqueued = created.welcome_email_enqueued,
                "call completed"
            ),
            Err(err) => warn!(
                method = "create_user",
                %username,
                %email,
                error = %err,
                "call failed"
            ),
        }
        result
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
        let result = self.inner.get_user_by_id(id).await;
        match &result {
            Ok(_) => info!(method = "get_user_by_id", %id, "call completed"),
            Err(err) => warn!(method = "get_user_by_id", %id, error = %err, "call failed"),
        }
        result
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Account, AccountError> {
        let result = self.inner.get_user_by_username(username).await;
        match &result {
            Ok(_) => info!(method = "get_user_by_username", username, "call completed"),
            Err(err) => {
                warn!(method = "get_user_by_username", username, error = %err, "call failed")
            }
        }
        result
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Account, AccountError> {
        let result = self.inner.get_user_by_email(email).await;
        match &result {
            Ok(_) => info!(method = "get_user_by_email", email, "call completed"),
            Err(err) => warn!(method = "get_user_by_email", email, error = %err, "call failed"),
        }
        result
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        let result = self.inner.log_in(username, password).await;
        match &result {
            Ok(account) => {
                info!(method = "log_in", username, user_id = %account.id, "call completed")
            }
            Err(err) => warn!(method = "log_in", username, error = %err, "call failed"),
        }
        result
    }
}

const REQUESTS_TOTAL: &str = "accounts_requests_total";
const SUCCEEDED_TOTAL: &str = "accounts_requests_succeeded_total";
const FAILED_TOTAL: &str = "accounts_requests_failed_total";

/// Counts one attempt before calling through and exactly one of
/// succeeded/failed afterwards, labelled per operation.
pub struct InstrumentingAccountService {
    inner: Arc<dyn AccountService>,
}

impl InstrumentingAccountService {
    pub fn new(inner: Arc<dyn AccountService>) -> Self {
        Self { inner }
    }
}

fn observe<T>(op: &'static str, result: Result<T, AccountError>) -> Result<T, AccountError> {
    match &result {
        Ok(_) => counter!(SUCCEEDED_TOTAL, "op" => op).increment(1),
        Err(_) => counter!(FAILED_TOTAL, "op" => op).increment(1),
    }
    result
}

#[async_trait]
impl AccountService for InstrumentingAccountService {
    async fn create_user(&self, account: Account) -> Result<CreatedAccount, AccountError> {
        counter!(REQUESTS_TOTAL, "op" => "create_user").increment(1);
        observe("create_user", self.inner.create_user(account).await)
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
        counter!(REQUESTS_TOTAL, "op" => "get_user_by_id").increment(1);
        observe("get_user_by_id", self.inner.get_user_by_id(id).await)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Account, AccountError> {
        counter!(REQUESTS_TOTAL, "op" => "get_user_by_username").increment(1);
        observe(
            "get_user_by_username",
            self.inner.get_user_by_username(username).await,
        )
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Account, AccountError> {
        counter!(REQUESTS_TOTAL, "op" => "get_user_by_email").increment(1);
        observe(
            "get_user_by_email",
            self.inner.get_user_by_email(email).await,
        )
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        counter!(REQUESTS_TOTAL, "op" => "log_in").increment(1);
        observe("log_in", self.inner.log_in(username, password).await)
    }
}
