use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::middleware::{InstrumentingAccountService, LoggingAccountService};
use crate::accounts::model::Account;
use crate::accounts::password;
use crate::accounts::repo::{AccountStore, UniqueField};
use crate::accounts::validate::validate_account;
use crate::error::AccountError;
use crate::notify::{welcome_message, NotificationQueue};

/// Outcome of a successful `create_user`.
///
/// Persistence and the welcome notification are separate concerns: the
/// account is durably committed even when the publish fails, and
/// `welcome_email_enqueued` makes that explicit instead of swallowing it.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub account: Account,
    pub welcome_email_enqueued: bool,
}

/// Account lifecycle operations.
///
/// Implementations hold no mutable shared state and are safe to call
/// concurrently; the decorators in `middleware` implement the same trait
/// and wrap an inner instance.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create_user(&self, account: Account) -> Result<CreatedAccount, AccountError>;
    async fn get_user_by_id(&self, id: Uuid) -> Result<Account, AccountError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Account, AccountError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Account, AccountError>;
    async fn log_in(&self, username: &str, password: &str) -> Result<Account, AccountError>;
}

/// Returns the basic service with the expected decorators wired in, in a
/// fixed order: instrumentation wraps logging wraps the basic service, so
/// the counters reflect logged calls 1:1.
pub fn new(
    store: Arc<dyn AccountStore>,
    queue: Arc<dyn NotificationQueue>,
    welcome_queue: String,
    hash_cost: u32,
) -> Arc<dyn AccountService> {
    let svc = BasicAccountService::new(store, queue, welcome_queue, hash_cost);
    let svc = LoggingAccountService::new(Arc::new(svc));
    Arc::new(InstrumentingAccountService::new(Arc::new(svc)))
}

/// Stateless orchestration of validator, uniqueness guard, credential
/// processing, store and notification queue.
pub struct BasicAccountService {
    store: Arc<dyn AccountStore>,
    queue: Arc<dyn NotificationQueue>,
    welcome_queue: String,
    hash_cost: u32,
}

impl BasicAccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        queue: Arc<dyn NotificationQueue>,
        welcome_queue: String,
        hash_cost: u32,
    ) -> Self {
        Self {
            store,
            queue,
            welcome_queue,
            hash_cost,
        }
    }
}

#[async_trait]
impl AccountService for BasicAccountService {
    async fn create_user(&self, account: Account) -> Result<CreatedAccount, AccountError> {
        if account.is_empty() {
            return Err(AccountError::NoAccountProvided);
        }

        validate_account(&account)?;

        // Fast-fail on the common case. This check-then-act sequence races
        // against concurrent signups; the storage unique constraint is the
        // enforcement boundary, this lookup only saves a hash + transaction
        // for the obvious duplicates.
        if self
            .store
            .exists(&account.username, UniqueField::Username)
            .await?
        {
            return Err(AccountError::AlreadyExists);
        }
        if self.store.exists(&account.email, UniqueField::Email).await? {
            return Err(AccountError::AlreadyExists);
        }

        let mut account = password::validate_and_hash(account, self.hash_cost).await?;
        account.id = Uuid::new_v4();

        self.store.create(&account).await?;
        info!(username = %account.username, user_id = %account.id, "account created");

        // Past this point the account is durable; the welcome email is
        // best-effort and a publish failure must not fail the call.
        let body = welcome_message(&account.first_name, &account.last_name);
        let welcome_email_enqueued = match self
            .queue
            .publish(&self.welcome_queue, body.as_bytes())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, user_id = %account.id, "welcome email publish failed");
                false
            }
        };

        Ok(CreatedAccount {
            account,
            welcome_email_enqueued,
        })
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
        self.store.find_by_id(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Account, AccountError> {
        self.store.find_by_username(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Account, AccountError> {
        self.store.find_by_email(email).await
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        if username.is_empty() {
            return Err(AccountError::NoUsernameProvided);
        }
        if password.is_empty() {
            return Err(AccountError::NoPasswordProvided);
        }

        // Security review item: InvalidUsername vs InvalidPassword lets a
        // caller probe which usernames exist. Kept as distinct kinds for
        // API compatibility.
        let account = match self.store.find_by_username(username).await {
            Ok(account) => account,
            Err(AccountError::NotFound) => return Err(AccountError::InvalidUsername),
            Err(e) => return Err(e),
        };

        if !password::verify(&account.password, password).await {
            return Err(AccountError::InvalidPassword);
        }

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::model::sample_account;
    use crate::accounts::password::MIN_HASH_COST;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryStore {
        rows: Mutex<HashMap<Uuid, Account>>,
    }

    impl InMemoryStore {
        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AccountStore for InMemoryStore {
        async fn create(&self, account: &Account) -> Result<(), AccountError> {
            let mut rows = self.rows.lock().unwrap();
            // Mirrors the unique indexes on username/email.
            if rows
                .values()
                .any(|a| a.username == account.username || a.email == account.email)
            {
                return Err(AccountError::AlreadyExists);
            }
            rows.insert(account.id, account.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
            self.rows
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(AccountError::NotFound)
        }

        async fn find_by_username(&self, username: &str) -> Result<Account, AccountError> {
            self.rows
                .lock()
                .unwrap()
                .values()
                .find(|a| a.username == username)
                .cloned()
                .ok_or(AccountError::NotFound)
        }

        async fn find_by_email(&self, email: &str) -> Result<Account, AccountError> {
            self.rows
                .lock()
                .unwrap()
                .values()
                .find(|a| a.email == email)
                .cloned()
                .ok_or(AccountError::NotFound)
        }

        async fn exists(&self, value: &str, field: UniqueField) -> Result<bool, AccountError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.values().any(|a| match field {
                UniqueField::Username => a.username == value,
                UniqueField::Email => a.email == value,
            }))
        }
    }

    #[derive(Default)]
    struct RecordingQueue {
        published: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl RecordingQueue {
        fn messages(&self) -> Vec<(String, Vec<u8>)> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationQueue for RecordingQueue {
        async fn publish(&self, queue: &str, payload: &[u8]) -> anyhow::Result<()> {
            self.published
                .lock()
                .unwrap()
                .push((queue.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    struct FailingQueue;

    #[async_trait]
    impl NotificationQueue for FailingQueue {
        async fn publish(&self, _queue: &str, _payload: &[u8]) -> anyhow::Result<()> {
            anyhow::bail!("broker unavailable")
        }
    }

    fn service(
        store: Arc<dyn AccountStore>,
        queue: Arc<dyn NotificationQueue>,
    ) -> BasicAccountService {
        BasicAccountService::new(store, queue, "welcome_email".into(), MIN_HASH_COST)
    }

    #[tokio::test]
    async fn create_user_assigns_id_and_hashes_password() {
        let store = Arc::new(InMemoryStore::default());
        let queue = Arc::new(RecordingQueue::default());
        let svc = service(store.clone(), queue.clone());

        let created = svc.create_user(sample_account()).await.unwrap();
        assert_ne!(created.account.id, Uuid::nil());
        assert!(created.welcome_email_enqueued);

        let stored = svc.get_user_by_username("yvan1").await.unwrap();
        assert_eq!(stored.id, created.account.id);
        assert_ne!(stored.password, "Granada123!");
        assert!(password::verify(&stored.password, "Granada123!").await);

        let messages = queue.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "welcome_email");
        assert!(String::from_utf8(messages[0].1.clone())
            .unwrap()
            .contains("Yvan Moreau"));
    }

    #[tokio::test]
    async fn second_identical_payload_is_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), Arc::new(RecordingQueue::default()));

        svc.create_user(sample_account()).await.unwrap();
        let err = svc.create_user(sample_account()).await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_with_fresh_username_is_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), Arc::new(RecordingQueue::default()));

        svc.create_user(sample_account()).await.unwrap();
        let mut second = sample_account();
        second.username = "someone_else".into();
        let err = svc.create_user(second).await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn empty_payload_is_rejected_before_validation() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        let mut account = sample_account();
        account.username.clear();
        account.email.clear();
        account.password.clear();
        let err = svc.create_user(account).await.unwrap_err();
        assert!(matches!(err, AccountError::NoAccountProvided));
    }

    #[tokio::test]
    async fn password_mismatch_writes_nothing() {
        let store = Arc::new(InMemoryStore::default());
        let queue = Arc::new(RecordingQueue::default());
        let svc = service(store.clone(), queue.clone());

        let mut account = sample_account();
        account.password_confirmation = "Granada123?".into();
        let err = svc.create_user(account).await.unwrap_err();
        assert!(matches!(err, AccountError::PasswordMismatch));
        assert_eq!(store.len(), 0);
        assert!(queue.messages().is_empty());
    }

    #[tokio::test]
    async fn validation_failure_names_every_field() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        let mut account = sample_account();
        account.first_name.clear();
        account.bio.clear();
        account.intent.clear();
        let err = svc.create_user(account).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("first_name"), "{message}");
        assert!(message.contains("bio"), "{message}");
        assert!(message.contains("intent"), "{message}");
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_create() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), Arc::new(FailingQueue));

        let created = svc.create_user(sample_account()).await.unwrap();
        assert!(!created.welcome_email_enqueued);

        // The account is durable regardless of the broker.
        let fetched = svc.get_user_by_id(created.account.id).await.unwrap();
        assert_eq!(fetched.username, "yvan1");
    }

    #[tokio::test]
    async fn log_in_roundtrip() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        let created = svc.create_user(sample_account()).await.unwrap();

        let account = svc.log_in("yvan1", "Granada123!").await.unwrap();
        assert_eq!(account.id, created.account.id);
    }

    #[tokio::test]
    async fn log_in_unknown_user_is_invalid_username() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        let err = svc.log_in("nonexistent", "anything").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidUsername));
    }

    #[tokio::test]
    async fn log_in_wrong_password_is_invalid_password() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        svc.create_user(sample_account()).await.unwrap();
        let err = svc.log_in("yvan1", "WrongPass123").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidPassword));
    }

    #[tokio::test]
    async fn log_in_requires_credentials() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        assert!(matches!(
            svc.log_in("", "Granada123!").await.unwrap_err(),
            AccountError::NoUsernameProvided
        ));
        assert!(matches!(
            svc.log_in("yvan1", "").await.unwrap_err(),
            AccountError::NoPasswordProvided
        ));
    }

    #[tokio::test]
    async fn lookups_pass_not_found_through() {
        let svc = service(
            Arc::new(InMemoryStore::default()),
            Arc::new(RecordingQueue::default()),
        );
        assert!(matches!(
            svc.get_user_by_id(Uuid::new_v4()).await.unwrap_err(),
            AccountError::NotFound
        ));
        assert!(matches!(
            svc.get_user_by_username("ghost").await.unwrap_err(),
            AccountError::NotFound
        ));
        assert!(matches!(
            svc.get_user_by_email("ghost@x.com").await.unwrap_err(),
            AccountError::NotFound
        ));
    }

    #[tokio::test]
    async fn decorated_chain_behaves_like_the_basic_service() {
        let store: Arc<dyn AccountStore> = Arc::new(InMemoryStore::default());
        let queue: Arc<dyn NotificationQueue> = Arc::new(RecordingQueue::default());
        let svc = new(store, queue, "welcome_email".into(), MIN_HASH_COST);

        let created = svc.create_user(sample_account()).await.unwrap();
        assert_ne!(created.account.id, Uuid::nil());

        let err = svc.create_user(sample_account()).await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));

        let account = svc.log_in("yvan1", "Granada123!").await.unwrap();
        assert_eq!(account.email, "yvan1@x.com");
    }
}
