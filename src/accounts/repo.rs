use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts::model::Account;
use crate::error::AccountError;

/// Fields carrying a uniqueness guarantee across all accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }
}

/// Persistence boundary for accounts.
///
/// `create` is atomic: either the full row is committed or nothing is.
/// Point lookups return `NotFound` when no row matches, distinguishable
/// from connectivity failures which surface as `Storage`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: &Account) -> Result<(), AccountError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountError>;
    async fn find_by_username(&self, username: &str) -> Result<Account, AccountError>;
    async fn find_by_email(&self, email: &str) -> Result<Account, AccountError>;
    /// Point lookup on a unique field. Absence is `Ok(false)`, not an error.
    async fn exists(&self, value: &str, field: UniqueField) -> Result<bool, AccountError>;
}

pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, username, email, password, \
     gender, languages, age, birth_date, phone_number, bio, headline, intent, \
     address, education, interests, skills, subscriptions, team_ids, group_ids, created_at";

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: &Account) -> Result<(), AccountError> {
        let mut tx = self.db.begin().await?;

        // Re-check inside the transaction. Two concurrent signups can still
        // both pass this read; the unique indexes on username/email are what
        // actually guarantee at most one commit, and a violation maps to
        // AlreadyExists in From<sqlx::Error>.
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE username = $1 OR email = $2")
                .bind(&account.username)
                .bind(&account.email)
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Err(AccountError::AlreadyExists);
        }

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, first_name, last_name, username, email, password,
                gender, languages, age, birth_date, phone_number, bio, headline, intent,
                address, education, interests, skills, subscriptions,
                team_ids, group_ids, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19,
                $20, $21, $22
            )
            "#,
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password)
        .bind(&account.gender)
        .bind(&account.languages)
        .bind(account.age)
        .bind(&account.birth_date)
        .bind(&account.phone_number)
        .bind(&account.bio)
        .bind(&account.headline)
        .bind(&account.intent)
        .bind(&account.address)
        .bind(&account.education)
        .bind(&account.interests)
        .bind(&account.skills)
        .bind(&account.subscriptions)
        .bind(&account.team_ids)
        .bind(&account.group_ids)
        .bind(account.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        account.ok_or(AccountError::NotFound)
    }

    async fn find_by_username(&self, username: &str) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        account.ok_or(AccountError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        account.ok_or(AccountError::NotFound)
    }

    async fn exists(&self, value: &str, field: UniqueField) -> Result<bool, AccountError> {
        let query = match field {
            UniqueField::Username => {
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)"
            }
            UniqueField::Email => "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        };
        let (exists,): (bool,) = sqlx::query_as(query)
            .bind(value)
            .fetch_one(&self.db)
            .await?;
        Ok(exists)
    }
}
