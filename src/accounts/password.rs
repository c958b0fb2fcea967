use tracing::error;

use crate::accounts::model::Account;
use crate::error::AccountError;

/// Default bcrypt cost factor. This is the bcrypt minimum and is
/// deliberately cheap; production deployments raise it via `HASH_COST`.
pub const MIN_HASH_COST: u32 = 4;

/// Hash and salt a plaintext password with bcrypt.
///
/// bcrypt is CPU-bound, so the work runs on the blocking thread pool.
/// Fails only when the primitive itself rejects the input (e.g. an
/// out-of-range cost or oversized input).
pub async fn hash_and_salt(plain: &str, cost: u32) -> Result<String, AccountError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(plain, cost).map_err(|e| AccountError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AccountError::Hashing(format!("hashing task failed: {e}")))?
}

/// Check a candidate plaintext against a stored bcrypt hash.
///
/// A mismatch is a normal `false`, never an error; a malformed hash is
/// logged and also reported as `false`. The underlying comparison is
/// constant-time.
pub async fn verify(hash: &str, candidate: &str) -> bool {
    let hash = hash.to_owned();
    let candidate = candidate.to_owned();
    match tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash)).await {
        Ok(Ok(matched)) => matched,
        Ok(Err(e)) => {
            error!(error = %e, "bcrypt verify error");
            false
        }
        Err(e) => {
            error!(error = %e, "bcrypt verify task failed");
            false
        }
    }
}

/// Require `password == password_confirmation` byte-for-byte, then hash.
///
/// On success the hash replaces both fields, so the confirmation field is
/// never left holding plaintext. On mismatch no hashing happens at all.
pub async fn validate_and_hash(mut account: Account, cost: u32) -> Result<Account, AccountError> {
    if account.password != account.password_confirmation {
        return Err(AccountError::PasswordMismatch);
    }
    let hashed = hash_and_salt(&account.password, cost).await?;
    account.password = hashed.clone();
    account.password_confirmation = hashed;
    Ok(account)
}
