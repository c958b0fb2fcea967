use validator::{Validate, ValidationErrors};

use crate::accounts::model::Account;
use crate::error::AccountError;

/// Structural and semantic validation of an account payload.
///
/// Pure function of its input. All violations are collected into a single
/// `ValidationFailed` message so a caller can present the complete list of
/// problems in one response instead of fixing fields one at a time.
/// Nested value objects are reported with a dotted prefix
/// (e.g. `address.city`).
pub fn validate_account(account: &Account) -> Result<(), AccountError> {
    let mut fields: Vec<String> = Vec::new();

    collect(account.validate(), "", &mut fields);
    if let Some(address) = &account.address {
        collect(address.validate(), "address.", &mut fields);
    }
    if let Some(education) = &account.education {
        collect(education.validate(), "education.", &mut fields);
    }
    if let Some(interests) = &account.interests {
        collect(interests.validate(), "interests.", &mut fields);
    }
    if let Some(skills) = &account.skills {
        collect(skills.validate(), "skills.", &mut fields);
    }
    if let Some(subscriptions) = &account.subscriptions {
        collect(subscriptions.validate(), "subscriptions.", &mut fields);
    }

    if fields.is_empty() {
        return Ok(());
    }
    fields.sort();
    fields.dedup();
    Err(AccountError::ValidationFailed(fields.join(", ")))
}

fn collect(result: Result<(), ValidationErrors>, prefix: &str, out: &mut Vec<String>) {
    if let Err(errors) = result {
        for field in errors.field_errors().keys() {
            out.push(format!("{prefix}{field}"));
        }
    }
}
