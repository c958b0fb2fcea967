use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// A user profile/credential record.
///
/// `id` is assigned server-side exactly once, at creation. `password` holds
/// the bcrypt hash once the account has passed through credential
/// processing; `password_confirmation` is transient input that is
/// overwritten with the same hash so plaintext never outlives validation.
/// Neither field is serialized, and both are redacted from `Debug`.
#[derive(Clone, Serialize, FromRow, Validate)]
pub struct Account {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 8, max = 20))]
    pub password: String,
    #[serde(skip_serializing)]
    #[sqlx(default)]
    #[validate(length(min = 8, max = 20))]
    pub password_confirmation: String,
    pub gender: Option<String>,
    pub languages: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: i32,
    #[validate(length(min = 1))]
    pub birth_date: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub bio: String,
    #[validate(length(max = 30))]
    pub headline: Option<String>,
    #[validate(length(min = 1))]
    pub intent: String,
    pub address: Option<Json<Address>>,
    pub education: Option<Json<Education>>,
    pub interests: Option<Json<Interests>>,
    pub skills: Option<Json<Skillset>>,
    pub subscriptions: Option<Json<Subscriptions>>,
    /// Team/group references are maintained by other subsystems; they are
    /// persisted as-is, membership is not validated here.
    pub team_ids: Vec<String>,
    pub group_ids: Vec<String>,
    pub created_at: OffsetDateTime,
}

impl Account {
    /// True when the payload carries none of the identity fields, i.e. the
    /// caller effectively sent no account at all.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty() && self.password.is_empty()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("password_confirmation", &"<redacted>")
            .field("age", &self.age)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Education {
    #[validate(length(min = 1))]
    pub most_recent_institution_name: String,
    #[validate(length(min = 1))]
    pub highest_degree_earned: String,
    pub graduated: bool,
    #[validate(length(min = 1))]
    pub major: String,
    #[validate(length(min = 1))]
    pub minor: String,
    #[validate(length(min = 1))]
    pub years_of_attendance: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct Interests {
    #[serde(default)]
    pub industries: Vec<Industry>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Industry {
    #[validate(length(min = 1))]
    pub industry_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Topic {
    #[validate(length(min = 1))]
    pub topic_name: String,
    #[validate(length(min = 1))]
    pub topic_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct Skillset {
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Skill {
    #[validate(length(min = 1))]
    pub skill_type: String,
    #[validate(length(min = 1))]
    pub skill_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Subscriptions {
    #[validate(length(min = 1))]
    pub subscription_name: String,
    pub subscribe: bool,
}

/// Fully valid account fixture shared by the unit tests of this module tree.
#[cfg(test)]
pub(crate) fn sample_account() -> Account {
    Account {
        id: Uuid::nil(),
        first_name: "Yvan".into(),
        last_name: "Moreau".into(),
        username: "yvan1".into(),
        email: "yvan1@x.com".into(),
        password: "Granada123!".into(),
        password_confirmation: "Granada123!".into(),
        gender: None,
        languages: None,
        age: 24,
        birth_date: "1999-07-14".into(),
        phone_number: "+33-6-12-34-56-78".into(),
        bio: "Always building something.".into(),
        headline: Some("Platform engineer".into()),
        intent: "networking".into(),
        address: Some(Json(Address {
            city: "Lyon".into(),
            state: "Auvergne-Rhone-Alpes".into(),
            country: "France".into(),
        })),
        education: None,
        interests: None,
        skills: None,
        subscriptions: None,
        team_ids: vec![],
        group_ids: vec![],
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}
