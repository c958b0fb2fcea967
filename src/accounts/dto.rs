use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::model::{
    Account, Address, Education, Interests, Skillset, Subscriptions,
};

/// Signup payload. Every field defaults so a missing field surfaces as a
/// validation error naming it, instead of a bare deserialization failure.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub gender: Option<String>,
    pub languages: Option<String>,
    pub age: i32,
    pub birth_date: String,
    pub phone_number: String,
    pub bio: String,
    pub headline: Option<String>,
    pub intent: String,
    pub address: Option<Address>,
    pub education: Option<Education>,
    pub interests: Option<Interests>,
    pub skills: Option<Skillset>,
    pub subscriptions: Option<Subscriptions>,
    pub team_ids: Vec<String>,
    pub group_ids: Vec<String>,
}

impl From<CreateAccountRequest> for Account {
    fn from(req: CreateAccountRequest) -> Self {
        Account {
            // Placeholder; the service assigns the real id at creation.
            id: Uuid::nil(),
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            email: req.email,
            password: req.password,
            password_confirmation: req.password_confirmation,
            gender: req.gender,
            languages: req.languages,
            age: req.age,
            birth_date: req.birth_date,
            phone_number: req.phone_number,
            bio: req.bio,
            headline: req.headline,
            intent: req.intent,
            address: req.address.map(Json),
            education: req.education.map(Json),
            interests: req.interests.map(Json),
            skills: req.skills.map(Json),
            subscriptions: req.subscriptions.map(Json),
            team_ids: req.team_ids,
            group_ids: req.group_ids,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct CreateAccountResponse {
    pub account: Account,
    pub welcome_email_enqueued: bool,
}
