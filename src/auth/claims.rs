use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    // Hosted auth provider tokens carry "authenticated".
    #[default]
    #[serde(alias = "authenticated")]
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id at the auth provider, "admin" for admin tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(sub: &str, email: Option<&str>, role: UserRole, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: sub.to_string(),
            email: email.map(str::to_string),
            role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn admin(expiration_hours: i64) -> Self {
        Self::new("admin", None, UserRole::Admin, expiration_hours)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
