//! Users as this service sees them.
//!
//! Accounts are provisioned by the external auth provider; this service
//! only reads them for the admin flag and for comment author display info.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: Uuid,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: String,
    // Never leaves the process.
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub is_social: bool,
    pub provider: String,
    pub profile_image: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
}

impl UserRow {
    /// The name shown publicly: real name, else username, else a generic
    /// fallback.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Anonymous User")
    }
}

/// Display info attached to each comment and reply when a tree is resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, username: Option<&str>) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.map(str::to_string),
            name: name.map(str::to_string),
            email: "reader@example.com".to_string(),
            password_hash: None,
            is_social: true,
            provider: "google".to_string(),
            profile_image: None,
            is_verified: true,
            is_admin: false,
        }
    }

    #[test]
    fn display_name_prefers_name_then_username() {
        assert_eq!(user(Some("Harsh"), Some("harsh_a")).display_name(), "Harsh");
        assert_eq!(user(None, Some("harsh_a")).display_name(), "harsh_a");
        assert_eq!(user(None, None).display_name(), "Anonymous User");
    }

    #[test]
    fn password_hash_never_serializes() {
        let mut row = user(Some("Harsh"), None);
        row.password_hash = Some("secret-hash".to_string());
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
