use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Document;

/// Verified caller, attached to a request after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The auth-relevant view of a stored user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
}

impl UserRecord {
    /// `None` when the document carries no string `email`.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let email = doc.get_str("email")?.to_string();
        let role = doc.get_str("role").and_then(Role::parse);
        Some(Self { id: doc.id, email, role })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// Response of `GET /jwt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

impl AccessToken {
    pub fn empty() -> Self {
        Self { access_token: String::new() }
    }
}
