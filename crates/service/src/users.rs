//! The `users` collection.
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::domain::Role;
use crate::errors::StorageError;
use crate::storage::{Collection, DeleteResult, Document, DocumentStore, Fields, Filter, InsertOneResult, UpdateResult};

/// Outcome of `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Created(InsertOneResult),
    AlreadyExists { message: String },
}

impl Registration {
    pub fn already_exists() -> Self {
        Registration::AlreadyExists { message: "user already exists".into() }
    }
}

pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// Insert the user unless a document with the same email exists.
    #[instrument(skip(self, user))]
    pub async fn register(&self, user: Fields) -> Result<Registration, StorageError> {
        let email = match user.get("email") {
            Some(Value::String(e)) if !e.trim().is_empty() => e.clone(),
            _ => return Err(StorageError::InvalidDocument("user email is required".into())),
        };
        let filter = Filter::new().eq("email", email.as_str());
        if self.store.find_one(Collection::Users, &filter).await?.is_some() {
            return Ok(Registration::already_exists());
        }
        let res = self.store.insert_one(Collection::Users, user).await?;
        info!(id = %res.inserted_id, %email, "user_registered");
        Ok(Registration::Created(res))
    }

    pub async fn list(&self) -> Result<Vec<Document>, StorageError> {
        self.store.find_all(Collection::Users).await
    }

    #[instrument(skip(self))]
    pub async fn promote_to_admin(&self, id: Uuid) -> Result<UpdateResult, StorageError> {
        let mut set = Fields::new();
        set.insert("role".into(), Value::from(Role::Admin.as_str()));
        let res = self.store.update_one(Collection::Users, id, set, false).await?;
        info!(matched = res.matched_count, "user_promoted");
        Ok(res)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, StorageError> {
        self.store.delete_one(Collection::Users, id).await
    }
}
