use std::sync::Arc;

use crate::auth::domain::UserRecord;
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;
use crate::storage::{Collection, DocumentStore, Filter};

/// Looks users up in the `users` collection of a document store.
pub struct DocumentUserRepository {
    pub store: Arc<dyn DocumentStore>,
}

impl DocumentUserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl UserRepository for DocumentUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let doc = self
            .store
            .find_one(Collection::Users, &Filter::new().eq("email", email))
            .await?;
        Ok(doc.as_ref().and_then(UserRecord::from_document))
    }
}
