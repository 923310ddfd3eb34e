use async_trait::async_trait;

use super::domain::UserRecord;
use super::errors::AuthError;

/// User lookup the authorization guard and token issuing depend on.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::auth::domain::Role;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<String, UserRecord>>, // key: email
        fail: bool,
    }

    impl MockUserRepository {
        /// A repository whose every lookup fails, for exercising storage-failure paths.
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        pub fn with_user(self, email: &str, role: Option<Role>) -> Self {
            let record = UserRecord { id: Uuid::new_v4(), email: email.to_string(), role };
            self.users.lock().unwrap_or_else(|e| e.into_inner()).insert(email.to_string(), record);
            self
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            if self.fail {
                return Err(AuthError::Repository("lookup unavailable".into()));
            }
            let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
            Ok(users.get(email).cloned())
        }
    }
}
