//! Service layer for the creative agency backend.
//! - `storage`: document store abstraction with SeaORM and in-memory backends.
//! - `auth`: token service, authentication and admin authorization.
//! - `catalog`, `users`, `orders`, `reviews`: one thin service per collection.

pub mod errors;
pub mod storage;
pub mod auth;
pub mod catalog;
pub mod users;
pub mod orders;
pub mod reviews;
