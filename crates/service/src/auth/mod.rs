//! Auth module: domain, token service, user lookup repository and the
//! service that implements the authentication and admin authorization guards.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;
pub mod token;

pub use service::AuthService;
