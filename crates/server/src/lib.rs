pub mod errors;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::{build_app, run};
