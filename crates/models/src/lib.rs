pub mod errors;
pub mod db;
pub mod collection;
pub mod document;

pub use collection::Collection;
