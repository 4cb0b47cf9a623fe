//! Shared fixtures: the ad-reporting models, the search-result schema and an
//! in-memory executor.

pub mod models;

pub use memory::MemoryDatabase;
pub use models::*;
