//! Journal module
//!
//! This module provides the journal data layer:
//! - Model definitions
//! - Repository owning the persisted collections
//! - Search, pagination and retention over entries

pub mod models;
pub mod query;
pub mod repository;

pub use models::*;
pub use query::{paginate, retain_newest, search, Pager};
pub use repository::JournalRepository;
