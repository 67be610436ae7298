mod memory;
mod repository;
mod source;

pub use memory::*;
pub use repository::*;
pub use source::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
