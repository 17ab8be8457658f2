// Service exports
pub mod context;
pub mod postgres;
pub mod repository;

pub use context::{ContextError, ContextResolver};
pub use postgres::PostgresBlogRepository;
pub use repository::{BlogRepository, RepositoryError};
