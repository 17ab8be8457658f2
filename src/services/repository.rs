use async_trait::async_trait;
use thiserror::Error;

use crate::core::Criteria;
use crate::models::{BlogEntry, EntitySearchResult, SalesChannelContext};

/// Errors that can occur while searching blog entries
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Field not filterable: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Storage backend for blog entries
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Run `criteria` against the store in the given context
    async fn search(
        &self,
        criteria: &Criteria,
        context: &SalesChannelContext,
    ) -> Result<EntitySearchResult<BlogEntry>, RepositoryError>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> Result<bool, RepositoryError>;
}
