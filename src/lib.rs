//! SAS Blog API - Store API service for blog entries
//!
//! Exposes the blog listing route: a `search` value is turned into either an
//! identifier restriction or a slug filter, the author and category relations
//! are attached, and the criteria is handed to a [`services::BlogRepository`].

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_criteria, Criteria, Filter, QueryCriteria};
pub use models::{BlogEntry, BlogListRequest, BlogRouteResponse, EntitySearchResult, SalesChannelContext};
pub use routes::{AbstractBlogRoute, AppState, BlogRoute};
pub use services::{BlogRepository, ContextResolver, PostgresBlogRepository, RepositoryError};
