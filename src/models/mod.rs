// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BlogAuthor, BlogCategory, BlogEntry, SalesChannelContext, Salutation};
pub use requests::BlogListRequest;
pub use responses::{BlogRouteResponse, EntitySearchResult, ErrorResponse, HealthResponse};
