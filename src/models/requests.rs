use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters accepted by the blog listing route
///
/// Read from the query string, and on POST also from a JSON or form body.
/// `search` is free text and never rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BlogListRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u32>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<u32>,
}

impl BlogListRequest {
    /// Fill fields unset on `self` from `fallback`
    pub fn or(self, fallback: BlogListRequest) -> Self {
        Self {
            search: self.search.or(fallback.search),
            limit: self.limit.or(fallback.limit),
            page: self.page.or(fallback.page),
        }
    }
}
