use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single filter condition applied to a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    /// `field == value`
    Equals { field: String, value: String },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field the filter applies to
    pub fn field(&self) -> &str {
        match self {
            Filter::Equals { field, .. } => field,
        }
    }
}

/// Operations a query builder needs from a criteria object
///
/// Implemented by [`Criteria`]; storage adapters consume the concrete type.
pub trait QueryCriteria {
    /// Restrict the search to exactly these identifiers
    fn set_ids(&mut self, ids: Vec<Uuid>);

    fn add_filter(&mut self, filter: Filter);

    /// Eagerly load a related entity or collection. Nested relations use
    /// dot-separated paths (`blogAuthor.salutation`).
    fn add_association(&mut self, path: &str);

    fn add_associations(&mut self, paths: &[&str]) {
        for path in paths {
            self.add_association(path);
        }
    }
}

/// Request-scoped search specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    ids: Vec<Uuid>,
    filters: Vec<Filter>,
    associations: Vec<String>,
    limit: Option<u32>,
    page: Option<u32>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base criteria carrying pagination only
    pub fn paginated(limit: u32, page: u32) -> Self {
        Self {
            limit: Some(limit.max(1)),
            page: Some(page.max(1)),
            ..Self::default()
        }
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn associations(&self) -> &[String] {
        &self.associations
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Number of rows to skip, derived from page and limit
    pub fn offset(&self) -> u32 {
        match (self.limit, self.page) {
            (Some(limit), Some(page)) => limit.saturating_mul(page.saturating_sub(1)),
            _ => 0,
        }
    }

    /// True when `path` or any nested path below it was requested
    pub fn has_association(&self, path: &str) -> bool {
        self.associations.iter().any(|registered| {
            registered == path
                || registered
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

impl QueryCriteria for Criteria {
    fn set_ids(&mut self, ids: Vec<Uuid>) {
        self.ids = ids;
    }

    fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    fn add_association(&mut self, path: &str) {
        if !self.associations.iter().any(|p| p == path) {
            self.associations.push(path.to_string());
        }
    }
}
