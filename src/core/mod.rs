// Criteria construction
pub mod criteria;
pub mod query_builder;

pub use criteria::{Criteria, Filter, QueryCriteria};
pub use query_builder::{build_criteria, parse_identifier, BLOG_ASSOCIATIONS, SLUG_FIELD};
