use uuid::Uuid;

use crate::core::criteria::{Filter, QueryCriteria};

/// Field compared against non-identifier search values
pub const SLUG_FIELD: &str = "slug";

/// Relations always loaded with blog listings
pub const BLOG_ASSOCIATIONS: [&str; 2] = ["blogAuthor.salutation", "blogCategories"];

/// Parse a value in one of the two accepted identifier forms
///
/// Accepts the hyphenated (`8-4-4-4-12`) and simple 32-digit hex forms.
/// Braced and URN forms are not identifiers here.
pub fn parse_identifier(value: &str) -> Option<Uuid> {
    match value.len() {
        32 | 36 => Uuid::try_parse(value).ok(),
        _ => None,
    }
}

/// Extend `criteria` for a blog listing request
///
/// An identifier-shaped `search` restricts the result to that one entry,
/// any other non-empty value filters on the slug.
pub fn build_criteria<C: QueryCriteria>(search: Option<&str>, mut criteria: C) -> C {
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        match parse_identifier(search) {
            Some(id) => criteria.set_ids(vec![id]),
            None => criteria.add_filter(Filter::equals(SLUG_FIELD, search)),
        }
    }

    criteria.add_associations(&BLOG_ASSOCIATIONS);

    criteria
}
