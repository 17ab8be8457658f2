use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Blog entry as exposed by the Store API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub teaser: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    /// Loaded only when the `blogAuthor` association is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_author: Option<BlogAuthor>,
    /// Loaded only when the `blogCategories` association is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_categories: Option<Vec<BlogCategory>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogAuthor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub salutation_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salutation: Option<Salutation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salutation {
    pub id: Uuid,
    pub salutation_key: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub letter_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub name: String,
}

/// Per-request storefront context
///
/// Resolved from the Store API headers before the route runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesChannelContext {
    pub sales_channel_id: Uuid,
    pub language_id: Uuid,
    /// Sales channel language, used where `language_id` has no translation
    pub default_language_id: Uuid,
    pub token: String,
}
