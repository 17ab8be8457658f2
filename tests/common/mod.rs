// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sas_blog_api::config::{ListingSettings, SalesChannelSettings};
use sas_blog_api::core::{Criteria, Filter};
use sas_blog_api::models::{
    BlogAuthor, BlogCategory, BlogEntry, EntitySearchResult, SalesChannelContext, Salutation,
};
use sas_blog_api::services::{BlogRepository, ContextResolver, RepositoryError};
use sas_blog_api::AppState;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const ACCESS_KEY: &str = "SWSCTESTACCESSKEY";

/// Blog repository evaluating criteria over a fixed set of entries
pub struct InMemoryBlogRepository {
    entries: Vec<BlogEntry>,
    pub searches: Mutex<Vec<Criteria>>,
}

impl InMemoryBlogRepository {
    pub fn new(entries: Vec<BlogEntry>) -> Self {
        Self {
            entries,
            searches: Mutex::new(vec![]),
        }
    }

    fn matches(entry: &BlogEntry, criteria: &Criteria) -> Result<bool, RepositoryError> {
        if !criteria.ids().is_empty() && !criteria.ids().contains(&entry.id) {
            return Ok(false);
        }

        for filter in criteria.filters() {
            let actual = match filter.field() {
                "slug" => entry.slug.clone(),
                "title" => entry.title.clone(),
                "id" => entry.id.to_string(),
                other => return Err(RepositoryError::UnknownField(other.to_string())),
            };
            let Filter::Equals { value, .. } = filter;
            if &actual != value {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn project(mut entry: BlogEntry, criteria: &Criteria) -> BlogEntry {
        if !criteria.has_association("blogAuthor") {
            entry.blog_author = None;
        } else if !criteria.has_association("blogAuthor.salutation") {
            if let Some(author) = entry.blog_author.as_mut() {
                author.salutation = None;
            }
        }

        if !criteria.has_association("blogCategories") {
            entry.blog_categories = None;
        }

        entry
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn search(
        &self,
        criteria: &Criteria,
        _context: &SalesChannelContext,
    ) -> Result<EntitySearchResult<BlogEntry>, RepositoryError> {
        self.searches.lock().unwrap().push(criteria.clone());

        let mut matched = Vec::new();
        for entry in &self.entries {
            if Self::matches(entry, criteria)? {
                matched.push(entry.clone());
            }
        }

        let total = matched.len() as u64;
        let limit = criteria.limit().map(|l| l as usize).unwrap_or(usize::MAX);
        let elements = matched
            .into_iter()
            .skip(criteria.offset() as usize)
            .take(limit)
            .map(|entry| Self::project(entry, criteria))
            .collect();

        Ok(EntitySearchResult::new(total, elements))
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        Ok(true)
    }
}

pub fn salutation() -> Salutation {
    Salutation {
        id: Uuid::new_v4(),
        salutation_key: "mrs".to_string(),
        display_name: Some("Mrs.".to_string()),
        letter_name: Some("Dear Mrs.".to_string()),
    }
}

pub fn author() -> BlogAuthor {
    let salutation = salutation();
    BlogAuthor {
        id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        display_name: Some("Ada L.".to_string()),
        salutation_id: Some(salutation.id),
        salutation: Some(salutation),
    }
}

pub fn entry(slug: &str, title: &str) -> BlogEntry {
    let author = author();
    BlogEntry {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        teaser: Some(format!("About {}", title)),
        content: Some("<p>Hello</p>".to_string()),
        active: true,
        published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single(),
        author_id: Some(author.id),
        blog_author: Some(author),
        blog_categories: Some(vec![BlogCategory {
            id: Uuid::new_v4(),
            parent_id: None,
            name: "News".to_string(),
        }]),
    }
}

pub fn entries() -> Vec<BlogEntry> {
    vec![
        entry("first-post", "First post"),
        entry("second-post", "Second post"),
        entry("third-post", "Third post"),
    ]
}

pub fn sales_channel() -> SalesChannelSettings {
    SalesChannelSettings {
        access_key: ACCESS_KEY.to_string(),
        id: Uuid::new_v4(),
        language_id: Uuid::new_v4(),
    }
}

pub fn app_state(repository: Arc<InMemoryBlogRepository>) -> AppState {
    AppState::new(
        repository,
        ContextResolver::new(&[sales_channel()]),
        ListingSettings {
            default_limit: 2,
            max_limit: 50,
        },
    )
}
