use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::core::{Criteria, Filter};
use crate::models::{
    BlogAuthor, BlogCategory, BlogEntry, EntitySearchResult, SalesChannelContext, Salutation,
};
use crate::services::repository::{BlogRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Uuid,
    Text,
    Bool,
}

/// Map a filterable entity field to its SQL column
fn filter_column(field: &str) -> Option<(&'static str, ColumnKind)> {
    match field {
        "id" => Some(("e.id", ColumnKind::Uuid)),
        "active" => Some(("e.active", ColumnKind::Bool)),
        "authorId" => Some(("e.author_id", ColumnKind::Uuid)),
        "slug" => Some(("COALESCE(t.slug, f.slug)", ColumnKind::Text)),
        "title" => Some(("COALESCE(t.title, f.title)", ColumnKind::Text)),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn invalid_value(field: &str, value: &str) -> RepositoryError {
    RepositoryError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Append the FROM/WHERE part shared by the count and select queries
///
/// `t` is the translation in the requested language, `f` the one in the
/// sales channel language. An entry is visible if either exists.
fn push_conditions(
    builder: &mut QueryBuilder<'_, Postgres>,
    criteria: &Criteria,
    context: &SalesChannelContext,
) -> Result<(), RepositoryError> {
    builder
        .push(
            " FROM sas_blog_entries e \
             LEFT JOIN sas_blog_entries_translation t \
             ON t.sas_blog_entries_id = e.id AND t.language_id = ",
        )
        .push_bind(context.language_id)
        .push(
            " LEFT JOIN sas_blog_entries_translation f \
             ON f.sas_blog_entries_id = e.id AND f.language_id = ",
        )
        .push_bind(context.default_language_id)
        .push(" WHERE (t.sas_blog_entries_id IS NOT NULL OR f.sas_blog_entries_id IS NOT NULL)");

    if !criteria.ids().is_empty() {
        builder
            .push(" AND e.id = ANY(")
            .push_bind(criteria.ids().to_vec())
            .push(")");
    }

    for filter in criteria.filters() {
        let (column, kind) = filter_column(filter.field())
            .ok_or_else(|| RepositoryError::UnknownField(filter.field().to_string()))?;

        match filter {
            Filter::Equals { field, value } => {
                builder.push(" AND ").push(column).push(" = ");
                match kind {
                    ColumnKind::Text => {
                        builder.push_bind(value.clone());
                    }
                    ColumnKind::Uuid => {
                        let id = Uuid::try_parse(value).map_err(|_| invalid_value(field, value))?;
                        builder.push_bind(id);
                    }
                    ColumnKind::Bool => {
                        let flag = parse_bool(value).ok_or_else(|| invalid_value(field, value))?;
                        builder.push_bind(flag);
                    }
                }
            }
        }
    }

    Ok(())
}

fn entry_from_row(row: &PgRow) -> Result<BlogEntry, sqlx::Error> {
    Ok(BlogEntry {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        teaser: row.try_get("teaser")?,
        content: row.try_get("content")?,
        active: row.try_get("active")?,
        published_at: row.try_get("published_at")?,
        author_id: row.try_get("author_id")?,
        blog_author: None,
        blog_categories: None,
    })
}

/// PostgreSQL-backed blog repository
///
/// Translates [`Criteria`] into SQL against the blog plugin tables.
/// Translated fields are read in the language of the request context,
/// falling back to the sales channel language.
pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    /// Create a new repository from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new repository from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
        )
        .await
    }

    async fn attach_authors(
        &self,
        entries: &mut [BlogEntry],
        with_salutation: bool,
    ) -> Result<(), RepositoryError> {
        let mut author_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.author_id).collect();
        author_ids.sort();
        author_ids.dedup();

        if author_ids.is_empty() {
            return Ok(());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, display_name, salutation_id
            FROM sas_blog_author
            WHERE id = ANY($1)
            "#,
        )
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut authors = HashMap::with_capacity(rows.len());
        for row in &rows {
            let author = BlogAuthor {
                id: row.try_get("id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                display_name: row.try_get("display_name")?,
                salutation_id: row.try_get("salutation_id")?,
                salutation: None,
            };
            authors.insert(author.id, author);
        }

        if with_salutation {
            let salutation_ids: Vec<Uuid> = authors
                .values()
                .filter_map(|a| a.salutation_id)
                .collect();
            let salutations = self.load_salutations(&salutation_ids).await?;

            for author in authors.values_mut() {
                author.salutation = author
                    .salutation_id
                    .and_then(|id| salutations.get(&id).cloned());
            }
        }

        for entry in entries.iter_mut() {
            entry.blog_author = entry.author_id.and_then(|id| authors.get(&id).cloned());
        }

        Ok(())
    }

    async fn load_salutations(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Salutation>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, salutation_key, display_name, letter_name
            FROM salutation
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut salutations = HashMap::with_capacity(rows.len());
        for row in &rows {
            let salutation = Salutation {
                id: row.try_get("id")?,
                salutation_key: row.try_get("salutation_key")?,
                display_name: row.try_get("display_name")?,
                letter_name: row.try_get("letter_name")?,
            };
            salutations.insert(salutation.id, salutation);
        }

        Ok(salutations)
    }

    async fn attach_categories(&self, entries: &mut [BlogEntry]) -> Result<(), RepositoryError> {
        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        if entry_ids.is_empty() {
            return Ok(());
        }

        let rows = sqlx::query(
            r#"
            SELECT m.sas_blog_entries_id AS entry_id, c.id, c.parent_id, c.name
            FROM sas_blog_blog_category m
            JOIN sas_blog_category c ON c.id = m.sas_blog_category_id
            WHERE m.sas_blog_entries_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(&entry_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_entry: HashMap<Uuid, Vec<BlogCategory>> = HashMap::new();
        for row in &rows {
            let entry_id: Uuid = row.try_get("entry_id")?;
            by_entry.entry(entry_id).or_default().push(BlogCategory {
                id: row.try_get("id")?,
                parent_id: row.try_get("parent_id")?,
                name: row.try_get("name")?,
            });
        }

        for entry in entries.iter_mut() {
            entry.blog_categories = Some(by_entry.remove(&entry.id).unwrap_or_default());
        }

        Ok(())
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn search(
        &self,
        criteria: &Criteria,
        context: &SalesChannelContext,
    ) -> Result<EntitySearchResult<BlogEntry>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) AS total");
        push_conditions(&mut count, criteria, context)?;
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get("total")?;

        let mut select = QueryBuilder::new(
            "SELECT e.id, e.active, e.author_id, e.published_at, \
             COALESCE(t.title, f.title) AS title, \
             COALESCE(t.slug, f.slug) AS slug, \
             COALESCE(t.teaser, f.teaser) AS teaser, \
             COALESCE(t.content, f.content) AS content",
        );
        push_conditions(&mut select, criteria, context)?;
        select.push(" ORDER BY e.published_at DESC NULLS LAST, e.id");

        if let Some(limit) = criteria.limit() {
            select
                .push(" LIMIT ")
                .push_bind(i64::from(limit))
                .push(" OFFSET ")
                .push_bind(i64::from(criteria.offset()));
        }

        let rows = select.build().fetch_all(&self.pool).await?;
        let mut entries = rows
            .iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if criteria.has_association("blogAuthor") {
            self.attach_authors(&mut entries, criteria.has_association("blogAuthor.salutation"))
                .await?;
        }

        if criteria.has_association("blogCategories") {
            self.attach_categories(&mut entries).await?;
        }

        tracing::debug!(
            "Blog search returned {} of {} entries (sales channel {})",
            entries.len(),
            total,
            context.sales_channel_id
        );

        Ok(EntitySearchResult::new(total.max(0) as u64, entries))
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
