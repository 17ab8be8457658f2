use std::sync::Arc;

use actix_web::{error, http::StatusCode, web, HttpMessage, HttpRequest, HttpResponse};
use async_trait::async_trait;
use thiserror::Error;
use validator::Validate;

use crate::config::ListingSettings;
use crate::core::{build_criteria, Criteria};
use crate::models::{
    BlogEntry, BlogListRequest, BlogRouteResponse, ErrorResponse, HealthResponse,
    SalesChannelContext,
};
use crate::services::context::{ACCESS_KEY_HEADER, CONTEXT_TOKEN_HEADER, LANGUAGE_ID_HEADER};
use crate::services::{BlogRepository, ContextError, ContextResolver, RepositoryError};

/// Errors produced by blog route implementations
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0} is a terminal route and cannot be decorated")]
    DecorationPattern(&'static str),
}

/// Blog listing route
///
/// Implementations that wrap another route return it from `decorated`.
#[async_trait]
pub trait AbstractBlogRoute: Send + Sync {
    /// The inner route this one extends
    fn decorated(&self) -> Result<&dyn AbstractBlogRoute, BlogError>;

    async fn load(
        &self,
        request: &BlogListRequest,
        criteria: Criteria,
        context: &SalesChannelContext,
    ) -> Result<BlogRouteResponse<BlogEntry>, BlogError>;
}

/// Terminal blog route backed by a repository
pub struct BlogRoute {
    repository: Arc<dyn BlogRepository>,
}

impl BlogRoute {
    pub fn new(repository: Arc<dyn BlogRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AbstractBlogRoute for BlogRoute {
    fn decorated(&self) -> Result<&dyn AbstractBlogRoute, BlogError> {
        Err(BlogError::DecorationPattern("BlogRoute"))
    }

    async fn load(
        &self,
        request: &BlogListRequest,
        criteria: Criteria,
        context: &SalesChannelContext,
    ) -> Result<BlogRouteResponse<BlogEntry>, BlogError> {
        let criteria = build_criteria(request.search.as_deref(), criteria);
        let result = self.repository.search(&criteria, context).await?;

        Ok(BlogRouteResponse::new(result))
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub route: Arc<dyn AbstractBlogRoute>,
    pub repository: Arc<dyn BlogRepository>,
    pub contexts: Arc<ContextResolver>,
    pub listing: ListingSettings,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn BlogRepository>,
        contexts: ContextResolver,
        listing: ListingSettings,
    ) -> Self {
        Self {
            route: Arc::new(BlogRoute::new(repository.clone())),
            repository,
            contexts: Arc::new(contexts),
            listing,
        }
    }
}

/// Errors surfaced to Store API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Blog(#[from] BlogError),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Context(ContextError::InvalidLanguageId(_)) => "invalid_language_id",
            ApiError::Context(_) => "invalid_access_key",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Blog(_) => "search_failed",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Context(ContextError::InvalidLanguageId(_)) => StatusCode::BAD_REQUEST,
            ApiError::Context(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Blog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Configure blog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::resource("/blog")
            .route(web::get().to(load_blog))
            .route(web::post().to(load_blog)),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.repository.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Parse the listing parameters
///
/// Query string values take precedence over body values. Form-encoded
/// bodies are read as such, any other non-empty body as JSON.
fn parse_request(
    query: BlogListRequest,
    body: &[u8],
    content_type: &str,
    listing: &ListingSettings,
) -> Result<BlogListRequest, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        query
    } else if content_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        let form = std::str::from_utf8(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid form body: {}", e)))?;
        let form = web::Query::<BlogListRequest>::from_query(form)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid form body: {}", e)))?;
        query.or(form.into_inner())
    } else {
        let json = serde_json::from_slice::<BlogListRequest>(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid JSON: {}", e)))?;
        query.or(json)
    };

    request
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    if let Some(limit) = request.limit {
        if limit > listing.max_limit {
            return Err(ApiError::InvalidRequest(format!(
                "limit must not exceed {}",
                listing.max_limit
            )));
        }
    }

    Ok(request)
}

/// Blog listing endpoint
///
/// GET|POST /store-api/blog
///
/// Accepts `search`, `limit` and `page`. A UUID `search` loads that entry,
/// any other value is matched against the slug.
async fn load_blog(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    query: web::Query<BlogListRequest>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let context = state.contexts.resolve(
        header(&http_req, ACCESS_KEY_HEADER),
        header(&http_req, CONTEXT_TOKEN_HEADER),
        header(&http_req, LANGUAGE_ID_HEADER),
    )?;

    let request = parse_request(
        query.into_inner(),
        &body,
        http_req.content_type(),
        &state.listing,
    )?;

    tracing::info!(
        "Loading blog entries for sales channel {}: search={:?}, limit={:?}, page={:?}",
        context.sales_channel_id,
        request.search,
        request.limit,
        request.page
    );

    let criteria = Criteria::paginated(
        request.limit.unwrap_or(state.listing.default_limit),
        request.page.unwrap_or(1),
    );

    let response = state
        .route
        .load(&request, criteria, &context)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load blog entries: {}", e);
            e
        })?;

    tracing::debug!(
        "Returning {} of {} blog entries",
        response.result.elements.len(),
        response.result.total
    );

    Ok(HttpResponse::Ok()
        .insert_header((CONTEXT_TOKEN_HEADER, context.token))
        .json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySearchResult;
    use std::sync::Mutex;

    struct RecordingRepository {
        seen: Mutex<Vec<Criteria>>,
    }

    #[async_trait]
    impl BlogRepository for RecordingRepository {
        async fn search(
            &self,
            criteria: &Criteria,
            _context: &SalesChannelContext,
        ) -> Result<EntitySearchResult<BlogEntry>, RepositoryError> {
            self.seen.lock().unwrap().push(criteria.clone());
            Ok(EntitySearchResult::new(0, vec![]))
        }

        async fn health_check(&self) -> Result<bool, RepositoryError> {
            Ok(true)
        }
    }

    fn listing() -> ListingSettings {
        ListingSettings {
            default_limit: 10,
            max_limit: 100,
        }
    }

    fn context() -> SalesChannelContext {
        SalesChannelContext {
            sales_channel_id: uuid::Uuid::new_v4(),
            language_id: uuid::Uuid::new_v4(),
            default_language_id: uuid::Uuid::new_v4(),
            token: "token".to_string(),
        }
    }

    #[test]
    fn test_blog_route_is_terminal() {
        let repository = Arc::new(RecordingRepository {
            seen: Mutex::new(vec![]),
        });
        let route = BlogRoute::new(repository);

        assert!(matches!(
            route.decorated(),
            Err(BlogError::DecorationPattern("BlogRoute"))
        ));
    }

    #[actix_web::test]
    async fn test_load_passes_built_criteria() {
        let repository = Arc::new(RecordingRepository {
            seen: Mutex::new(vec![]),
        });
        let route = BlogRoute::new(repository.clone());
        let request = BlogListRequest {
            search: Some("my-post-title".to_string()),
            ..Default::default()
        };

        let response = route
            .load(&request, Criteria::paginated(10, 1), &context())
            .await
            .unwrap();
        assert_eq!(response.result.total, 0);

        let seen = repository.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].filters().len(), 1);
        assert!(seen[0].has_association("blogAuthor.salutation"));
        assert!(seen[0].has_association("blogCategories"));
    }

    #[test]
    fn test_parse_request_query_wins() {
        let query = BlogListRequest {
            search: Some("query".to_string()),
            limit: None,
            page: None,
        };
        let request = parse_request(
            query,
            br#"{"search":"body","limit":3}"#,
            "application/json",
            &listing(),
        )
        .unwrap();

        assert_eq!(request.search.as_deref(), Some("query"));
        assert_eq!(request.limit, Some(3));
    }

    #[test]
    fn test_parse_request_form_body() {
        let request = parse_request(
            BlogListRequest::default(),
            b"search=first-post&page=2",
            FORM_CONTENT_TYPE,
            &listing(),
        )
        .unwrap();

        assert_eq!(request.search.as_deref(), Some("first-post"));
        assert_eq!(request.page, Some(2));
    }

    #[test]
    fn test_parse_request_long_search() {
        let request = BlogListRequest {
            search: Some("a".repeat(300)),
            ..Default::default()
        };
        let request = parse_request(request, b"", "", &listing()).unwrap();

        assert_eq!(request.search.map(|s| s.len()), Some(300));
    }

    #[test]
    fn test_parse_request_limits() {
        let over = BlogListRequest {
            limit: Some(101),
            ..Default::default()
        };
        assert!(matches!(
            parse_request(over, b"", "", &listing()),
            Err(ApiError::InvalidRequest(_))
        ));

        assert!(matches!(
            parse_request(BlogListRequest::default(), b"{not json", "application/json", &listing()),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
