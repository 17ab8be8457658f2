// Route exports
pub mod blog;

use actix_web::web;

pub use blog::{AbstractBlogRoute, ApiError, AppState, BlogError, BlogRoute};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store-api")
            .configure(blog::configure),
    );
}
