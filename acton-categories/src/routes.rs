//! Route registration
//!
//! Mounts the five category endpoints:
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`handlers::index`] |
//! | GET | `/{namespace}/{type_name}/` | [`handlers::list`] |
//! | GET, POST | `/{namespace}/{type_name}/new/` | [`handlers::create_form`], [`handlers::create`] |
//! | GET, POST | `/{namespace}/{type_name}/{id}/` | [`handlers::edit_form`], [`handlers::edit`] |
//! | GET, POST | `/{namespace}/{type_name}/{id}/delete/` | [`handlers::delete_confirm`], [`handlers::delete`] |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use acton_categories::{
//!     config::CategoriesConfig, registry::CategoryRegistry, routes::admin_router,
//!     state::CategoriesState, store::MemoryStore,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let state = CategoriesState::new(
//!     CategoryRegistry::new(),
//!     Arc::new(MemoryStore::new()),
//!     CategoriesConfig::default(),
//! );
//! let app = axum::Router::new().merge(admin_router(state));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use axum::{response::Redirect, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::registry::TypeIdentifier;
use crate::state::CategoriesState;

/// Category endpoints mounted at the root
///
/// Links rendered by the handlers still start with the configured
/// `url_prefix`, so hosts that nest this router should nest it there.
#[must_use]
pub fn category_routes(state: CategoriesState) -> Router {
    mount("", state)
}

/// Category endpoints mounted under the configured `url_prefix`
///
/// Requests to the bare prefix are redirected to the index. Every request
/// is traced.
#[must_use]
pub fn admin_router(state: CategoriesState) -> Router {
    let prefix = state.config().mount_path().to_string();
    let mut router = mount(&prefix, state);

    if !prefix.is_empty() {
        let index = format!("{prefix}/");
        router = router.route(
            &prefix,
            get(move || std::future::ready(Redirect::permanent(&index))),
        );
    }

    router.layer(TraceLayer::new_for_http())
}

fn mount(prefix: &str, state: CategoriesState) -> Router {
    Router::new()
        .route(&format!("{prefix}/"), get(handlers::index))
        .route(
            &format!("{prefix}/{{namespace}}/{{type_name}}/"),
            get(handlers::list),
        )
        .route(
            &format!("{prefix}/{{namespace}}/{{type_name}}/new/"),
            get(handlers::create_form).post(handlers::create),
        )
        .route(
            &format!("{prefix}/{{namespace}}/{{type_name}}/{{id}}/"),
            get(handlers::edit_form).post(handlers::edit),
        )
        .route(
            &format!("{prefix}/{{namespace}}/{{type_name}}/{{id}}/delete/"),
            get(handlers::delete_confirm).post(handlers::delete),
        )
        .with_state(state)
}

/// Reverse URLs for one category type
#[derive(Debug, Clone, Copy)]
pub struct CategoryUrls<'a> {
    prefix: &'a str,
    identifier: &'a TypeIdentifier,
}

impl<'a> CategoryUrls<'a> {
    /// URLs under `prefix`, which must not end with a slash
    #[must_use]
    pub const fn new(prefix: &'a str, identifier: &'a TypeIdentifier) -> Self {
        Self { prefix, identifier }
    }

    /// Index of all category types
    #[must_use]
    pub fn index(prefix: &str) -> String {
        format!("{prefix}/")
    }

    /// Record list
    #[must_use]
    pub fn list(&self) -> String {
        format!(
            "{}/{}/{}/",
            self.prefix, self.identifier.namespace, self.identifier.name
        )
    }

    /// Create form
    #[must_use]
    pub fn add(&self) -> String {
        format!("{}new/", self.list())
    }

    /// Edit form of one record
    #[must_use]
    pub fn edit(&self, id: i64) -> String {
        format!("{}{id}/", self.list())
    }

    /// Delete confirmation of one record
    #[must_use]
    pub fn delete(&self, id: i64) -> String {
        format!("{}{id}/delete/", self.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_urls() {
        let identifier = TypeIdentifier::new("blog", "tag");
        let urls = CategoryUrls::new("/admin/categories", &identifier);

        assert_eq!(CategoryUrls::index("/admin/categories"), "/admin/categories/");
        assert_eq!(urls.list(), "/admin/categories/blog/tag/");
        assert_eq!(urls.add(), "/admin/categories/blog/tag/new/");
        assert_eq!(urls.edit(7), "/admin/categories/blog/tag/7/");
        assert_eq!(urls.delete(7), "/admin/categories/blog/tag/7/delete/");
    }

    #[test]
    fn test_urls_at_root() {
        let identifier = TypeIdentifier::new("blog", "tag");
        assert_eq!(CategoryUrls::new("", &identifier).list(), "/blog/tag/");
        assert_eq!(CategoryUrls::index(""), "/");
    }
}
