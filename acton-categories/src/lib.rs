//! acton-categories: Generic category administration for HTMX admin shells
//!
//! A category is a small labelled record (a tag, a region, a colour) that
//! content elsewhere points at. This crate lets an application declare any
//! number of category types once and manage all of them through one set of
//! screens:
//!
//! - **Registry**: category types are registered at startup and addressed
//!   over HTTP by a stable `(namespace, type_name)` pair
//! - **Permissions**: each type carries add/change/delete permissions; any
//!   of them lets a user edit the type
//! - **Forms**: an edit handler per type turns its declared fields into a
//!   validating, HTMX-aware HTML form
//! - **Screens**: index, list, create, edit and delete, rendered with askama
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_categories::prelude::*;
//!
//! struct Tag;
//!
//! impl SchemaDescribable for Tag {
//!     fn namespace() -> &'static str { "blog" }
//!     fn model_name() -> &'static str { "Tag" }
//!     fn meta() -> CategoryMeta { CategoryMeta::new("tag", "tags") }
//!     fn fields() -> Vec<FieldDef> { Vec::new() }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CategoriesConfig::load_for_service("blog")?;
//!     acton_categories::observability::init(&config.logging)?;
//!
//!     let registry = CategoryRegistry::builder().register::<Tag>().build();
//!     let state = CategoriesState::from_config(registry, config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, admin_router(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! The host application is expected to put the signed-in [`auth::AdminUser`]
//! and a [`flash::FlashQueue`] into each request's extensions.

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod menu;
pub mod observability;
pub mod pagination;
pub mod permissions;
pub mod registry;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_categories::prelude::*;
    //! ```

    pub use crate::auth::{AdminUser, CurrentUser};
    pub use crate::config::CategoriesConfig;
    pub use crate::error::{CategoryError, CategoryResult};
    pub use crate::flash::{Flash, FlashMessage, FlashQueue};
    pub use crate::forms::{EditHandler, EditHandlerCache, FormData, ValidationErrors};
    pub use crate::menu::{categories_menu_item, MenuItem};
    pub use crate::permissions::{
        user_can_edit_categories, user_can_edit_category_type, PermissionAction,
    };
    pub use crate::registry::{CategoryRegistry, CategoryType, TypeIdentifier};
    pub use crate::routes::{admin_router, category_routes};
    pub use crate::schema::{CategoryMeta, FieldDef, FieldKind, SchemaDescribable};
    pub use crate::state::CategoriesState;
    pub use crate::store::{CategoryRecord, CategoryStore, MemoryStore, SqliteStore};
    pub use crate::template::HxTemplate;
}
