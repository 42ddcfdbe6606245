//! Shared state of the category screens
//!
//! Everything a handler needs travels in [`CategoriesState`]: the registry,
//! the store, the edit handler cache and the configuration. There is no
//! module-level global, so each test can build an isolated state.

use std::fmt;
use std::sync::Arc;

use crate::config::CategoriesConfig;
use crate::error::CategoryResult;
use crate::forms::EditHandlerCache;
use crate::registry::CategoryRegistry;
use crate::store::{CategoryStore, MemoryStore, SqliteStore};

/// State shared by every category handler
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use acton_categories::{
///     config::CategoriesConfig, registry::CategoryRegistry, state::CategoriesState,
///     store::MemoryStore,
/// };
///
/// let state = CategoriesState::new(
///     CategoryRegistry::new(),
///     Arc::new(MemoryStore::new()),
///     CategoriesConfig::default(),
/// );
/// assert_eq!(state.config().page_size, 20);
/// ```
#[derive(Clone)]
pub struct CategoriesState {
    registry: Arc<CategoryRegistry>,
    store: Arc<dyn CategoryStore>,
    edit_handlers: Arc<EditHandlerCache>,
    config: Arc<CategoriesConfig>,
}

impl CategoriesState {
    /// Assemble state from its parts
    #[must_use]
    pub fn new(
        registry: CategoryRegistry,
        store: Arc<dyn CategoryStore>,
        config: CategoriesConfig,
    ) -> Self {
        let edit_handlers = EditHandlerCache::new(config.excluded_fields.clone());
        Self {
            registry: Arc::new(registry),
            store,
            edit_handlers: Arc::new(edit_handlers),
            config: Arc::new(config),
        }
    }

    /// Assemble state, picking the store the configuration selects
    ///
    /// A configured `database_url` opens a [`SqliteStore`]; otherwise records
    /// live in a [`MemoryStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn from_config(
        registry: CategoryRegistry,
        config: CategoriesConfig,
    ) -> CategoryResult<Self> {
        let store: Arc<dyn CategoryStore> = match config.database_url.as_deref() {
            Some(url) => Arc::new(SqliteStore::connect(url).await?),
            None => {
                tracing::warn!("No database_url configured; categories are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(registry, store, config))
    }

    /// Registered category types
    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Record storage
    #[must_use]
    pub fn store(&self) -> &dyn CategoryStore {
        self.store.as_ref()
    }

    /// Edit handler memo
    #[must_use]
    pub fn edit_handlers(&self) -> &EditHandlerCache {
        &self.edit_handlers
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &CategoriesConfig {
        &self.config
    }
}

impl fmt::Debug for CategoriesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoriesState")
            .field("registry", &self.registry)
            .field("edit_handlers", &self.edit_handlers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestCategory;

    #[tokio::test]
    async fn test_from_config_defaults_to_memory() {
        let registry = CategoryRegistry::builder().register::<TestCategory>().build();
        let state = CategoriesState::from_config(registry, CategoriesConfig::default())
            .await
            .unwrap();

        assert_eq!(state.registry().len(), 1);
        assert!(state.edit_handlers().is_empty());
    }

    #[tokio::test]
    async fn test_from_config_opens_sqlite() {
        let config = CategoriesConfig {
            database_url: Some("sqlite::memory:".into()),
            ..CategoriesConfig::default()
        };
        let state = CategoriesState::from_config(CategoryRegistry::new(), config)
            .await
            .unwrap();

        let identifier = crate::registry::TypeIdentifier::new("blog", "tag");
        assert_eq!(state.store().count(&identifier).await.unwrap(), 0);
    }

    #[test]
    fn test_clones_share_caches() {
        let state = CategoriesState::new(
            CategoryRegistry::builder().register::<TestCategory>().build(),
            Arc::new(MemoryStore::new()),
            CategoriesConfig::default(),
        );
        let clone = state.clone();

        let category_type = &state.registry().list_registered_types()[0];
        let first = state.edit_handlers().edit_handler_for(category_type);
        let second = clone.edit_handlers().edit_handler_for(category_type);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
