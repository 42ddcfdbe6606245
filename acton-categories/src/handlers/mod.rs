//! HTTP handlers for the category screens
//!
//! Every handler that addresses a category type runs the same three steps
//! before doing anything else:
//!
//! 1. Resolve `(namespace, type_name)` against the registry, or 404
//! 2. Check the user's permission for that type, or 403
//! 3. Act
//!
//! No verb skips a step. Record ids that are not found within the resolved
//! type are a 404 as well.

use std::sync::Arc;

use crate::auth::AdminUser;
use crate::error::{CategoryError, CategoryResult};
use crate::permissions::user_can_edit_category_type;
use crate::registry::{is_word, CategoryType, TypeIdentifier};
use crate::state::CategoriesState;
use crate::store::CategoryRecord;

pub mod categories;

pub use categories::{
    create, create_form, delete, delete_confirm, edit, edit_form, index, list,
};

/// A category type addressed by a request
#[derive(Debug, Clone)]
pub(crate) struct ResolvedType {
    pub(crate) category_type: Arc<CategoryType>,
    pub(crate) identifier: TypeIdentifier,
}

impl ResolvedType {
    /// Capitalised singular label
    pub(crate) fn name(&self) -> String {
        self.category_type.verbose_name_capitalized()
    }
}

/// Resolve a URL-supplied identifier to a registered type
pub(crate) fn resolve_type(
    state: &CategoriesState,
    namespace: &str,
    type_name: &str,
) -> CategoryResult<ResolvedType> {
    if !is_word(namespace) || !is_word(type_name) {
        return Err(CategoryError::NotFound(format!("{namespace}.{type_name}")));
    }

    let category_type = state
        .registry()
        .lookup(namespace, type_name)
        .ok_or_else(|| CategoryError::NotFound(format!("{namespace}.{type_name}")))?;
    let identifier = state.registry().resolve_identifier(&category_type);

    Ok(ResolvedType {
        category_type,
        identifier,
    })
}

/// Reject users without a permission on the resolved type
pub(crate) fn authorize(user: &AdminUser, resolved: &ResolvedType) -> CategoryResult<()> {
    if user_can_edit_category_type(user, &resolved.identifier) {
        return Ok(());
    }

    tracing::warn!(
        user_id = user.id,
        namespace = %resolved.identifier.namespace,
        type_name = %resolved.identifier.name,
        "User attempted to access category type without permission"
    );
    Err(CategoryError::Forbidden(format!(
        "user {} on {}",
        user.id, resolved.identifier
    )))
}

/// Parse a record id path segment (`\d+`)
pub(crate) fn parse_id(raw: &str) -> CategoryResult<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CategoryError::NotFound(format!("record {raw}")));
    }
    raw.parse()
        .map_err(|_| CategoryError::NotFound(format!("record {raw}")))
}

/// Fetch a record of the resolved type
pub(crate) async fn get_instance(
    state: &CategoriesState,
    resolved: &ResolvedType,
    raw_id: &str,
) -> CategoryResult<CategoryRecord> {
    let id = parse_id(raw_id)?;
    state
        .store()
        .get(&resolved.identifier, id)
        .await?
        .ok_or_else(|| CategoryError::NotFound(format!("{} #{id}", resolved.identifier)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoriesConfig;
    use crate::registry::CategoryRegistry;
    use crate::store::MemoryStore;
    use crate::testing::TestCategory;

    fn state() -> CategoriesState {
        CategoriesState::new(
            CategoryRegistry::builder().register::<TestCategory>().build(),
            Arc::new(MemoryStore::new()),
            CategoriesConfig::default(),
        )
    }

    #[test]
    fn test_resolve_registered_type() {
        let resolved = resolve_type(&state(), "taxonomy", "testcategory").unwrap();
        assert!(resolved.category_type.is::<TestCategory>());
        assert_eq!(resolved.name(), "Test Category");
    }

    #[test]
    fn test_resolve_unknown_type_is_not_found() {
        let err = resolve_type(&state(), "taxonomy", "foo").unwrap_err();
        assert!(matches!(err, CategoryError::NotFound(_)));

        let err = resolve_type(&state(), "taxo-nomy", "testcategory").unwrap_err();
        assert!(matches!(err, CategoryError::NotFound(_)));
    }

    #[test]
    fn test_authorize() {
        let resolved = resolve_type(&state(), "taxonomy", "testcategory").unwrap();

        assert!(authorize(&AdminUser::superuser(1, "root"), &resolved).is_ok());

        let outsider = AdminUser::new(2, "outsider").with_permission("admin:access");
        assert!(matches!(
            authorize(&outsider, &resolved),
            Err(CategoryError::Forbidden(_))
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("").is_err());
        assert!(parse_id("-1").is_err());
        assert!(parse_id("4a").is_err());
        assert!(parse_id("99999999999999999999999").is_err());
    }
}
