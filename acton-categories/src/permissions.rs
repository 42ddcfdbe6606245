//! Category permissions
//!
//! Each category type carries three permissions, one per
//! [`PermissionAction`]. A user may edit a type when they hold any of them,
//! or when they are a superuser.
//!
//! Codenames take the form `"{namespace}.{name}:{action}"`:
//!
//! ```rust
//! use acton_categories::permissions::PermissionAction;
//! use acton_categories::registry::TypeIdentifier;
//!
//! let tags = TypeIdentifier::new("blog", "tag");
//! assert_eq!(PermissionAction::Change.codename(&tags), "blog.tag:change");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::AdminUser;
use crate::registry::{CategoryRegistry, TypeIdentifier};

/// Kind of change a permission allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Create new records
    Add,
    /// Edit existing records
    Change,
    /// Remove records
    Delete,
}

impl PermissionAction {
    /// Every action, in catalogue order
    pub const ALL: [Self; 3] = [Self::Add, Self::Change, Self::Delete];

    /// Lowercase action name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }

    /// Permission codename for this action on `category_type`
    #[must_use]
    pub fn codename(self, category_type: &TypeIdentifier) -> String {
        format!("{category_type}:{}", self.as_str())
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `user` may edit records of `category_type`
#[must_use]
pub fn user_can_edit_category_type(user: &AdminUser, category_type: &TypeIdentifier) -> bool {
    user.is_superuser()
        || PermissionAction::ALL
            .iter()
            .any(|action| user.has_permission(&action.codename(category_type)))
}

/// Whether `user` may edit at least one registered category type
///
/// Decides whether the navigation entry is shown.
#[must_use]
pub fn user_can_edit_categories(user: &AdminUser, registry: &CategoryRegistry) -> bool {
    registry
        .category_identifiers()
        .iter()
        .any(|identifier| user_can_edit_category_type(user, identifier))
}

/// Every permission codename of every registered type
///
/// Hosts seed their permission tables from this list.
#[must_use]
pub fn category_permissions(registry: &CategoryRegistry) -> Vec<String> {
    registry
        .category_identifiers()
        .iter()
        .flat_map(|identifier| {
            PermissionAction::ALL
                .iter()
                .map(move |action| action.codename(identifier))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, TestCategory};

    fn registry() -> CategoryRegistry {
        CategoryRegistry::builder()
            .register::<TestCategory>()
            .register::<Fixture<1>>()
            .build()
    }

    fn test_category() -> TypeIdentifier {
        TypeIdentifier::new("taxonomy", "testcategory")
    }

    #[test]
    fn test_superuser_can_edit_everything() {
        let user = AdminUser::superuser(1, "root");
        assert!(user_can_edit_category_type(&user, &test_category()));
        assert!(user_can_edit_categories(&user, &registry()));
    }

    #[test]
    fn test_any_action_grants_edit() {
        for action in PermissionAction::ALL {
            let user = AdminUser::new(2, "editor").with_permission(action.codename(&test_category()));
            assert!(user_can_edit_category_type(&user, &test_category()), "{action}");
        }
    }

    #[test]
    fn test_permission_is_scoped_to_type() {
        let user = AdminUser::new(2, "editor").with_permission("fixtures.fixture1:change");
        assert!(!user_can_edit_category_type(&user, &test_category()));
        assert!(user_can_edit_category_type(
            &user,
            &TypeIdentifier::new("fixtures", "fixture1")
        ));
    }

    #[test]
    fn test_aggregate_matches_per_type() {
        let registry = registry();
        let nobody = AdminUser::new(3, "nobody").with_permission("admin:access");
        assert!(!user_can_edit_categories(&nobody, &registry));

        let editor = nobody.clone().with_permission("taxonomy.testcategory:delete");
        assert!(user_can_edit_categories(&editor, &registry));

        // Permissions on unregistered types do not count
        let stray = AdminUser::new(4, "stray").with_permission("other.thing:add");
        assert!(!user_can_edit_categories(&stray, &registry));
    }

    #[test]
    fn test_empty_registry_hides_categories() {
        let user = AdminUser::superuser(1, "root");
        assert!(!user_can_edit_categories(&user, &CategoryRegistry::new()));
    }

    #[test]
    fn test_category_permissions_catalogue() {
        let permissions = category_permissions(&registry());
        assert_eq!(permissions.len(), 6);
        assert!(permissions.contains(&"taxonomy.testcategory:add".to_string()));
        assert!(permissions.contains(&"fixtures.fixture1:delete".to_string()));
    }
}
