//! Admin navigation entry
//!
//! The category screens contribute one item to the admin shell's menu. It is
//! shown only to users with admin access who may edit at least one registered
//! category type.

use serde::Serialize;

use crate::auth::AdminUser;
use crate::config::CategoriesConfig;
use crate::permissions::user_can_edit_categories;
use crate::registry::CategoryRegistry;
use crate::routes::CategoryUrls;

/// One entry of the admin shell's navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Visible label
    pub label: String,
    /// Link target
    pub url: String,
    /// CSS classes, typically an icon
    pub classnames: String,
    /// Sort position; lower comes first
    pub order: i32,
}

impl MenuItem {
    /// Whether `user` should see this entry
    #[must_use]
    pub fn is_shown(&self, user: &AdminUser, registry: &CategoryRegistry) -> bool {
        user.has_admin_access() && user_can_edit_categories(user, registry)
    }
}

/// Menu entry pointing at the category index
///
/// ```rust
/// use acton_categories::{config::CategoriesConfig, menu::categories_menu_item};
///
/// let item = categories_menu_item(&CategoriesConfig::default());
/// assert_eq!(item.label, "Categories");
/// assert_eq!(item.url, "/admin/categories/");
/// assert_eq!(item.order, 500);
/// ```
#[must_use]
pub fn categories_menu_item(config: &CategoriesConfig) -> MenuItem {
    MenuItem {
        label: config.menu.label.clone(),
        url: CategoryUrls::index(config.mount_path()),
        classnames: config.menu.classnames.clone(),
        order: config.menu.order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionAction;
    use crate::registry::TypeIdentifier;
    use crate::testing::TestCategory;

    #[test]
    fn test_default_menu_item() {
        let item = categories_menu_item(&CategoriesConfig::default());
        assert_eq!(item.classnames, "icon icon-doc-empty");
        assert_eq!(item.url, "/admin/categories/");
    }

    #[test]
    fn test_menu_item_follows_config() {
        let mut config = CategoriesConfig {
            url_prefix: "/cms/taxonomy/".into(),
            ..CategoriesConfig::default()
        };
        config.menu.label = "Taxonomy".into();

        let item = categories_menu_item(&config);
        assert_eq!(item.label, "Taxonomy");
        assert_eq!(item.url, "/cms/taxonomy/");
    }

    #[test]
    fn test_visibility_follows_permissions() {
        let registry = CategoryRegistry::builder().register::<TestCategory>().build();
        let item = categories_menu_item(&CategoriesConfig::default());

        let identifier = TypeIdentifier::new("taxonomy", "testcategory");
        let editor = AdminUser::new(2, "editor")
            .with_permission("admin:access")
            .with_permission(PermissionAction::Add.codename(&identifier));
        let outsider = AdminUser::new(3, "outsider");

        assert!(item.is_shown(&editor, &registry));
        assert!(item.is_shown(&AdminUser::superuser(1, "root"), &registry));
        assert!(!item.is_shown(&outsider, &registry));
    }

    #[test]
    fn test_hidden_without_admin_access() {
        let registry = CategoryRegistry::builder().register::<TestCategory>().build();
        let item = categories_menu_item(&CategoriesConfig::default());

        let identifier = TypeIdentifier::new("taxonomy", "testcategory");
        let editor =
            AdminUser::new(2, "editor").with_permission(PermissionAction::Add.codename(&identifier));
        assert!(!item.is_shown(&editor, &registry));
    }

    #[test]
    fn test_hidden_when_nothing_registered() {
        let item = categories_menu_item(&CategoriesConfig::default());
        assert!(!item.is_shown(&AdminUser::superuser(1, "root"), &CategoryRegistry::new()));
    }
}
