//! Page templates of the category screens

use askama::Template;

use crate::flash::FlashMessage;
use crate::pagination::Page;

/// One category type on the index screen
#[derive(Debug, Clone)]
pub struct CategoryTypeEntry {
    /// Capitalised singular label
    pub name: String,
    /// Description, empty when the type has none
    pub description: String,
    /// List view URL
    pub url: String,
}

/// One record on the list screen
#[derive(Debug, Clone)]
pub struct ItemRow {
    /// Display label
    pub name: String,
    /// Edit view URL
    pub edit_url: String,
    /// Delete confirmation URL
    pub delete_url: String,
}

/// Index of category types the user may edit
#[derive(Debug, Template)]
#[template(path = "categories/index.html")]
pub struct IndexTemplate {
    /// Mount point of the category screens
    pub url_prefix: String,
    /// Pending notifications
    pub messages: Vec<FlashMessage>,
    /// Visible category types
    pub category_types: Vec<CategoryTypeEntry>,
}

/// Records of one category type
#[derive(Debug, Template)]
#[template(path = "categories/type_index.html")]
pub struct TypeIndexTemplate {
    /// Mount point of the category screens
    pub url_prefix: String,
    /// Pending notifications
    pub messages: Vec<FlashMessage>,
    /// Capitalised singular label
    pub category_type_name: String,
    /// Capitalised plural label
    pub category_type_name_plural: String,
    /// This page's URL without query string
    pub list_url: String,
    /// Create view URL
    pub add_url: String,
    /// Records on the current page
    pub items: Vec<ItemRow>,
    /// Current page
    pub page: Page,
}

/// Create form
#[derive(Debug, Template)]
#[template(path = "categories/create.html")]
pub struct CreateTemplate {
    /// Mount point of the category screens
    pub url_prefix: String,
    /// Pending notifications
    pub messages: Vec<FlashMessage>,
    /// Capitalised singular label
    pub category_type_name: String,
    /// Rendered form
    pub form_html: String,
    /// List view URL
    pub list_url: String,
}

/// Edit form
#[derive(Debug, Template)]
#[template(path = "categories/edit.html")]
pub struct EditTemplate {
    /// Mount point of the category screens
    pub url_prefix: String,
    /// Pending notifications
    pub messages: Vec<FlashMessage>,
    /// Capitalised singular label
    pub category_type_name: String,
    /// Display label of the record
    pub instance_name: String,
    /// Rendered form
    pub form_html: String,
    /// Delete confirmation URL
    pub delete_url: String,
    /// List view URL
    pub list_url: String,
}

/// Delete confirmation
#[derive(Debug, Template)]
#[template(path = "categories/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    /// Mount point of the category screens
    pub url_prefix: String,
    /// Pending notifications
    pub messages: Vec<FlashMessage>,
    /// Capitalised singular label
    pub category_type_name: String,
    /// Display label of the record
    pub instance_name: String,
    /// URL the confirmation posts to
    pub action_url: String,
    /// List view URL
    pub list_url: String,
}
