//! Category schemas
//!
//! A category type describes itself through [`SchemaDescribable`]: its
//! namespace and model name, display metadata, and the ordered list of
//! editable fields. The description is resolved once, when the type is
//! registered, so nothing downstream needs runtime reflection.
//!
//! # Example
//!
//! ```rust
//! use acton_categories::schema::{CategoryMeta, FieldDef, SchemaDescribable};
//!
//! struct Colour;
//!
//! impl SchemaDescribable for Colour {
//!     fn namespace() -> &'static str {
//!         "palette"
//!     }
//!
//!     fn model_name() -> &'static str {
//!         "Colour"
//!     }
//!
//!     fn meta() -> CategoryMeta {
//!         CategoryMeta::new("colour", "colours")
//!     }
//!
//!     fn fields() -> Vec<FieldDef> {
//!         vec![FieldDef::char("hex", "Hex code", 7).required()]
//!     }
//! }
//! ```

use crate::forms::ValidationErrors;
use crate::store::CategoryRecord;

/// Name of the display-label field every category carries
pub const CATEGORY_NAME_FIELD: &str = "category_name";

/// Maximum length of [`CATEGORY_NAME_FIELD`]
pub const CATEGORY_NAME_MAX_LENGTH: usize = 60;

/// Human-readable labels for a category type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMeta {
    /// Singular label, e.g. "test category"
    pub verbose_name: String,
    /// Plural label, e.g. "test categories"
    pub verbose_name_plural: String,
    /// Optional description shown on the index screen
    pub description: Option<String>,
}

impl CategoryMeta {
    /// Create metadata from singular and plural labels
    #[must_use]
    pub fn new(verbose_name: impl Into<String>, verbose_name_plural: impl Into<String>) -> Self {
        Self {
            verbose_name: verbose_name.into(),
            verbose_name_plural: verbose_name_plural.into(),
            description: None,
        }
    }

    /// Attach a description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Storage and widget kind of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text with a length cap
    Char {
        /// Maximum number of characters
        max_length: usize,
    },
    /// Multi-line text
    Text,
    /// Whole number
    Integer,
    /// Checkbox
    Boolean,
    /// One of a fixed set of `(value, label)` options
    Choice(Vec<(String, String)>),
    /// Structural reference to another table (site, tenant, ...)
    ///
    /// Never rendered by the form builder.
    Relation,
}

/// A single declared field of a category type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, used as the form key and the storage key
    pub name: String,
    /// Label shown next to the widget
    pub label: String,
    /// Field kind
    pub kind: FieldKind,
    /// Whether an empty submission is rejected
    pub required: bool,
    /// Help text rendered below the widget
    pub help_text: Option<String>,
}

impl FieldDef {
    fn with_kind(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            help_text: None,
        }
    }

    /// Single-line text field
    #[must_use]
    pub fn char(name: impl Into<String>, label: impl Into<String>, max_length: usize) -> Self {
        Self::with_kind(name, label, FieldKind::Char { max_length })
    }

    /// Multi-line text field
    #[must_use]
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(name, label, FieldKind::Text)
    }

    /// Integer field
    #[must_use]
    pub fn integer(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(name, label, FieldKind::Integer)
    }

    /// Boolean (checkbox) field
    #[must_use]
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(name, label, FieldKind::Boolean)
    }

    /// Choice field
    #[must_use]
    pub fn choice<V, L>(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = (V, L)>,
    ) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(value, label)| (value.into(), label.into()))
            .collect();
        Self::with_kind(name, label, FieldKind::Choice(options))
    }

    /// Structural relation field
    #[must_use]
    pub fn relation(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(name, label, FieldKind::Relation)
    }

    /// Mark the field as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set help text
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// The base `category_name` field shared by every category type
    #[must_use]
    pub fn category_name() -> Self {
        Self::char(CATEGORY_NAME_FIELD, "Category name", CATEGORY_NAME_MAX_LENGTH).required()
    }
}

/// Capability every category type implements
///
/// Replaces duck-typed access to a model's field list: the registry calls
/// these functions exactly once per type at registration time.
pub trait SchemaDescribable: 'static {
    /// Namespace the type belongs to (the application label)
    fn namespace() -> &'static str;

    /// Model name; its lowercase form addresses the type in URLs
    fn model_name() -> &'static str;

    /// Display labels and description
    fn meta() -> CategoryMeta;

    /// Type-specific fields, in display order
    ///
    /// `category_name` is added automatically and must not be listed here.
    fn fields() -> Vec<FieldDef>;

    /// Whole-record validation run after field validation succeeds
    ///
    /// Errors not tied to a field belong under
    /// [`ValidationErrors::NON_FIELD_ERRORS`].
    fn clean(_record: &CategoryRecord, _errors: &mut ValidationErrors) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_field() {
        let field = FieldDef::category_name();
        assert_eq!(field.name, "category_name");
        assert!(field.required);
        assert_eq!(field.kind, FieldKind::Char { max_length: 60 });
    }

    #[test]
    fn test_choice_builder() {
        let field = FieldDef::choice("size", "Size", [("s", "Small"), ("l", "Large")]).required();
        match field.kind {
            FieldKind::Choice(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[1], ("l".to_string(), "Large".to_string()));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(field.required);
    }

    #[test]
    fn test_meta_description() {
        let meta = CategoryMeta::new("tag", "tags").description("Free-form labels");
        assert_eq!(meta.description.as_deref(), Some("Free-form labels"));
    }
}
