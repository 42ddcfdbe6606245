//! Category forms
//!
//! This module turns a category type's declared fields into an editing
//! form:
//! - [`EditHandler`] derives one panel per editable field
//! - [`CategoryForm`] validates submitted data against those panels
//! - [`FormBuilder`] and [`FormRenderer`] render the form with inline errors
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use acton_categories::forms::{EditHandlerCache, FormData};
//! use acton_categories::store::CategoryRecord;
//!
//! let cache = EditHandlerCache::new(vec!["site".into()]);
//! let handler = cache.edit_handler_for(&category_type);
//!
//! let form = handler
//!     .get_form_class()
//!     .bind(Some(submitted), CategoryRecord::default());
//!
//! if form.is_valid() {
//!     form.save(store.as_ref(), &identifier).await?;
//! } else {
//!     let html = form.render("/admin/categories/blog/tag/new/", "Create");
//! }
//! ```
//!
//! # Validation Errors
//!
//! ```rust
//! use acton_categories::forms::{FormBuilder, FormField, InputType, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! errors.add("category_name", "This field is required.");
//!
//! let html = FormBuilder::new("/save", "POST")
//!     .errors(&errors)
//!     .add_field(FormField::input("category_name", InputType::Text))
//!     .build();
//!
//! assert!(html.contains("This field is required."));
//! ```

mod builder;
mod edit_handler;
mod error;
mod field;
mod render;

pub use builder::{FormBuilder, HtmxFormAttrs};
pub use edit_handler::{
    CategoryForm, CategoryFormFactory, EditHandler, EditHandlerCache, FieldPanel, FormData,
};
pub use error::{FieldError, ValidationErrors};
pub use field::{FormField, InputType, SelectOption, WidgetKind};
pub use render::{FormRenderOptions, FormRenderer};
