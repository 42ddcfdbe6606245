//! Form builder API with fluent interface
//!
//! Provides a builder for assembling category edit forms with HTMX
//! attributes and inline validation errors.

use super::error::ValidationErrors;
use super::field::{FormField, InputType};
use super::render::{FormRenderOptions, FormRenderer};

/// Builder for constructing HTML forms
///
/// # Examples
///
/// ```rust
/// use acton_categories::forms::{FormBuilder, FormField, InputType};
///
/// let mut name = FormField::input("category_name", InputType::Text);
/// name.label = Some("Category name".into());
/// name.required = true;
///
/// let html = FormBuilder::new("/admin/categories/blog/tag/new/", "POST")
///     .id("category-form")
///     .add_field(name)
///     .submit("Save")
///     .build();
///
/// assert!(html.contains(r#"name="category_name""#));
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder<'a> {
    /// Form action URL
    pub(crate) action: String,
    /// HTTP method
    pub(crate) method: String,
    /// Form ID
    pub(crate) id: Option<String>,
    /// CSS classes
    pub(crate) class: Option<String>,
    /// Form fields
    pub(crate) fields: Vec<FormField>,
    /// Submit button text
    pub(crate) submit_text: Option<String>,
    /// Validation errors
    pub(crate) errors: Option<&'a ValidationErrors>,
    /// HTMX attributes
    pub(crate) htmx: HtmxFormAttrs,
    /// Disable browser validation
    pub(crate) novalidate: bool,
}

/// HTMX attributes for the form element
#[derive(Debug, Clone, Default)]
pub struct HtmxFormAttrs {
    /// hx-post URL
    pub post: Option<String>,
    /// hx-target selector
    pub target: Option<String>,
}

impl<'a> FormBuilder<'a> {
    /// Create a new form builder with action and method
    #[must_use]
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            id: None,
            class: None,
            fields: Vec::new(),
            submit_text: None,
            errors: None,
            htmx: HtmxFormAttrs::default(),
            novalidate: false,
        }
    }

    /// Set the form ID
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the form CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set validation errors to display
    #[must_use]
    pub const fn errors(mut self, errors: &'a ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Set the submit button text
    #[must_use]
    pub fn submit(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Disable browser validation (add novalidate attribute)
    ///
    /// Category forms are validated server-side so the re-rendered form can
    /// show every error at once.
    #[must_use]
    pub const fn novalidate(mut self) -> Self {
        self.novalidate = true;
        self
    }

    /// Set hx-post attribute
    #[must_use]
    pub fn htmx_post(mut self, url: impl Into<String>) -> Self {
        self.htmx.post = Some(url.into());
        self
    }

    /// Set hx-target attribute
    #[must_use]
    pub fn htmx_target(mut self, selector: impl Into<String>) -> Self {
        self.htmx.target = Some(selector.into());
        self
    }

    /// Add a hidden field
    #[must_use]
    pub fn hidden(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = FormField::input(name, InputType::Hidden);
        field.value = Some(value.into());
        self.fields.push(field);
        self
    }

    /// Add a pre-built field
    #[must_use]
    pub fn add_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Build the form HTML
    #[must_use]
    pub fn build(self) -> String {
        FormRenderer::render(&self)
    }

    /// Build the form HTML with custom rendering options
    #[must_use]
    pub fn build_with_options(self, options: &FormRenderOptions) -> String {
        FormRenderer::render_with_options(&self, options)
    }
}
