//! Edit handlers
//!
//! An [`EditHandler`] is the editing layout of one category type: one
//! [`FieldPanel`] per editable field. It produces a [`CategoryFormFactory`]
//! that binds submitted data to an instance, validates it, and renders it.
//!
//! Handlers are derived once per type and shared through
//! [`EditHandlerCache`], which always hands out the same `Arc` for a type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::builder::FormBuilder;
use super::error::ValidationErrors;
use super::field::FormField;
use crate::error::{CategoryError, CategoryResult};
use crate::registry::{CategoryType, TypeIdentifier};
use crate::schema::{FieldDef, FieldKind};
use crate::store::{CategoryRecord, CategoryStore};

/// Submitted form fields, keyed by field name
pub type FormData = HashMap<String, String>;

/// One editable field of a category type
#[derive(Debug, Clone)]
pub struct FieldPanel {
    def: FieldDef,
}

impl FieldPanel {
    /// Field name
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.def.name
    }

    /// Declared field definition
    #[must_use]
    pub const fn def(&self) -> &FieldDef {
        &self.def
    }

    fn widget(&self) -> Option<FormField> {
        FormField::from_def(&self.def)
    }
}

/// Editing layout for one category type
#[derive(Debug)]
pub struct EditHandler {
    category_type: Arc<CategoryType>,
    panels: Vec<FieldPanel>,
}

impl EditHandler {
    /// Derive the layout from the type's declared fields
    ///
    /// Fields named in `excluded` and structural relations are left out.
    #[must_use]
    pub fn for_type(category_type: &Arc<CategoryType>, excluded: &[String]) -> Self {
        let panels = category_type
            .fields()
            .iter()
            .filter(|def| def.kind != FieldKind::Relation)
            .filter(|def| !excluded.iter().any(|name| *name == def.name))
            .map(|def| FieldPanel { def: def.clone() })
            .collect();

        Self {
            category_type: Arc::clone(category_type),
            panels,
        }
    }

    /// The type this handler edits
    #[must_use]
    pub const fn category_type(&self) -> &Arc<CategoryType> {
        &self.category_type
    }

    /// Panels in display order
    #[must_use]
    pub fn panels(&self) -> &[FieldPanel] {
        &self.panels
    }

    /// Names of the editable fields in display order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.panels.iter().map(FieldPanel::field_name).collect()
    }

    /// Form factory bound to this layout
    #[must_use]
    pub fn get_form_class(self: &Arc<Self>) -> CategoryFormFactory {
        CategoryFormFactory {
            handler: Arc::clone(self),
        }
    }
}

/// Produces [`CategoryForm`]s for one edit handler
#[derive(Debug, Clone)]
pub struct CategoryFormFactory {
    handler: Arc<EditHandler>,
}

impl CategoryFormFactory {
    /// Bind submitted data to an instance
    ///
    /// With `data == None` the form is unbound: it is never valid and
    /// renders the instance's current values. A bound form is validated
    /// immediately.
    #[must_use]
    pub fn bind(&self, data: Option<FormData>, instance: CategoryRecord) -> CategoryForm {
        let mut form = CategoryForm {
            handler: Arc::clone(&self.handler),
            data,
            instance,
            errors: ValidationErrors::new(),
        };
        form.full_clean();
        form
    }
}

/// A category form bound to one instance
#[derive(Debug)]
pub struct CategoryForm {
    handler: Arc<EditHandler>,
    data: Option<FormData>,
    instance: CategoryRecord,
    errors: ValidationErrors,
}

impl CategoryForm {
    /// Whether data was submitted
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Bound and free of errors
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_bound() && !self.errors.has_errors()
    }

    /// Validation errors found while binding
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The instance, carrying cleaned values once the form is valid
    #[must_use]
    pub const fn instance(&self) -> &CategoryRecord {
        &self.instance
    }

    /// Persist the instance as one atomic write
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Store`] if the form is not valid, or the
    /// store's error if the write fails.
    pub async fn save(
        self,
        store: &dyn CategoryStore,
        category_type: &TypeIdentifier,
    ) -> CategoryResult<CategoryRecord> {
        if !self.is_valid() {
            return Err(CategoryError::Store(format!(
                "cannot save an invalid {category_type} form"
            )));
        }
        store.save(category_type, self.instance).await
    }

    /// Render the form, keeping submitted values and inline errors
    #[must_use]
    pub fn render(&self, action: &str, submit: &str) -> String {
        let mut builder = FormBuilder::new(action, "POST")
            .id("category-form")
            .class("category-form")
            .novalidate()
            .htmx_post(action)
            .htmx_target("#category-main")
            .submit(submit);

        for panel in &self.handler.panels {
            let Some(mut field) = panel.widget() else {
                continue;
            };
            field.set_value(self.display_value(panel.field_name()));
            builder = builder.add_field(field);
        }

        if self.is_bound() {
            builder = builder.errors(&self.errors);
        }
        builder.build()
    }

    fn display_value(&self, name: &str) -> Option<String> {
        match &self.data {
            Some(data) => data.get(name).cloned(),
            None => self.instance.field_text(name),
        }
    }

    fn full_clean(&mut self) {
        let Some(data) = &self.data else {
            return;
        };

        let mut cleaned = self.instance.clone();
        let mut errors = ValidationErrors::new();

        for panel in &self.handler.panels {
            let def = panel.def();
            match clean_field(def, data.get(&def.name).map(String::as_str)) {
                Ok(value) => cleaned.set_field(def.name.clone(), value),
                Err((message, code)) => errors.add_with_code(def.name.clone(), message, code),
            }
        }

        if !errors.has_errors() {
            self.handler.category_type.clean(&cleaned, &mut errors);
        }

        if !errors.has_errors() {
            self.instance = cleaned;
        }
        self.errors = errors;
    }
}

const REQUIRED: &str = "This field is required.";

fn clean_field(def: &FieldDef, raw: Option<&str>) -> Result<serde_json::Value, (String, &'static str)> {
    let raw = raw.map(str::trim).unwrap_or_default();

    match &def.kind {
        FieldKind::Boolean => {
            let checked = matches!(raw, "on" | "true" | "1");
            if def.required && !checked {
                return Err((REQUIRED.into(), "required"));
            }
            Ok(serde_json::Value::Bool(checked))
        }
        _ if raw.is_empty() => {
            if def.required {
                Err((REQUIRED.into(), "required"))
            } else if def.kind == FieldKind::Integer {
                Ok(serde_json::Value::Null)
            } else {
                Ok(serde_json::Value::String(String::new()))
            }
        }
        FieldKind::Char { max_length } => {
            let length = raw.chars().count();
            if length > *max_length {
                return Err((
                    format!(
                        "Ensure this value has at most {max_length} characters (it has {length})."
                    ),
                    "max_length",
                ));
            }
            Ok(serde_json::Value::String(raw.to_string()))
        }
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(serde_json::Value::from)
            .map_err(|_| ("Enter a whole number.".into(), "invalid")),
        FieldKind::Choice(options) => {
            if options.iter().any(|(value, _)| value == raw) {
                Ok(serde_json::Value::String(raw.to_string()))
            } else {
                Err((
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                    "invalid_choice",
                ))
            }
        }
        FieldKind::Text | FieldKind::Relation => Ok(serde_json::Value::String(raw.to_string())),
    }
}

/// Process-wide memo of edit handlers, one per category type
///
/// Concurrent first use may derive a handler twice; the first one stored
/// wins and is the only one ever handed out.
#[derive(Debug, Default)]
pub struct EditHandlerCache {
    excluded: Vec<String>,
    handlers: RwLock<HashMap<TypeId, Arc<EditHandler>>>,
}

impl EditHandlerCache {
    /// Create an empty cache that leaves `excluded` field names out of every
    /// layout
    #[must_use]
    pub fn new(excluded: Vec<String>) -> Self {
        Self {
            excluded,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// The cached handler for `category_type`, deriving it on first use
    #[must_use]
    pub fn edit_handler_for(&self, category_type: &Arc<CategoryType>) -> Arc<EditHandler> {
        let key = category_type.type_id();
        if let Some(handler) = self.handlers.read().get(&key) {
            return Arc::clone(handler);
        }

        let derived = Arc::new(EditHandler::for_type(category_type, &self.excluded));
        tracing::debug!(
            namespace = category_type.namespace(),
            model = category_type.model_name(),
            fields = derived.panels.len(),
            "Derived edit handler"
        );

        let mut handlers = self.handlers.write();
        Arc::clone(handlers.entry(key).or_insert(derived))
    }

    /// Number of cached handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Whether nothing is cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}
