//! Form field widgets
//!
//! Defines the HTML widgets a category field can be rendered as.

use crate::schema::{FieldDef, FieldKind};

/// HTML input types used by category forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Text input (default)
    #[default]
    Text,
    /// Number input
    Number,
    /// Hidden input
    Hidden,
}

impl InputType {
    /// Get the HTML type attribute value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Widget a field renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    /// Standard input field
    Input(InputType),
    /// Textarea for multi-line text
    Textarea {
        /// Number of visible text lines
        rows: u32,
    },
    /// Select dropdown
    Select {
        /// Available options
        options: Vec<SelectOption>,
    },
    /// Checkbox
    Checkbox {
        /// Whether checkbox is checked
        checked: bool,
    },
}

impl Default for WidgetKind {
    fn default() -> Self {
        Self::Input(InputType::default())
    }
}

/// A form field with all its attributes
#[derive(Debug, Clone, Default)]
pub struct FormField {
    /// Field name (used for form submission)
    pub name: String,
    /// Widget kind (input, textarea, select, checkbox)
    pub kind: WidgetKind,
    /// Label text
    pub label: Option<String>,
    /// Current value
    pub value: Option<String>,
    /// Whether the field is required
    pub required: bool,
    /// Maximum length for text inputs
    pub max_length: Option<usize>,
    /// Help text shown below the field
    pub help_text: Option<String>,
    /// Element ID (defaults to name if not set)
    pub id: Option<String>,
}

impl FormField {
    /// Create a new input field
    #[must_use]
    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::new(name, WidgetKind::Input(input_type))
    }

    fn new(name: impl Into<String>, kind: WidgetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Build the widget for a declared category field
    ///
    /// Returns `None` for structural relations, which are never editable.
    #[must_use]
    pub fn from_def(def: &FieldDef) -> Option<Self> {
        let kind = match &def.kind {
            FieldKind::Char { .. } => WidgetKind::Input(InputType::Text),
            FieldKind::Text => WidgetKind::Textarea { rows: 4 },
            FieldKind::Integer => WidgetKind::Input(InputType::Number),
            FieldKind::Boolean => WidgetKind::Checkbox { checked: false },
            FieldKind::Choice(options) => {
                let mut select = vec![SelectOption::new("", "---------")];
                select.extend(
                    options
                        .iter()
                        .map(|(value, label)| SelectOption::new(value.clone(), label.clone())),
                );
                WidgetKind::Select { options: select }
            }
            FieldKind::Relation => return None,
        };

        let max_length = match def.kind {
            FieldKind::Char { max_length } => Some(max_length),
            _ => None,
        };

        Some(Self {
            name: def.name.clone(),
            kind,
            label: Some(def.label.clone()),
            value: None,
            // A required checkbox would force the box to be ticked
            required: def.required && def.kind != FieldKind::Boolean,
            max_length,
            help_text: def.help_text.clone(),
            id: Some(format!("id_{}", def.name)),
        })
    }

    /// Set the current value, checking the box for truthy checkbox values
    pub fn set_value(&mut self, value: Option<String>) {
        if let WidgetKind::Checkbox { checked } = &mut self.kind {
            *checked = value
                .as_deref()
                .is_some_and(|v| matches!(v, "true" | "on" | "1"));
            return;
        }
        self.value = value;
    }

    /// Get the effective ID (custom ID or field name)
    #[must_use]
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Check if this field is hidden
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.kind, WidgetKind::Input(InputType::Hidden))
    }

    /// Check if this field is a checkbox
    #[must_use]
    pub const fn is_checkbox(&self) -> bool {
        matches!(self.kind, WidgetKind::Checkbox { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_as_str() {
        assert_eq!(InputType::Text.as_str(), "text");
        assert_eq!(InputType::Number.to_string(), "number");
    }

    #[test]
    fn test_from_char_def() {
        let field = FormField::from_def(&FieldDef::category_name()).unwrap();
        assert_eq!(field.kind, WidgetKind::Input(InputType::Text));
        assert_eq!(field.max_length, Some(60));
        assert!(field.required);
        assert_eq!(field.effective_id(), "id_category_name");
    }

    #[test]
    fn test_from_choice_def_has_blank_option() {
        let def = FieldDef::choice("size", "Size", [("s", "Small")]);
        let field = FormField::from_def(&def).unwrap();
        match field.kind {
            WidgetKind::Select { options } => {
                assert_eq!(options[0].value, "");
                assert_eq!(options[1], SelectOption::new("s", "Small"));
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[test]
    fn test_relation_has_no_widget() {
        assert!(FormField::from_def(&FieldDef::relation("site", "Site")).is_none());
    }

    #[test]
    fn test_required_boolean_is_not_required_widget() {
        let field = FormField::from_def(&FieldDef::boolean("live", "Live").required()).unwrap();
        assert!(!field.required);
    }

    #[test]
    fn test_checkbox_set_value() {
        let mut field = FormField::from_def(&FieldDef::boolean("live", "Live")).unwrap();
        field.set_value(Some("on".into()));
        assert_eq!(field.kind, WidgetKind::Checkbox { checked: true });
        field.set_value(None);
        assert_eq!(field.kind, WidgetKind::Checkbox { checked: false });
    }
}
