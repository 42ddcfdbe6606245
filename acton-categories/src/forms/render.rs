//! Form rendering to HTML
//!
//! Renders form builders to HTML strings with proper escaping
//! and validation error display.

use std::fmt::Write;

use super::builder::FormBuilder;
use super::error::ValidationErrors;
use super::field::{FormField, InputType, SelectOption, WidgetKind};

/// Options for customizing form rendering
#[derive(Debug, Clone)]
pub struct FormRenderOptions {
    /// CSS class for form groups (wrapper around label + input + errors)
    pub group_class: String,
    /// CSS class for labels
    pub label_class: String,
    /// CSS class for input elements
    pub input_class: String,
    /// CSS class for error messages
    pub error_class: String,
    /// CSS class for the list of errors not tied to a field
    pub non_field_error_class: String,
    /// CSS class for help text
    pub help_class: String,
    /// CSS class for submit button
    pub submit_class: String,
    /// CSS class applied to inputs with errors
    pub input_error_class: String,
}

impl Default for FormRenderOptions {
    fn default() -> Self {
        Self {
            group_class: "form-group".into(),
            label_class: "form-label".into(),
            input_class: "form-input".into(),
            error_class: "form-error".into(),
            non_field_error_class: "form-errors".into(),
            help_class: "form-help".into(),
            submit_class: "form-submit".into(),
            input_error_class: "form-input-error".into(),
        }
    }
}

/// Renders forms to HTML
pub struct FormRenderer;

impl FormRenderer {
    /// Render a form to HTML string
    #[must_use]
    pub fn render(form: &FormBuilder<'_>) -> String {
        Self::render_with_options(form, &FormRenderOptions::default())
    }

    /// Render a form with custom options
    #[must_use]
    pub fn render_with_options(form: &FormBuilder<'_>, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(1024);

        html.push_str("<form");
        Self::write_attr(&mut html, "action", &form.action);
        Self::write_attr(&mut html, "method", &form.method);

        if let Some(ref id) = form.id {
            Self::write_attr(&mut html, "id", id);
        }
        if let Some(ref class) = form.class {
            Self::write_attr(&mut html, "class", class);
        }
        if form.novalidate {
            html.push_str(" novalidate");
        }

        Self::write_htmx_form_attrs(&mut html, form);

        html.push_str(">\n");

        if let Some(errors) = form.errors {
            html.push_str(&Self::render_non_field_errors(errors, options));
        }

        for field in &form.fields {
            html.push_str(&Self::render_field(field, form.errors, options));
        }

        if let Some(ref text) = form.submit_text {
            let _ = writeln!(
                html,
                r#"  <button type="submit" class="{}">{}</button>"#,
                Self::escape_attr(&options.submit_class),
                Self::escape_html(text)
            );
        }

        html.push_str("</form>");
        html
    }

    fn render_non_field_errors(errors: &ValidationErrors, options: &FormRenderOptions) -> String {
        let non_field = errors.non_field_errors();
        if non_field.is_empty() {
            return String::new();
        }

        let mut html = String::with_capacity(128);
        let _ = writeln!(html, r#"  <ul class="{}">"#, options.non_field_error_class);
        for error in non_field {
            let _ = writeln!(html, "    <li>{}</li>", Self::escape_html(&error.message));
        }
        html.push_str("  </ul>\n");
        html
    }

    fn render_field(
        field: &FormField,
        errors: Option<&ValidationErrors>,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(256);
        let field_errors = errors.map_or_else(<&[_]>::default, |e| e.for_field(&field.name));
        let has_errors = !field_errors.is_empty();

        let is_hidden = field.is_hidden();
        if !is_hidden {
            let _ = writeln!(html, r#"  <div class="{}">"#, options.group_class);
        }

        // Checkbox label comes after the input
        let is_checkbox = field.is_checkbox();
        if let Some(ref label) = field.label {
            if !is_hidden && !is_checkbox {
                let _ = writeln!(
                    html,
                    r#"    <label for="{}" class="{}">{}</label>"#,
                    Self::escape_attr(field.effective_id()),
                    options.label_class,
                    Self::escape_html(label)
                );
            }
        }

        let input_html = match &field.kind {
            WidgetKind::Input(input_type) => {
                Self::render_input(field, *input_type, has_errors, options)
            }
            WidgetKind::Textarea { rows } => Self::render_textarea(field, *rows, has_errors, options),
            WidgetKind::Select { options: opts } => {
                Self::render_select(field, opts, has_errors, options)
            }
            WidgetKind::Checkbox { checked } => {
                Self::render_checkbox(field, *checked, has_errors, options)
            }
        };
        html.push_str(&input_html);

        if is_checkbox {
            if let Some(ref label) = field.label {
                let _ = write!(
                    html,
                    r#" <label for="{}" class="{}">{}</label>"#,
                    Self::escape_attr(field.effective_id()),
                    options.label_class,
                    Self::escape_html(label)
                );
            }
            html.push('\n');
        }

        for error in field_errors {
            let _ = writeln!(
                html,
                r#"    <span class="{}">{}</span>"#,
                options.error_class,
                Self::escape_html(&error.message)
            );
        }

        if let Some(ref help) = field.help_text {
            let _ = writeln!(
                html,
                r#"    <span class="{}">{}</span>"#,
                options.help_class,
                Self::escape_html(help)
            );
        }

        if !is_hidden {
            html.push_str("  </div>\n");
        }

        html
    }

    fn render_input(
        field: &FormField,
        input_type: InputType,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(128);

        let indent = if input_type == InputType::Hidden {
            "  "
        } else {
            "    "
        };

        html.push_str(indent);
        html.push_str("<input");
        Self::write_attr(&mut html, "type", input_type.as_str());
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());

        if input_type != InputType::Hidden {
            let class = Self::build_input_class(has_errors, options);
            Self::write_attr(&mut html, "class", &class);
        }

        if let Some(ref value) = field.value {
            Self::write_attr(&mut html, "value", value);
        }
        if field.required {
            html.push_str(" required");
        }
        if let Some(len) = field.max_length {
            Self::write_attr(&mut html, "maxlength", &len.to_string());
        }

        html.push_str(">\n");
        html
    }

    fn render_textarea(
        field: &FormField,
        rows: u32,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(128);

        html.push_str("    <textarea");
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());
        Self::write_attr(&mut html, "class", &Self::build_input_class(has_errors, options));
        Self::write_attr(&mut html, "rows", &rows.to_string());
        if field.required {
            html.push_str(" required");
        }

        html.push('>');
        if let Some(ref value) = field.value {
            html.push_str(&Self::escape_html(value));
        }
        html.push_str("</textarea>\n");
        html
    }

    fn render_select(
        field: &FormField,
        opts: &[SelectOption],
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(256);

        html.push_str("    <select");
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());
        Self::write_attr(&mut html, "class", &Self::build_input_class(has_errors, options));
        if field.required {
            html.push_str(" required");
        }
        html.push_str(">\n");

        let selected = field.value.as_deref().unwrap_or_default();
        for opt in opts {
            html.push_str("      <option");
            Self::write_attr(&mut html, "value", &opt.value);
            if opt.value == selected {
                html.push_str(" selected");
            }
            let _ = writeln!(html, ">{}</option>", Self::escape_html(&opt.label));
        }

        html.push_str("    </select>\n");
        html
    }

    fn render_checkbox(
        field: &FormField,
        checked: bool,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(128);

        html.push_str("    <input");
        Self::write_attr(&mut html, "type", "checkbox");
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());
        Self::write_attr(&mut html, "class", &Self::build_input_class(has_errors, options));
        Self::write_attr(&mut html, "value", "true");
        if checked {
            html.push_str(" checked");
        }

        html.push('>');
        html
    }

    fn build_input_class(has_errors: bool, options: &FormRenderOptions) -> String {
        if has_errors {
            format!("{} {}", options.input_class, options.input_error_class)
        } else {
            options.input_class.clone()
        }
    }

    fn write_attr(html: &mut String, name: &str, value: &str) {
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        html.push_str(&Self::escape_attr(value));
        html.push('"');
    }

    fn write_htmx_form_attrs(html: &mut String, form: &FormBuilder<'_>) {
        if let Some(ref url) = form.htmx.post {
            Self::write_attr(html, "hx-post", url);
        }
        if let Some(ref selector) = form.htmx.target {
            Self::write_attr(html, "hx-target", selector);
        }
    }

    /// Escape a string for use in an HTML attribute
    fn escape_attr(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Escape a string for use in HTML content
    fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}
