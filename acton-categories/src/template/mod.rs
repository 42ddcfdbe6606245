//! Askama templates with HTMX support
//!
//! Every page extends `categories/base.html`, which wraps the main content
//! in partial markers. HTMX requests receive only the marked region; regular
//! browser requests receive the full page.
//!
//! # Examples
//!
//! ```rust
//! use askama::Template;
//! use acton_categories::template::HxTemplate;
//!
//! #[derive(Template)]
//! #[template(
//!     source = "<html><!-- HTMX_PARTIAL_START --><h1>{{ title }}</h1><!-- HTMX_PARTIAL_END --></html>",
//!     ext = "html"
//! )]
//! struct Heading {
//!     title: String,
//! }
//!
//! let partial = Heading { title: "Tags".into() }.render_htmx_string(true).unwrap();
//! assert_eq!(partial, "<h1>Tags</h1>");
//! ```

use std::borrow::Cow;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::CategoryResult;

mod pages;

pub use pages::{
    CategoryTypeEntry, ConfirmDeleteTemplate, CreateTemplate, EditTemplate, IndexTemplate,
    ItemRow, TypeIndexTemplate,
};

const START_MARKER: &str = "<!-- HTMX_PARTIAL_START -->";
const END_MARKER: &str = "<!-- HTMX_PARTIAL_END -->";

/// Extract content between HTML comment markers
///
/// Returns the full HTML when the markers are missing.
#[must_use]
pub fn extract_partial(html: &str) -> Cow<'_, str> {
    if let Some(start_pos) = html.find(START_MARKER) {
        let content_start = start_pos + START_MARKER.len();
        if let Some(end_pos) = html[content_start..].find(END_MARKER) {
            let content = &html[content_start..content_start + end_pos];
            return Cow::Borrowed(content.trim());
        }
    }

    Cow::Borrowed(html)
}

/// Extension trait for Askama templates with HTMX support
pub trait HxTemplate: Template {
    /// Render to a string, keeping only the main content for HTMX requests
    ///
    /// # Errors
    ///
    /// Returns [`askama::Error`] if template rendering fails.
    fn render_htmx_string(&self, is_htmx: bool) -> Result<String, askama::Error> {
        let html = self.render()?;
        if is_htmx {
            Ok(extract_partial(&html).into_owned())
        } else {
            Ok(html)
        }
    }

    /// Render as an HTML response, partial for HTMX requests
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CategoryError::Template`] if template
    /// rendering fails.
    fn render_htmx(&self, is_htmx: bool) -> CategoryResult<Response> {
        Ok(Html(self.render_htmx_string(is_htmx)?).into_response())
    }
}

// Blanket implementation for all Askama templates
impl<T> HxTemplate for T where T: Template {}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[derive(Template)]
    #[template(
        source = "<html><nav>menu</nav><!-- HTMX_PARTIAL_START --> <h1>{{ title }}</h1> <!-- HTMX_PARTIAL_END --></html>",
        ext = "html"
    )]
    struct TestTemplate {
        title: String,
    }

    fn template() -> TestTemplate {
        TestTemplate {
            title: "Tags".to_string(),
        }
    }

    #[test]
    fn test_extract_partial() {
        let html = "<html><!-- HTMX_PARTIAL_START -->\n<p>Body</p>\n<!-- HTMX_PARTIAL_END --></html>";
        assert_eq!(extract_partial(html), "<p>Body</p>");
    }

    #[test]
    fn test_extract_partial_without_markers() {
        let html = "<p>Body</p>";
        assert_eq!(extract_partial(html), html);
    }

    #[test]
    fn test_render_htmx_full_page() {
        let html = template().render_htmx_string(false).unwrap();
        assert!(html.contains("<nav>menu</nav>"));
        assert!(html.contains("<h1>Tags</h1>"));
    }

    #[test]
    fn test_render_htmx_partial() {
        let html = template().render_htmx_string(true).unwrap();
        assert_eq!(html, "<h1>Tags</h1>");
    }

    #[test]
    fn test_render_htmx_response() {
        let response = template().render_htmx(true).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
