//! Flash notifications
//!
//! Messages queued by one request and shown on the next page the user sees.
//! The host owns persistence: it stores a [`FlashQueue`] per session and
//! inserts a clone into each request's extensions. Without one, queued
//! messages are dropped.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Flash message severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    /// Success message (green)
    Success,
    /// Error message (red)
    Error,
}

impl FlashLevel {
    /// Get CSS class for this level
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Error => "flash-error",
        }
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Message level
    pub level: FlashLevel,
    /// Message text
    pub message: String,
}

impl FlashMessage {
    fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Create a success flash message
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    /// Create an error flash message
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    /// Get CSS class for this flash message
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Per-session queue of pending notifications
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct FlashQueue {
    messages: Arc<Mutex<Vec<FlashMessage>>>,
}

impl FlashQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message
    pub fn push(&self, message: FlashMessage) {
        self.messages.lock().push(message);
    }

    /// Take every pending message, oldest first
    #[must_use]
    pub fn drain(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Number of pending messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

/// Extractor for the request's flash queue, if the host provides one
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Option<FlashQueue>);

impl Flash {
    /// Queue a message for the next page
    pub fn push(&self, message: FlashMessage) {
        match &self.0 {
            Some(queue) => queue.push(message),
            None => tracing::debug!(message = %message.message, "No flash queue; message dropped"),
        }
    }

    /// Take every pending message
    #[must_use]
    pub fn drain(&self) -> Vec<FlashMessage> {
        self.0.as_ref().map(FlashQueue::drain).unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<FlashQueue>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_levels() {
        assert_eq!(FlashMessage::success("ok").css_class(), "flash-success");
        assert_eq!(FlashMessage::error("no").level, FlashLevel::Error);
        assert_eq!(FlashMessage::error("no").css_class(), "flash-error");
    }

    #[test]
    fn test_queue_is_shared_between_clones() {
        let queue = FlashQueue::new();
        let clone = queue.clone();
        clone.push(FlashMessage::success("Tag 'rust' created."));

        assert_eq!(queue.len(), 1);
        let drained = queue.drain();
        assert_eq!(drained[0].message, "Tag 'rust' created.");
        assert!(clone.is_empty());
    }

    #[test]
    fn test_flash_without_queue_drops_messages() {
        let flash = Flash(None);
        flash.push(FlashMessage::success("lost"));
        assert!(flash.drain().is_empty());
    }

    #[tokio::test]
    async fn test_extractor_reads_extensions() {
        let queue = FlashQueue::new();
        let request = axum::http::Request::builder()
            .extension(queue.clone())
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let flash = Flash::from_request_parts(&mut parts, &()).await.unwrap();
        flash.push(FlashMessage::success("hello"));
        assert_eq!(queue.len(), 1);
    }
}
