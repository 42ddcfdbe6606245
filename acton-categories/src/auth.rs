//! Admin identity
//!
//! Authentication belongs to the host. Its middleware resolves the signed-in
//! user and inserts an [`AdminUser`] into the request extensions; category
//! views read it back through the [`CurrentUser`] extractor.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_categories::auth::AdminUser;
//! use axum::{extract::Request, middleware::Next, response::Response};
//!
//! async fn authenticate(mut request: Request, next: Next) -> Response {
//!     let user = AdminUser::new(1, "editor").with_permission("admin:access");
//!     request.extensions_mut().insert(user);
//!     next.run(request).await
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};

use crate::error::CategoryError;
use crate::state::CategoriesState;

/// Role that bypasses every permission check
pub const SUPERUSER_ROLE: &str = "admin";

/// Permission required to use any admin screen
pub const ADMIN_ACCESS_PERMISSION: &str = "admin:access";

/// A signed-in admin user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// User ID
    pub id: i64,
    /// Display name
    pub username: String,
    /// User roles (e.g., "admin", "editor")
    pub roles: Vec<String>,
    /// Granted permissions (e.g., "blog.tag:change")
    pub permissions: Vec<String>,
}

impl AdminUser {
    /// Create a user with no roles or permissions
    #[must_use]
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    /// Create a superuser
    #[must_use]
    pub fn superuser(id: i64, username: impl Into<String>) -> Self {
        Self::new(id, username).with_role(SUPERUSER_ROLE)
    }

    /// Add a role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Grant a permission
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Check if user has a specific role
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Whether the user holds the superuser role
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.has_role(SUPERUSER_ROLE)
    }

    /// Check if user has a specific permission
    ///
    /// Superusers hold every permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superuser() || self.permissions.iter().any(|p| p == permission)
    }

    /// Whether the user may open admin screens at all
    #[must_use]
    pub fn has_admin_access(&self) -> bool {
        self.has_permission(ADMIN_ACCESS_PERMISSION)
    }
}

/// Extractor for the signed-in admin user
///
/// Rejects with a redirect to the configured login URL when no user is
/// present, and with 403 when the user lacks admin access.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AdminUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    CategoriesState: FromRef<S>,
{
    type Rejection = CategoryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(user) = parts.extensions.get::<AdminUser>().cloned() else {
            let state = CategoriesState::from_ref(state);
            tracing::debug!(path = %parts.uri.path(), "No admin user on request");
            return Err(CategoryError::Unauthenticated {
                login_url: state.config().login_url.clone(),
            });
        };

        if !user.has_admin_access() {
            tracing::warn!(user_id = user.id, "User without admin access denied");
            return Err(CategoryError::Forbidden(format!(
                "user {} lacks {ADMIN_ACCESS_PERMISSION}",
                user.id
            )));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superuser_has_every_permission() {
        let user = AdminUser::superuser(1, "root");
        assert!(user.is_superuser());
        assert!(user.has_admin_access());
        assert!(user.has_permission("anything:at-all"));
    }

    #[test]
    fn test_plain_user_permissions() {
        let user = AdminUser::new(2, "editor")
            .with_role("editor")
            .with_permission(ADMIN_ACCESS_PERMISSION)
            .with_permission("blog.tag:change");

        assert!(!user.is_superuser());
        assert!(user.has_role("editor"));
        assert!(user.has_admin_access());
        assert!(user.has_permission("blog.tag:change"));
        assert!(!user.has_permission("blog.tag:delete"));
    }

    #[test]
    fn test_user_without_admin_access() {
        let user = AdminUser::new(3, "visitor").with_permission("blog.tag:change");
        assert!(!user.has_admin_access());
    }
}
