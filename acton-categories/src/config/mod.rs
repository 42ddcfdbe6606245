//! Configuration management for the category screens
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_CATEGORIES_` prefix)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-categories/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-categories/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! url_prefix = "/admin/categories"
//! login_url = "/login"
//! page_size = 20
//! excluded_fields = ["site"]
//! database_url = "sqlite://./categories.db?mode=rwc"
//!
//! [menu]
//! label = "Categories"
//! classnames = "icon icon-doc-empty"
//! order = 500
//!
//! [logging]
//! level = "info"
//! format = "auto"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_categories::config::CategoriesConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CategoriesConfig::load_for_service("my-app")?;
//! let page_size = config.page_size;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ACTON_CATEGORIES_";

/// Navigation entry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Menu label
    pub label: String,
    /// CSS classes of the menu entry
    pub classnames: String,
    /// Position among the admin shell's menu items
    pub order: i32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            label: "Categories".to_string(),
            classnames: "icon icon-doc-empty".to_string(),
            order: 500,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty in debug builds, JSON in release builds
    #[default]
    Auto,
    /// Human-readable multi-line output
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: if cfg!(debug_assertions) {
                "debug,acton_categories=trace".to_string()
            } else {
                "info".to_string()
            },
            format: LogFormat::Auto,
        }
    }
}

/// Complete category screen configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CategoriesConfig {
    /// Mount point of the category screens
    #[validate(length(min = 1))]
    pub url_prefix: String,

    /// Where unauthenticated users are redirected
    #[validate(length(min = 1))]
    pub login_url: String,

    /// Records per list page
    #[validate(range(min = 1, max = 500))]
    pub page_size: u64,

    /// Field names never shown in category forms
    pub excluded_fields: Vec<String>,

    /// SQLite URL; the in-memory store is used when unset
    pub database_url: Option<String>,

    /// Navigation entry settings
    pub menu: MenuSettings,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            url_prefix: "/admin/categories".to_string(),
            login_url: "/login".to_string(),
            page_size: 20,
            excluded_fields: vec!["site".to_string()],
            database_url: None,
            menu: MenuSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CategoriesConfig {
    /// Load configuration for a specific service
    ///
    /// Searches for configuration in XDG-compliant locations with precedence:
    /// 1. Environment variables (`ACTON_CATEGORIES_*`, `__` for nesting)
    /// 2. `./config.toml`
    /// 3. `~/.config/acton-categories/{service_name}/config.toml`
    /// 4. `/etc/acton-categories/{service_name}/config.toml`
    /// 5. Defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/acton-categories")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the configuration
    /// fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let figment = Self::defaults()?.merge(Toml::file(path.as_ref()));
        Self::finish(figment)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// ```rust
    /// use acton_categories::config::CategoriesConfig;
    ///
    /// let path = CategoriesConfig::recommended_path("my-app");
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-categories")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    /// URL prefix without a trailing slash
    #[must_use]
    pub fn mount_path(&self) -> &str {
        self.url_prefix.trim_end_matches('/')
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn finish(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
            .extract()?;
        config.validate()?;
        Ok(config)
    }
}
