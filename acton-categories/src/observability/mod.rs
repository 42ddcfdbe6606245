//! Structured logging
//!
//! Installs a `tracing` subscriber with an [`EnvFilter`]. `RUST_LOG` takes
//! precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize logging
///
/// # Errors
///
/// Returns an error if the configured filter is malformed or a global
/// subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use acton_categories::{config::LoggingConfig, observability};
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&LoggingConfig::default())?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    if use_json(config.format) {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    Ok(())
}

const fn use_json(format: LogFormat) -> bool {
    match format {
        LogFormat::Auto => !cfg!(debug_assertions),
        LogFormat::Pretty => false,
        LogFormat::Json => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_formats() {
        assert!(use_json(LogFormat::Json));
        assert!(!use_json(LogFormat::Pretty));
    }

    #[test]
    fn test_auto_format_follows_build() {
        assert_eq!(use_json(LogFormat::Auto), !cfg!(debug_assertions));
    }
}
