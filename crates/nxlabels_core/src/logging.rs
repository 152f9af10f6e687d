//! Subscriber setup for binaries embedding the label engine.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{LabelError, LabelResult};

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a subscriber is
/// already installed or the level is not a valid filter directive.
pub fn init(config: &LoggingConfig) -> LabelResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            LabelError::Config(format!("invalid log level {:?}: {e}", config.level))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        #[cfg(feature = "logging-json")]
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        #[cfg(not(feature = "logging-json"))]
        LogFormat::Json => {
            return Err(LabelError::Config(
                "JSON log output requires the `logging-json` feature".to_string(),
            ))
        }
    };

    installed.map_err(|e| LabelError::Config(format!("failed to install log subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "nxlabels_core=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(init(&config), Err(LabelError::Config(_))));
    }
}
