use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("subscriber installation failed: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level so operators can raise verbosity
/// without touching config. Whatever the filter says, audit events on the
/// `security` target are kept at info or better; a quiet deployment must not
/// silence the audit trail.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(configured_level: &str) -> Result<EnvFilter, TelemetryError> {
    let base = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(configured_level).map_err(|source| TelemetryError::Filter {
            value: configured_level.to_string(),
            source,
        })?,
    };

    let audit_floor = "security=info"
        .parse()
        .map_err(|source| TelemetryError::Filter {
            value: "security=info".to_string(),
            source,
        })?;

    Ok(base.add_directive(audit_floor))
}
