mod config;
mod error;
mod format;
mod level;
mod log;
mod rfc3339;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;

/// Initializes the global tracing subscriber with the given configuration.
///
/// Once installed, all `tracing` macros (`info!`, `debug!`, ...) go through
/// it. Installing twice fails with [`LoggerError::AlreadyInitialized`], so
/// call this once, early in `main()`.
///
/// # Examples
/// ```rust
/// use tally_observe::{LoggerConfig, init_logger};
///
/// fn main() {
///     let config = LoggerConfig::default();
///     init_logger(&config).expect("failed to initialize logger");
///
///     tracing::info!("logger ready");
/// }
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
