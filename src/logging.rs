//! Logger setup
//!
//! The crate logs through the `log` facade; the binary installs `env_logger`
//! once at startup.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "lighthouse=debug,wgpu_core=warn"). When unset, `RUST_LOG` is used, and
/// without that the level defaults to `info` with the wgpu crates held at
/// `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.env_filter = Some(filter.to_string());
        self
    }
}

const NOISY_CRATES: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "wgpu"];

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
            for name in NOISY_CRATES {
                builder.filter_module(name, log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        // another logger may already be installed (tests, embedding apps)
        if builder.try_init().is_err() {
            log::debug!("global logger already set, keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default().with_filter("debug"));
        init_logging(LoggingConfig::default());
        log::info!("still logging");
    }
}
