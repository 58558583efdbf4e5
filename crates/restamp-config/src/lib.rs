//! Shared configuration for the restamp toolchain.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then a TOML
//! file (`--config-path` or `RESTAMP_CONFIG_PATH`), then `RESTAMP_*`
//! environment variables, then command-line flags.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Settings that outlive a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "RESTAMP")]
pub struct Config {
    /// `tracing` filter directives, for example `info` or `restamp_core=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log line format on stderr.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Fail the run when any transformer is left unapplied.
    #[ortho_config(default = false)]
    pub strict: bool,
    /// Worker thread count; unset uses one per core.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            strict: false,
            threads: None,
        }
    }
}

impl Config {
    /// Returns the log filter directives.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns whether unapplied transformers fail the run.
    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    /// Returns the requested worker count.
    #[must_use]
    pub const fn threads(&self) -> Option<usize> {
        self.threads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_log_at_info_in_compact_form() {
        let config = Config::default();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(!config.strict());
        assert_eq!(config.threads(), None);
    }
}
