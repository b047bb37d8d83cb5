//! Leveled logging selection
//!
//! The logger is an explicit value built once at process start from the
//! `NODE_ENV` environment variable and/or `-NODE_ENV=<mode>` launch
//! arguments, then handed to the runner. Each level is either enabled or a
//! silent no-op; callers never need to check before logging. Enabled levels
//! emit through `tracing`, so output formatting is whatever subscriber the
//! host process installed (see [`init`]).

use std::fmt;

use tracing_subscriber::{
    fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Log levels the runner emits at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

/// A leveled logging capability with per-level on/off switches.
///
/// Disabled levels are safe no-ops, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    info: bool,
    warn: bool,
    error: bool,
    debug: bool,
}

impl Logger {
    /// All levels disabled
    pub fn silent() -> Self {
        Self {
            info: false,
            warn: false,
            error: false,
            debug: false,
        }
    }

    /// warn + error
    pub fn production() -> Self {
        Self {
            warn: true,
            error: true,
            ..Self::silent()
        }
    }

    /// info + warn + error
    pub fn test() -> Self {
        Self {
            info: true,
            ..Self::production()
        }
    }

    /// Full console-equivalent capability (all levels)
    pub fn development() -> Self {
        Self {
            debug: true,
            ..Self::test()
        }
    }

    /// Build from the current process environment and launch arguments
    pub fn from_env() -> Self {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        Self::detect(std::env::var("NODE_ENV").ok().as_deref(), &argv)
    }

    /// Resolve the enabled level set from a mode signal.
    ///
    /// A mode matches when it equals the environment value or appears as a
    /// `-NODE_ENV=<mode>` launch argument. Production is checked first, then
    /// test, then development; anything else disables all levels.
    pub fn detect(env_mode: Option<&str>, argv: &[String]) -> Self {
        let matches = |mode: &str| {
            env_mode == Some(mode) || argv.iter().any(|arg| arg == &format!("-NODE_ENV={mode}"))
        };
        if matches("production") || matches("prod") {
            Self::production()
        } else if matches("test") {
            Self::test()
        } else if matches("development") || matches("dev") {
            Self::development()
        } else {
            Self::silent()
        }
    }

    /// Whether the given level is enabled
    pub fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Debug => self.debug,
        }
    }

    /// Emit a message at the given level; no-op when disabled
    pub fn log(&self, level: Level, msg: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Info => tracing::info!("{msg}"),
            Level::Warn => tracing::warn!("{msg}"),
            Level::Error => tracing::error!("{msg}"),
            Level::Debug => tracing::debug!("{msg}"),
        }
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.log(Level::Error, msg);
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Level::Debug, msg);
    }
}

/// Install the default fmt subscriber for host processes that have none.
///
/// Output verbosity is controlled by `RUST_LOG`; defaults to INFO for this
/// crate, WARN for dependencies.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("testrig=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt_layer::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn production_enables_warn_and_error_only() {
        for mode in ["production", "prod"] {
            let logger = Logger::detect(Some(mode), &[]);
            assert_eq!(logger, Logger::production());
            assert!(!logger.enabled(Level::Info));
            assert!(logger.enabled(Level::Warn));
            assert!(logger.enabled(Level::Error));
            assert!(!logger.enabled(Level::Debug));
        }
    }

    #[test]
    fn test_mode_adds_info() {
        let logger = Logger::detect(Some("test"), &[]);
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));
    }

    #[test]
    fn development_enables_everything() {
        for mode in ["development", "dev"] {
            assert_eq!(Logger::detect(Some(mode), &[]), Logger::development());
        }
    }

    #[test]
    fn unknown_or_unset_disables_everything() {
        assert_eq!(Logger::detect(None, &[]), Logger::silent());
        assert_eq!(Logger::detect(Some("staging"), &[]), Logger::silent());
    }

    #[test]
    fn launch_argument_form_is_recognized() {
        let logger = Logger::detect(None, &args(&["fooTest", "-NODE_ENV=test"]));
        assert_eq!(logger, Logger::test());
    }

    #[test]
    fn production_wins_over_development() {
        // Both signals present: the production check runs first
        let logger = Logger::detect(Some("dev"), &args(&["-NODE_ENV=prod"]));
        assert_eq!(logger, Logger::production());
    }
}
