//! Process-wide diagnostics settings.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from provenance.toml)
//! - User overrides (./provenance.toml or ~/.config/provenance/provenance.toml)
//! - Environment overrides (`PROVENANCE_MAX_STACK_DEPTH`, `PROVENANCE_VERBOSITY`)

use crate::{ConfigError, ConfigErrorKind, ConfigResult, LAYERED_SOURCES};
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, instrument};

/// Verbosity at which additions to an [`ErrorSet`](crate::ErrorSet) are
/// reported as `tracing` error events.
pub const LOG_THRESHOLD: u8 = 3;

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Current process-wide verbosity.
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

/// Set the process-wide verbosity.
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
    debug!(level, "Set diagnostics verbosity");
}

pub(crate) fn logging_enabled() -> bool {
    verbosity() >= LOG_THRESHOLD
}

/// Diagnostics settings.
///
/// # Example
///
/// ```toml
/// max_stack_depth = 50
/// verbosity = 0
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct DiagnosticsConfig {
    /// Maximum number of frames kept per captured stack
    #[serde(default = "default_max_stack_depth")]
    max_stack_depth: usize,

    /// Verbosity level; [`LOG_THRESHOLD`] and above logs error set additions
    #[serde(default)]
    verbosity: u8,
}

fn default_max_stack_depth() -> usize {
    provenance_stack::DEFAULT_MAX_DEPTH
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: default_max_stack_depth(),
            verbosity: 0,
        }
    }
}

impl DiagnosticsConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        debug!("Loading diagnostics configuration from file");

        let source_name = path.as_ref().display().to_string();

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Unreadable {
                    source_name: source_name.clone(),
                    reason: e.to_string(),
                })
            })?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Malformed {
                    source_name,
                    reason: e.to_string(),
                })
            })
    }

    /// Load configuration, later sources overriding earlier ones:
    /// 1. Bundled defaults (provenance.toml shipped with the library)
    /// 2. User config in home directory (~/.config/provenance/provenance.toml)
    /// 3. User config in current directory (./provenance.toml)
    /// 4. `PROVENANCE_*` environment variables
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// ```no_run
    /// use provenance_error::DiagnosticsConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = DiagnosticsConfig::load()?;
    /// config.validate()?;
    /// config.apply();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> ConfigResult<Self> {
        debug!("Loading diagnostics configuration with precedence: env > current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../provenance.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/provenance/provenance.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("provenance").required(false))
            .add_source(Environment::with_prefix("PROVENANCE").try_parsing(true));

        builder
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Unreadable {
                    source_name: LAYERED_SOURCES.to_string(),
                    reason: e.to_string(),
                })
            })?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Malformed {
                    source_name: LAYERED_SOURCES.to_string(),
                    reason: e.to_string(),
                })
            })
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_stack_depth` is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_stack_depth == 0 {
            return Err(ConfigError::new(ConfigErrorKind::OutOfRange {
                key: "max_stack_depth",
                reason: "must be at least 1".to_string(),
            }));
        }
        Ok(())
    }

    /// Install these settings process-wide.
    ///
    /// Affects stacks captured and error sets extended after the call.
    #[instrument(skip(self), fields(max_stack_depth = self.max_stack_depth, verbosity = self.verbosity))]
    pub fn apply(&self) {
        provenance_stack::set_max_depth(self.max_stack_depth);
        set_verbosity(self.verbosity);
    }

    /// The settings currently in effect.
    pub fn current() -> Self {
        Self {
            max_stack_depth: provenance_stack::max_depth(),
            verbosity: verbosity(),
        }
    }
}
