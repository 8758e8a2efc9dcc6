//! Where the host binary gets its configuration from.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoError;

use cadbridge_config::Config;

/// Produces the configuration the host runs with.
pub trait ConfigLoader: Send + Sync {
    /// Resolves defaults, file, environment and command-line layers.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loads layered configuration from a fixed argument vector.
///
/// The default instance captures the process arguments.
#[derive(Debug, Clone)]
pub struct SystemConfigLoader {
    args: Vec<OsString>,
}

impl SystemConfigLoader {
    /// Loads from `args`, whose first element is the program name.
    #[must_use]
    pub fn with_args(args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SystemConfigLoader {
    fn default() -> Self {
        Self::with_args(std::env::args_os())
    }
}

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(self.args.iter().cloned())
    }
}

/// Hands back a configuration built in code, skipping every layer.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader(Config);

impl StaticConfigLoader {
    /// Serves `config` unchanged.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self(config)
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.0.clone())
    }
}
