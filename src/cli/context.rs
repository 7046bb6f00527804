use std::path::{Path, PathBuf};
use std::sync::Arc;

use locator_core::LocatorEngine;

use super::output::OutputFormat;
use crate::config::Config;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Engine configured from the `locator` section.
    pub fn engine(&self) -> LocatorEngine {
        LocatorEngine::new(self.config.locator.clone())
    }
}
