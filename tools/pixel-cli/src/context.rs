//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use pixel_commerce::gateway::{MemoryGateway, RemoteGateway, StoreGateway};
use pixel_data::{HttpTransport, RestClient};

use crate::config::{CliConfig, CONFIG_NAMES, ENV_ANON_KEY};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Serve everything from the built-in demo catalog.
    pub offline: bool,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output, offline: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env();

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            offline,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Gateway for this run: the demo catalog offline, the provider otherwise.
    pub fn gateway(&self) -> Result<Arc<dyn StoreGateway>> {
        if self.offline {
            self.output.debug("Offline mode: using the built-in demo catalog");
            return Ok(Arc::new(MemoryGateway::with_demo_catalog()));
        }

        let provider = &self.config.provider;
        let Some(url) = provider.url.as_deref() else {
            bail!("No provider configured. Set provider.url in pixel.toml or pass --offline.");
        };
        let Some(anon_key) = provider.anon_key.as_deref() else {
            bail!("provider.anon_key is missing (or set {}).", ENV_ANON_KEY);
        };

        let transport = HttpTransport::with_timeout(provider.timeout())?;
        let mut client = RestClient::new(url, anon_key).with_transport(Arc::new(transport));
        if let Some(service_key) = provider.service_key.as_deref() {
            client = client.with_access_token(service_key);
        }
        self.output.debug(&format!("Provider: {}", client.base_url()));
        Ok(Arc::new(RemoteGateway::new(client)))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Read and parse a JSON input file.
    pub fn read_json(&self, path: &str) -> Result<serde_json::Value> {
        let resolved = self.resolve_path(path);
        let content = std::fs::read_to_string(&resolved)
            .with_context(|| format!("Failed to read {}", resolved.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", resolved.display()))
    }
}
