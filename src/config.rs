use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROOT: &str = ".";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

/// Where requested resources are looked up.
///
/// `root` is prepended verbatim to the request target, so the default `.`
/// serves files relative to the process working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// `BEACON_CONFIG` names an optional YAML file; `LISTEN` overrides the
    /// listen address from either the file or the defaults.
    pub fn load() -> anyhow::Result<Self> {
        let file = std::env::var("BEACON_CONFIG").ok();
        let listen = std::env::var("LISTEN").ok();
        Self::resolve(file.as_deref().map(Path::new), listen)
    }

    pub fn resolve(file: Option<&Path>, listen_override: Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_yaml(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(addr) = listen_override {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to an empty map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}
