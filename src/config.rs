// Startup configuration: the depot hierarchy and query defaults

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const RECENT_LIMIT_ENV: &str = "DEPOT_RECENT_LIMIT";

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepotConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub children: Vec<DepotConfig>,
}

impl DepotConfig {
    pub fn leaf(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub root: DepotConfig,
}

// Same hierarchy as CityNetwork::bootstrap
impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            root: DepotConfig {
                id: 1,
                name: "ANKARA".to_string(),
                children: vec![
                    DepotConfig {
                        id: 2,
                        name: "İSTANBUL".to_string(),
                        children: vec![DepotConfig::leaf(4, "İZMİR")],
                    },
                    DepotConfig {
                        id: 3,
                        name: "BURSA".to_string(),
                        children: vec![DepotConfig::leaf(5, "ANTALYA")],
                    },
                ],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub network: NetworkConfig,
    // How many shipments `recent_shipments` returns when no count is given
    pub recent_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl ServiceConfig {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("failed to parse service config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn with_env_overrides(mut self) -> anyhow::Result<Self> {
        if let Ok(raw) = std::env::var(RECENT_LIMIT_ENV) {
            self.recent_limit = raw
                .trim()
                .parse()
                .with_context(|| format!("{RECENT_LIMIT_ENV} must be a number, got {raw:?}"))?;
        }
        Ok(self)
    }
}
