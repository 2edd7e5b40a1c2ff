use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

/// Marker variable set by an orchestrating host process. When it is absent
/// the tools assume they run standalone.
pub const HOST_MARKER: &str = "HARNESS";

const NETWORK_VARS: [(&str, &str); 3] = [
    ("sepolia", "SEPOLIA_HTTP_API_URL"),
    ("polygon_mumbai", "POLYGON_MUMBAI_HTTP_API_URL"),
    ("polygon_mainnet", "POLYGON_MAINNET_HTTP_API_URL"),
];

/// How the process was started. Detected once at the top of each binary
/// and passed down explicitly; nothing below the entry point reads the
/// marker variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Standalone,
    Hosted,
}

impl RunMode {
    pub fn detect() -> Self {
        if env::var_os(HOST_MARKER).is_some() {
            RunMode::Hosted
        } else {
            RunMode::Standalone
        }
    }

    pub fn is_standalone(self) -> bool {
        self == RunMode::Standalone
    }
}

/// Network endpoints and deployer credentials, resolved from the
/// environment (and `.env`, when one exists) at startup.
#[derive(Clone, Debug)]
pub struct Config {
    networks: HashMap<String, String>,
    default_network: String,
    deployer_key: Option<String>,
    project_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut networks = HashMap::new();
        networks.insert(
            "localhost".to_string(),
            env::var("LOCALHOST_HTTP_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8545".to_string()),
        );
        for (name, var) in NETWORK_VARS {
            if let Ok(url) = env::var(var) {
                networks.insert(name.to_string(), url);
            }
        }

        Ok(Self {
            networks,
            default_network: env::var("DEFAULT_NETWORK")
                .unwrap_or_else(|_| "localhost".to_string()),
            deployer_key: env::var("DEPLOYER_PRIVATE_KEY").ok(),
            project_root: env::var("CONTRACTS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }

    pub fn rpc_endpoint(&self) -> Result<&str> {
        self.networks
            .get(&self.default_network)
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow!(
                    "network `{}` has no configured rpc endpoint",
                    self.default_network
                )
            })
    }

    pub fn deployer_key(&self) -> Result<&str> {
        self.deployer_key
            .as_deref()
            .ok_or_else(|| anyhow!("DEPLOYER_PRIVATE_KEY is not set"))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.project_root.join("artifacts")
    }
}
