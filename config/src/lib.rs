//! Configuration for the Dysnomia preview tool.
//!
//! Read from `~/.dysnomia/config.toml`. Every section is optional; a missing
//! file is not an error. String values support `${VAR}` expansion.

use std::path::{Path, PathBuf};
use std::{env, fs};

use dysnomia_types::Address;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Overrides `[rpc] endpoint` when set.
pub const RPC_URL_ENV: &str = "DYSNOMIA_RPC_URL";
pub const DEFAULT_RPC_ENDPOINT: &str = "https://rpc.pulsechain.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DysnomiaConfig {
    pub rpc: Option<RpcConfig>,
    pub contracts: Option<ContractsConfig>,
    pub territory: Option<TerritoryConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint. Supports `${VAR}` expansion.
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Contract addresses used when hydrating. Unset contracts are not loaded.
#[derive(Debug, Default, Deserialize)]
pub struct ContractsConfig {
    pub affection: Option<Address>,
    pub lau: Option<Address>,
    pub qing_asset: Option<Address>,
    pub crows: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TerritoryConfig {
    /// Territory coordinate. Accepts a TOML integer or a decimal string for
    /// values past `i64`.
    #[serde(default, deserialize_with = "deserialize_uint")]
    pub waat: Option<BigUint>,
    pub entropy: Option<u64>,
    pub bouncer_divisor: Option<u16>,
    #[serde(default)]
    pub no_crows: bool,
    #[serde(default, deserialize_with = "deserialize_uint")]
    pub cover_charge: Option<BigUint>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UintRepr {
    Int(u64),
    Text(String),
}

fn deserialize_uint<'de, D>(deserializer: D) -> Result<Option<BigUint>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<UintRepr>::deserialize(deserializer)?;
    match repr {
        None => Ok(None),
        Some(UintRepr::Int(v)) => Ok(Some(BigUint::from(v))),
        Some(UintRepr::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(serde::de::Error::custom(format!(
                    "expected a decimal integer, got {s:?}"
                )));
            }
            BigUint::parse_bytes(s.as_bytes(), 10)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid integer {s:?}")))
        }
    }
}

/// Replace `${VAR}` with the variable's value; unset variables expand to
/// nothing.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl DysnomiaConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Endpoint to use: `DYSNOMIA_RPC_URL`, then `[rpc] endpoint` (expanded),
    /// then the public default.
    #[must_use]
    pub fn rpc_endpoint(&self) -> String {
        if let Ok(url) = env::var(RPC_URL_ENV)
            && !url.trim().is_empty()
        {
            return url;
        }
        self.rpc
            .as_ref()
            .and_then(|rpc| rpc.endpoint.as_deref())
            .map(expand_env_vars)
            .filter(|endpoint| !endpoint.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RPC_ENDPOINT.to_string())
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.rpc
            .as_ref()
            .and_then(|rpc| rpc.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dysnomia").join("config.toml"))
}
