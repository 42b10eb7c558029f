//! Chain configuration persistence
//!
//! One TOML record per installation: recovery phrase, address prefix,
//! default gas price, RPC endpoint. A missing file is the distinct
//! "unconfigured" state, not an error and not a default config. The file
//! is written by `config init` only and read-only everywhere else.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Persisted operator identity and chain parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Recovery phrase of the operator wallet
    pub mnemonic: String,

    /// Bech32 address prefix (e.g. "symphony")
    pub prefix: String,

    /// Default gas price string (e.g. "0.025note")
    pub gas_price: String,

    /// RPC endpoint of the chain
    pub rpc_endpoint: String,
}

/// Get the config file path
pub fn config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "symphony", "symphony-staking-cli")
        .ok_or_else(|| Error::Storage("failed to determine config directory".into()))?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load the configuration, distinguishing "not yet initialized" from IO
/// failure. `Ok(None)` means the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<ChainConfig>, Error> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Storage(format!("failed to read {}: {}", path.display(), e))),
    };

    let config: ChainConfig = toml::from_str(&content)
        .map_err(|e| Error::Storage(format!("failed to parse {}: {}", path.display(), e)))?;

    Ok(Some(config))
}

/// Save the configuration, replacing any previous one. The write goes
/// through a temp file and rename so a crash never leaves a half-written
/// config visible.
pub fn save_to(path: &Path, config: &ChainConfig) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::Storage(format!("failed to create {}: {}", dir.display(), e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Storage(format!("failed to serialize config: {}", e)))?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)
        .map_err(|e| Error::Storage(format!("failed to write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| Error::Storage(format!("failed to replace {}: {}", path.display(), e)))?;

    Ok(())
}

/// Load from the default path.
pub fn load() -> Result<Option<ChainConfig>> {
    let path = config_path()?;
    Ok(load_from(&path)?)
}

/// Save to the default path.
pub fn save(config: &ChainConfig) -> Result<()> {
    let path = config_path()?;
    save_to(&path, config)?;
    Ok(())
}

/// Load the configuration or fail with guidance. Every command except
/// `config init` goes through here before touching the network.
pub fn load_required() -> Result<ChainConfig> {
    let path = config_path()?;
    load_required_from(&path)
}

/// Path-parameterized form of [`load_required`].
pub fn load_required_from(path: &Path) -> Result<ChainConfig> {
    match load_from(path)? {
        Some(config) => Ok(config),
        None => anyhow::bail!(
            "configuration not initialized, run 'symphony-staking config init' before using other commands"
        ),
    }
}
