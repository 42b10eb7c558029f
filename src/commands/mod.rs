//! CLI command implementations
//!
//! Every command except `config init` resolves the stored chain config,
//! derives the signing identity, and opens its own channel before doing
//! anything else. Unconfigured state stops the pipeline before any
//! network call.

pub mod config;
pub mod contract;
pub mod orchestrator;
pub mod rewards;
pub mod staking;
pub mod swap;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::chain::{FeeMode, GasPrice, RpcChannel};
use crate::config as cfg;
use crate::wallet::Wallet;

/// Shared pipeline head: config -> wallet -> channel.
pub(crate) async fn open_channel(gas: Option<u64>) -> Result<RpcChannel> {
    let config = cfg::load_required()?;
    let wallet = Wallet::from_mnemonic(&config.mnemonic, &config.prefix)?;
    let gas_price: GasPrice = config.gas_price.parse()?;
    let fee_mode = match gas {
        Some(gas_limit) => FeeMode::Manual { gas_limit },
        None => FeeMode::Auto,
    };
    let channel = RpcChannel::connect(&config.rpc_endpoint, wallet, gas_price, fee_mode).await?;
    Ok(channel)
}

pub(crate) fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
