//! Config commands - initialize and inspect the stored chain configuration

use anyhow::Result;
use colored::Colorize;

use crate::config::{self, ChainConfig};

pub fn init(mnemonic: String, gas_price: String, rpc_endpoint: String, prefix: String) -> Result<()> {
    // Catch gas price typos before they surface as a failed fee
    // calculation on the first transaction.
    let _: crate::chain::GasPrice = gas_price.parse()?;

    let chain_config = ChainConfig {
        mnemonic,
        prefix,
        gas_price,
        rpc_endpoint,
    };
    config::save(&chain_config)?;

    println!(
        "{} {}",
        "Configuration saved to".green(),
        config::config_path()?.display()
    );
    Ok(())
}

pub fn show() -> Result<()> {
    let chain_config = config::load_required()?;

    println!("{}", "Current configuration".cyan().bold());
    println!();
    println!("  {} {}", "Mnemonic:".bright_black(), chain_config.mnemonic);
    println!("  {} {}", "Gas Price:".bright_black(), chain_config.gas_price);
    println!("  {} {}", "RPC Endpoint:".bright_black(), chain_config.rpc_endpoint);
    println!("  {} {}", "Prefix:".bright_black(), chain_config.prefix);
    Ok(())
}
