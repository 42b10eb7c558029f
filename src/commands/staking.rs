//! Staking commands - upload the staking wasm and stake tokens
//!
//! After a stake the balance is read back from the contract; the reported
//! figure is the chain's view, not an echo of the staked amount.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::chain::ExecutionChannel;
use crate::commands::{open_channel, spinner};
use crate::msgs::{self, StakedBalanceAtHeightResponse};
use crate::tx;

pub async fn upload(artifact: &Path, gas: Option<u64>) -> Result<()> {
    let wasm = std::fs::read(artifact)
        .with_context(|| format!("failed to read artifact {}", artifact.display()))?;
    let channel = open_channel(gas).await?;

    let pb = spinner("Uploading staking contract...");
    let receipt = channel.upload(wasm, "Staking Contract").await?;
    pb.finish_with_message(format!("{} Uploaded", "✓".green()));

    println!();
    let code_id = receipt
        .code_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(not reported)".to_string());
    println!("  {} {}", "Code ID:".bright_black(), code_id.green());
    println!("  {} {}", "Transaction Hash:".bright_black(), receipt.tx_hash.cyan());
    Ok(())
}

pub async fn stake(contract: String, amount: String, denom: String, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;

    let (msg, funds, memo) = msgs::stake(&amount, &denom);
    let query = msgs::staked_balance(channel.sender());

    let pb = spinner("Staking...");
    let outcome =
        tx::execute_and_confirm(&channel, &contract, &msg, &memo, &funds, Some(&query)).await?;
    pb.finish_with_message(format!("{} Staked", "✓".green()));

    println!();
    println!("  {} {}", "Transaction Hash:".bright_black(), outcome.receipt.tx_hash.cyan());

    match outcome.confirmation.expect("confirmation query was requested") {
        Ok(value) => {
            let balance: StakedBalanceAtHeightResponse = serde_json::from_value(value)
                .context("unexpected staked_balance_at_height response shape")?;
            println!("  {} {}", "Staked Balance:".bright_black(), balance.balance.green());
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "  {}",
                "submission succeeded but the balance query failed; inspect the transaction above"
                    .yellow()
            );
            Err(e.into())
        }
    }
}
