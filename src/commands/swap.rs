//! Swap command - market swap between two native denoms

use anyhow::Result;
use colored::Colorize;

use crate::chain::{self, ExecutionChannel};
use crate::commands::{open_channel, spinner};

pub async fn execute(
    amount: String,
    source_denom: String,
    target_denom: String,
    gas: Option<u64>,
) -> Result<()> {
    let channel = open_channel(gas).await?;

    println!("  {} {}", "Signer Address:".bright_black(), channel.sender());

    let msg = chain::swap_send(channel.sender(), &source_denom, &target_denom, &amount);
    let memo = format!("Swap {} {} to {}", amount, source_denom, target_denom);

    let pb = spinner("Swapping...");
    let receipt = channel.broadcast(msg, &memo).await?;
    pb.finish_with_message(format!("{} Swapped", "✓".green()));

    println!();
    println!("  {} {}", "Transaction Hash:".bright_black(), receipt.tx_hash.cyan());
    Ok(())
}
