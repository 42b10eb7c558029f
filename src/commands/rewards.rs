//! Rewards commands - instantiate the rewards contract, distribute rewards,
//! and inspect per-user reward state

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::chain::ExecutionChannel;
use crate::commands::{open_channel, spinner};
use crate::msgs::{self, AllUserStatesResponse, RewardsDistribution};
use crate::tx;

#[allow(clippy::too_many_arguments)]
pub async fn init(
    code_id: u64,
    label: String,
    memo: String,
    orchestrator: String,
    denom: String,
    exponent: u32,
    distribution: &Path,
    gas: Option<u64>,
) -> Result<()> {
    let raw = std::fs::read_to_string(distribution)
        .with_context(|| format!("failed to read distribution file {}", distribution.display()))?;
    // An empty list is a valid distribution.
    let entries: Vec<RewardsDistribution> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid distribution file {}", distribution.display()))?;

    println!("  {} {} entries", "Distribution:".bright_black(), entries.len());

    let channel = open_channel(gas).await?;
    let msg = msgs::rewards_instantiate(&orchestrator, &denom, exponent, entries);

    let pb = spinner("Instantiating rewards contract...");
    let receipt = channel
        .instantiate(code_id, serde_json::to_value(msg)?, &label, &memo)
        .await?;
    pb.finish_with_message(format!("{} Instantiated", "✓".green()));

    println!();
    let address = receipt
        .contract_address
        .clone()
        .unwrap_or_else(|| "(not reported)".to_string());
    println!("  {} {}", "Contract Address:".bright_black(), address.green());
    println!("  {} {}", "Transaction Hash:".bright_black(), receipt.tx_hash.cyan());
    Ok(())
}

pub async fn user_states(contract: String, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;

    let pb = spinner("Querying user states...");
    let value = channel
        .query_smart(&contract, &msgs::QueryMsg::AllUserStates {})
        .await?;
    pb.finish_and_clear();

    let states: AllUserStatesResponse =
        serde_json::from_value(value).context("unexpected all_user_states response shape")?;

    println!("{}", "User States".cyan().bold());
    println!();
    if states.user_states.is_empty() {
        println!("  {}", "(no user state recorded)".bright_black());
    }
    for user in states.user_states {
        println!(
            "  {} {} {}",
            user.address.green(),
            "reward debt:".bright_black(),
            user.reward_debt
        );
    }
    Ok(())
}

pub async fn distribute(contract: String, amount: String, denom: String, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;
    // The denom is attached as given; it is not cross-checked against the
    // contract's configured reward token.
    let (msg, funds, memo) = msgs::distribute_rewards(&amount, &denom);

    let pb = spinner("Distributing rewards...");
    let outcome = tx::execute_and_confirm(&channel, &contract, &msg, &memo, &funds, None).await?;
    pb.finish_with_message(format!("{} Distributed", "✓".green()));

    println!();
    println!("  {} {}", "Transaction Hash:".bright_black(), outcome.receipt.tx_hash.cyan());
    Ok(())
}
