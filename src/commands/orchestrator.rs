//! Orchestrator commands - instantiate the orchestrator and manage the
//! staking contracts it registers per denom
//!
//! `create-staking-contract` is the canonical write-then-read: the receipt
//! only exposes a transaction hash, so the registered contract address is
//! resolved by querying back with the same denom the caller supplied.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::chain::ExecutionChannel;
use crate::commands::{open_channel, spinner};
use crate::msgs::{self, OrchestratorInstantiateMsg, StakingContractByDenomResponse};
use crate::tx;

pub async fn init(code_id: u64, label: String, memo: String, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;

    let pb = spinner("Instantiating orchestrator contract...");
    let receipt = channel
        .instantiate(
            code_id,
            serde_json::to_value(OrchestratorInstantiateMsg {})?,
            &label,
            &memo,
        )
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

pub async fn create_staking_contract(
    orchestrator: String,
    code_id: u64,
    denom: String,
    exponent: u32,
    unbonding_period: Option<u64>,
    gas: Option<u64>,
) -> Result<()> {
    let channel = open_channel(gas).await?;

    let (msg, memo) =
        msgs::create_staking_contract(code_id, &denom, exponent, unbonding_period, channel.sender());
    let query = msgs::staking_contract_by_denom(&denom);

    let pb = spinner("Creating staking contract...");
    let outcome =
        tx::execute_and_confirm(&channel, &orchestrator, &msg, &memo, &[], Some(&query)).await?;
    pb.finish_with_message(format!("{} Submitted", "✓".green()));

    println!();
    println!("  {} {}", "Transaction Hash:".bright_black(), outcome.receipt.tx_hash.cyan());

    match outcome.confirmation.expect("confirmation query was requested") {
        Ok(value) => {
            let resolved: StakingContractByDenomResponse = serde_json::from_value(value)
                .context("unexpected staking_contract_by_denom response shape")?;
            println!(
                "  {} {}",
                "Staking Contract Address:".bright_black(),
                resolved.registered_contract.address.green()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "  {}",
                "submission succeeded but the confirmation query failed; inspect the transaction above"
                    .yellow()
            );
            Err(e.into())
        }
    }
}

pub async fn get_staking_contract(orchestrator: String, denom: String, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;

    let pb = spinner("Querying staking contract...");
    let value = channel
        .query_smart(&orchestrator, &msgs::staking_contract_by_denom(&denom))
        .await?;
    pb.finish_and_clear();

    let resolved: StakingContractByDenomResponse = serde_json::from_value(value)
        .context("unexpected staking_contract_by_denom response shape")?;
    println!(
        "  {} {}",
        "Staking Contract Address:".bright_black(),
        resolved.registered_contract.address.green()
    );
    Ok(())
}
