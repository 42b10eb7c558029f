//! Contract commands - inspect stored code and upload wasm artifacts

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::chain::ExecutionChannel;
use crate::commands::{open_channel, spinner};

pub async fn info(code_id: u64, gas: Option<u64>) -> Result<()> {
    let channel = open_channel(gas).await?;

    let pb = spinner("Querying code info...");
    let info = channel.code_info(code_id).await?;
    pb.finish_and_clear();

    println!("{}", "Code Info".cyan().bold());
    println!();
    println!("  {} {}", "Code ID:".bright_black(), info.code_id);
    println!("  {} {}", "Creator:".bright_black(), info.creator);
    println!("  {} {}", "Checksum:".bright_black(), info.checksum);
    Ok(())
}

pub async fn upload(artifact: &Path, memo: String, gas: Option<u64>) -> Result<()> {
    let wasm = std::fs::read(artifact)
        .with_context(|| format!("failed to read artifact {}", artifact.display()))?;
    let channel = open_channel(gas).await?;

    let pb = spinner("Uploading wasm artifact...");
    let receipt = channel.upload(wasm, &memo).await?;
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
