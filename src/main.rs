//! Symphony Staking CLI
//!
//! A command-line tool for managing staking contracts on a CosmWasm chain:
//! upload contract code, instantiate the orchestrator and rewards
//! contracts, stake tokens, distribute rewards, and swap denoms.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod chain;
mod commands;
mod config;
mod error;
mod msgs;
mod tx;
mod wallet;

/// Symphony Staking CLI
#[derive(Parser)]
#[command(name = "symphony-staking")]
#[command(version)]
#[command(about = "Manage staking contracts on a CosmWasm chain", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Manual gas limit (skips gas estimation)
    #[arg(long, global = true)]
    gas: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect and upload contract code
    Contract {
        #[command(subcommand)]
        command: ContractCommands,
    },

    /// Manage the staking orchestrator contract
    Orchestrator {
        #[command(subcommand)]
        command: OrchestratorCommands,
    },

    /// Manage the staking rewards contract
    Rewards {
        #[command(subcommand)]
        command: RewardsCommands,
    },

    /// Upload the staking contract and stake tokens
    Staking {
        #[command(subcommand)]
        command: StakingCommands,
    },

    /// Swap tokens on the market module
    Swap {
        /// Amount of tokens to swap, in the source base denom
        #[arg(short, long)]
        amount: String,

        /// Denom unit of the source token
        #[arg(short, long)]
        source_denom: String,

        /// Denom unit of the target token
        #[arg(short, long)]
        target_denom: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize the CLI configuration
    Init {
        /// Mnemonic of your wallet
        mnemonic: String,

        /// Gas price string value (e.g. 0.025note)
        #[arg(short, long)]
        gas_price: String,

        /// RPC endpoint of the chain
        #[arg(short = 'e', long)]
        rpc_endpoint: String,

        /// Address prefix (e.g. symphony)
        #[arg(short, long)]
        prefix: String,
    },

    /// Show the current configuration
    Show,
}

#[derive(Subcommand)]
enum ContractCommands {
    /// Get information about stored contract code
    Info {
        /// Code ID of the contract
        code_id: u64,
    },

    /// Upload a wasm artifact
    Upload {
        /// Path to the wasm artifact
        artifact: PathBuf,

        /// Memo to include in the transaction
        #[arg(long, default_value = "")]
        memo: String,
    },
}

#[derive(Subcommand)]
enum OrchestratorCommands {
    /// Instantiate a new orchestrator contract
    Init {
        /// Code ID of the orchestrator contract
        code_id: u64,

        /// Label for the contract
        #[arg(long)]
        label: String,

        /// Memo to include in the transaction
        #[arg(long, default_value = "")]
        memo: String,
    },

    /// Create a new staking contract for a denom
    CreateStakingContract {
        /// Contract address of the orchestrator contract
        contract_address: String,

        /// Staking contract code ID
        #[arg(short, long)]
        code_id: u64,

        /// Denom unit of the staking token
        #[arg(short, long)]
        denom: String,

        /// Exponent of the staking token
        #[arg(short, long)]
        exponent: u32,

        /// Unbonding period in seconds
        #[arg(short, long)]
        unbonding_period: Option<u64>,
    },

    /// Get the registered staking contract for a denom
    GetStakingContract {
        /// Contract address of the orchestrator contract
        contract_address: String,

        /// Denom unit of the staking token
        #[arg(short, long)]
        denom: String,
    },
}

#[derive(Subcommand)]
enum RewardsCommands {
    /// Instantiate a new rewards contract
    Init {
        /// Code ID of the rewards contract
        code_id: u64,

        /// Label for the contract
        #[arg(long)]
        label: String,

        /// Memo to include in the transaction
        #[arg(long, default_value = "")]
        memo: String,

        /// Orchestrator contract address
        #[arg(short, long)]
        orchestrator: String,

        /// Denom unit of the rewards token
        #[arg(short, long, default_value = "note")]
        denom: String,

        /// Exponent of the rewards token
        #[arg(short, long, default_value_t = 6)]
        exponent: u32,

        /// Path to the rewards distribution JSON file
        #[arg(short = 'f', long)]
        distribution: PathBuf,
    },

    /// Get the reward states of all users
    UserStates {
        /// Address of the rewards contract
        contract_address: String,
    },

    /// Distribute rewards to stakers
    Distribute {
        /// Address of the rewards contract
        contract_address: String,

        /// Amount of tokens to distribute, in the base denom
        #[arg(short, long)]
        amount: String,

        /// Denom unit of the rewards token
        #[arg(short, long, default_value = "note")]
        denom: String,
    },
}

#[derive(Subcommand)]
enum StakingCommands {
    /// Upload the staking contract wasm artifact
    Upload {
        /// Path to the wasm artifact
        artifact: PathBuf,
    },

    /// Stake tokens to a staking contract
    Stake {
        /// Contract address of the staking contract
        contract_address: String,

        /// Amount of tokens to stake, in the base denom
        #[arg(short, long)]
        amount: String,

        /// Denom unit of the staking token
        #[arg(short, long)]
        denom: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let gas = cli.gas;

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Init {
                mnemonic,
                gas_price,
                rpc_endpoint,
                prefix,
            } => {
                commands::config::init(mnemonic, gas_price, rpc_endpoint, prefix)?;
            }
            ConfigCommands::Show => {
                commands::config::show()?;
            }
        },

        Commands::Contract { command } => match command {
            ContractCommands::Info { code_id } => {
                commands::contract::info(code_id, gas).await?;
            }
            ContractCommands::Upload { artifact, memo } => {
                commands::contract::upload(&artifact, memo, gas).await?;
            }
        },

        Commands::Orchestrator { command } => match command {
            OrchestratorCommands::Init {
                code_id,
                label,
                memo,
            } => {
                commands::orchestrator::init(code_id, label, memo, gas).await?;
            }
            OrchestratorCommands::CreateStakingContract {
                contract_address,
                code_id,
                denom,
                exponent,
                unbonding_period,
            } => {
                commands::orchestrator::create_staking_contract(
                    contract_address,
                    code_id,
                    denom,
                    exponent,
                    unbonding_period,
                    gas,
                )
                .await?;
            }
            OrchestratorCommands::GetStakingContract {
                contract_address,
                denom,
            } => {
                commands::orchestrator::get_staking_contract(contract_address, denom, gas).await?;
            }
        },

        Commands::Rewards { command } => match command {
            RewardsCommands::Init {
                code_id,
                label,
                memo,
                orchestrator,
                denom,
                exponent,
                distribution,
            } => {
                commands::rewards::init(
                    code_id,
                    label,
                    memo,
                    orchestrator,
                    denom,
                    exponent,
                    &distribution,
                    gas,
                )
                .await?;
            }
            RewardsCommands::UserStates { contract_address } => {
                commands::rewards::user_states(contract_address, gas).await?;
            }
            RewardsCommands::Distribute {
                contract_address,
                amount,
                denom,
            } => {
                commands::rewards::distribute(contract_address, amount, denom, gas).await?;
            }
        },

        Commands::Staking { command } => match command {
            StakingCommands::Upload { artifact } => {
                commands::staking::upload(&artifact, gas).await?;
            }
            StakingCommands::Stake {
                contract_address,
                amount,
                denom,
            } => {
                commands::staking::stake(contract_address, amount, denom, gas).await?;
            }
        },

        Commands::Swap {
            amount,
            source_denom,
            target_denom,
        } => {
            commands::swap::execute(amount, source_denom, target_denom, gas).await?;
        }
    }

    Ok(())
}
