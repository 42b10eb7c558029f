//! Contract message shapes
//!
//! One tagged variant per on-chain action, serialized to the exact JSON the
//! orchestrator, native-staking, and rewards contracts expect. Builders are
//! pure: CLI arguments in, immutable message out. Denom metadata passes
//! through uninterpreted; amounts are already in the base denomination.

use serde::{Deserialize, Serialize};

/// Token metadata attached to create/instantiate messages. Never converted
/// or validated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u32,
    pub aliases: Vec<String>,
}

impl DenomUnit {
    pub fn new(denom: impl Into<String>, exponent: u32) -> Self {
        DenomUnit {
            denom: denom.into(),
            exponent,
            aliases: vec![],
        }
    }
}

/// cw_utils::Duration wire shape. Unset and zero are distinct: an unset
/// period is omitted from the message entirely, `Time(0)` serializes as
/// `{"time":0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    Time(u64),
    Height(u64),
}

/// Funds accompanying an execute message, passed through as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funds {
    pub denom: String,
    pub amount: String,
}

impl Funds {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Funds {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Execute messages, tagged by action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    CreateStakingContract {
        code_id: u64,
        denom_unit: DenomUnit,
        #[serde(skip_serializing_if = "Option::is_none")]
        unbonding_period: Option<Duration>,
        #[serde(skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
    },
    Stake {},
    DistributeRewards {},
}

/// Read-only smart queries, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    StakingContractByDenom {
        denom: String,
    },
    StakedBalanceAtHeight {
        address: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u64>,
    },
    AllUserStates {},
}

/// Orchestrator instantiate payload (empty object, not null).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorInstantiateMsg {}

/// One denom → weight entry of the rewards distribution file. The weight is
/// a Uint64 on the wire, so it travels as a JSON string like the amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsDistribution {
    pub denom: DenomUnit,
    pub weight: String,
}

/// Rewards contract instantiate payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardsInstantiateMsg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub staking_orchestrator_addr: String,
    pub reward_token: DenomUnit,
    pub rewards_distribution: Vec<RewardsDistribution>,
}

/// create_staking_contract with the signer as owner, memo included.
/// The unbonding period is seconds when given.
pub fn create_staking_contract(
    code_id: u64,
    denom: &str,
    exponent: u32,
    unbonding_period: Option<u64>,
    owner: &str,
) -> (ExecuteMsg, String) {
    let msg = ExecuteMsg::CreateStakingContract {
        code_id,
        denom_unit: DenomUnit::new(denom, exponent),
        unbonding_period: unbonding_period.map(Duration::Time),
        owner: Some(owner.to_string()),
    };
    let memo = format!("Symphony Native Staking Contract {}", denom);
    (msg, memo)
}

/// stake with attached funds; memo summarizes the action.
pub fn stake(amount: &str, denom: &str) -> (ExecuteMsg, Vec<Funds>, String) {
    let funds = vec![Funds::new(denom, amount)];
    let memo = format!("Stake {} {}", amount, denom);
    (ExecuteMsg::Stake {}, funds, memo)
}

/// distribute_rewards with the reward tokens attached as funds. The denom is
/// not cross-checked against the contract's reward token.
pub fn distribute_rewards(amount: &str, denom: &str) -> (ExecuteMsg, Vec<Funds>, String) {
    let funds = vec![Funds::new(denom, amount)];
    let memo = format!("Distribute {} {}", amount, denom);
    (ExecuteMsg::DistributeRewards {}, funds, memo)
}

pub fn staking_contract_by_denom(denom: &str) -> QueryMsg {
    QueryMsg::StakingContractByDenom {
        denom: denom.to_string(),
    }
}

pub fn staked_balance(address: &str) -> QueryMsg {
    QueryMsg::StakedBalanceAtHeight {
        address: address.to_string(),
        height: None,
    }
}

pub fn rewards_instantiate(
    orchestrator_addr: &str,
    reward_denom: &str,
    reward_exponent: u32,
    distribution: Vec<RewardsDistribution>,
) -> RewardsInstantiateMsg {
    RewardsInstantiateMsg {
        owner: None,
        staking_orchestrator_addr: orchestrator_addr.to_string(),
        reward_token: DenomUnit::new(reward_denom, reward_exponent),
        rewards_distribution: distribution,
    }
}

// ---------------------------------------------------------------------------
// Query responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredContract {
    pub address: String,
    pub token: DenomUnit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingContractByDenomResponse {
    pub denom: String,
    pub registered_contract: RegisteredContract,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakedBalanceAtHeightResponse {
    pub balance: String,
    pub height: u64,
}

/// Per-user entry of `all_user_states`. `reward_debt` is a Uint128 and
/// arrives as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct UserStateResponse {
    pub address: String,
    pub reward_debt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllUserStatesResponse {
    pub user_states: Vec<UserStateResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_staking_contract_shape() {
        let (msg, memo) = create_staking_contract(42, "note", 6, None, "sym1owner");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "create_staking_contract": {
                    "code_id": 42,
                    "denom_unit": {"denom": "note", "exponent": 6, "aliases": []},
                    "owner": "sym1owner"
                }
            })
        );
        assert_eq!(memo, "Symphony Native Staking Contract note");
    }

    #[test]
    fn unset_unbonding_period_is_absent_zero_is_explicit() {
        let (unset, _) = create_staking_contract(1, "note", 6, None, "sym1o");
        let unset = serde_json::to_value(&unset).unwrap();
        assert!(unset["create_staking_contract"].get("unbonding_period").is_none());

        let (zero, _) = create_staking_contract(1, "note", 6, Some(0), "sym1o");
        let zero = serde_json::to_value(&zero).unwrap();
        assert_eq!(zero["create_staking_contract"]["unbonding_period"], json!({"time": 0}));
    }

    #[test]
    fn stake_funds_pass_through_unconverted() {
        let (msg, funds, memo) = stake("1000", "note");
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"stake": {}}));
        assert_eq!(funds, vec![Funds::new("note", "1000")]);
        assert_eq!(memo, "Stake 1000 note");
    }

    #[test]
    fn distribute_rewards_shape() {
        let (msg, funds, _) = distribute_rewards("500", "note");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"distribute_rewards": {}})
        );
        assert_eq!(funds, vec![Funds::new("note", "500")]);
    }

    #[test]
    fn query_by_denom_uses_given_key() {
        let query = staking_contract_by_denom("note");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"staking_contract_by_denom": {"denom": "note"}})
        );
    }

    #[test]
    fn empty_distribution_is_accepted() {
        let msg = rewards_instantiate("sym1orch", "note", 6, vec![]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["rewards_distribution"], json!([]));
        assert!(value.get("owner").is_none());
    }

    #[test]
    fn orchestrator_instantiate_is_empty_object() {
        let value = serde_json::to_value(OrchestratorInstantiateMsg {}).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn distribution_file_round_trips() {
        let raw = r#"[{"denom": {"denom": "note", "exponent": 6, "aliases": []}, "weight": "3"}]"#;
        let parsed: Vec<RewardsDistribution> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].weight, "3");
        assert_eq!(parsed[0].denom.denom, "note");
    }

    #[test]
    fn distribution_weight_stays_a_string_on_the_wire() {
        let entry = RewardsDistribution {
            denom: DenomUnit::new("note", 6),
            weight: "3".to_string(),
        };
        let msg = rewards_instantiate("sym1orch", "note", 6, vec![entry]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["rewards_distribution"][0]["weight"], json!("3"));
    }

    #[test]
    fn user_states_carry_reward_debt() {
        let raw = r#"{"user_states": [{"address": "sym1u", "reward_debt": "7"}]}"#;
        let parsed: AllUserStatesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.user_states[0].address, "sym1u");
        assert_eq!(parsed.user_states[0].reward_debt, "7");
    }
}
