//! Submission pipeline
//!
//! Drives a composed message through the channel and, for commands whose
//! effect is not visible in the receipt, issues exactly one correlated
//! follow-up query. The query key always comes from the caller's own
//! arguments (the denom it supplied, the address that staked), never from
//! parsing submission output.
//!
//! Submission failure is terminal: no retries, no compensation. A failed
//! follow-up query is only a partial failure; the receipt is still
//! surfaced so the operator can inspect the transaction manually.

use serde_json::Value;
use tracing::debug;

use crate::chain::{ExecutionChannel, TxReceipt};
use crate::error::Error;
use crate::msgs::{ExecuteMsg, Funds, QueryMsg};

/// Result of a finalized submission plus its optional confirmation.
///
/// `confirmation` is `None` for submit-only commands. When a confirmation
/// query was requested it carries the queried state, or the query error if
/// the confirmation step failed after a successful submission.
#[derive(Debug)]
pub struct Outcome {
    pub receipt: TxReceipt,
    pub confirmation: Option<Result<Value, Error>>,
}

/// Execute a contract message and optionally confirm its effect with a
/// correlated query against the same contract.
///
/// Ordering: the submit fully completes (inclusion or failure) before the
/// query is issued; the two never race.
pub async fn execute_and_confirm<C: ExecutionChannel + Sync>(
    channel: &C,
    contract: &str,
    msg: &ExecuteMsg,
    memo: &str,
    funds: &[Funds],
    confirm: Option<&QueryMsg>,
) -> Result<Outcome, Error> {
    let receipt = channel.execute(contract, msg, memo, funds).await?;
    debug!(
        tx_hash = %receipt.tx_hash,
        height = receipt.height,
        gas_used = receipt.gas_used,
        "transaction included"
    );

    let confirmation = match confirm {
        Some(query) => Some(channel.query_smart(contract, query).await),
        None => None,
    };

    Ok(Outcome {
        receipt,
        confirmation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{CodeInfo, TxReceipt};
    use crate::msgs;
    use crate::msgs::{StakedBalanceAtHeightResponse, StakingContractByDenomResponse};
    use async_trait::async_trait;
    use cosmrs::Any;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeChannel {
        sender: String,
        submit_failure: Option<String>,
        query_response: Result<Value, String>,
        executes: Mutex<Vec<(String, ExecuteMsg, String, Vec<Funds>)>>,
        queries: Mutex<Vec<(String, QueryMsg)>>,
    }

    impl FakeChannel {
        fn new(query_response: Value) -> Self {
            FakeChannel {
                sender: "sym1sender".to_string(),
                submit_failure: None,
                query_response: Ok(query_response),
                executes: Mutex::new(vec![]),
                queries: Mutex::new(vec![]),
            }
        }

        fn receipt() -> TxReceipt {
            TxReceipt {
                tx_hash: "TX1".to_string(),
                height: 7,
                gas_used: 120_000,
                code_id: None,
                contract_address: None,
            }
        }
    }

    #[async_trait]
    impl ExecutionChannel for FakeChannel {
        fn sender(&self) -> &str {
            &self.sender
        }

        async fn execute(
            &self,
            contract: &str,
            msg: &ExecuteMsg,
            memo: &str,
            funds: &[Funds],
        ) -> Result<TxReceipt, Error> {
            if let Some(log) = &self.submit_failure {
                return Err(Error::from_tx_log(log.clone()));
            }
            self.executes.lock().unwrap().push((
                contract.to_string(),
                msg.clone(),
                memo.to_string(),
                funds.to_vec(),
            ));
            Ok(Self::receipt())
        }

        async fn instantiate(
            &self,
            _code_id: u64,
            _msg: Value,
            _label: &str,
            _memo: &str,
        ) -> Result<TxReceipt, Error> {
            Ok(Self::receipt())
        }

        async fn upload(&self, _wasm: Vec<u8>, _memo: &str) -> Result<TxReceipt, Error> {
            Ok(Self::receipt())
        }

        async fn broadcast(&self, _msg: Any, _memo: &str) -> Result<TxReceipt, Error> {
            Ok(Self::receipt())
        }

        async fn query_smart(&self, contract: &str, query: &QueryMsg) -> Result<Value, Error> {
            self.queries
                .lock()
                .unwrap()
                .push((contract.to_string(), query.clone()));
            match &self.query_response {
                Ok(value) => Ok(value.clone()),
                Err(log) => Err(Error::Query(log.clone())),
            }
        }

        async fn code_info(&self, _code_id: u64) -> Result<CodeInfo, Error> {
            Err(Error::Query("not supported by fake".to_string()))
        }
    }

    #[tokio::test]
    async fn create_staking_contract_confirms_by_caller_denom() {
        // Scenario: submit returns TX1, follow-up query resolves contractA.
        let channel = FakeChannel::new(json!({
            "denom": "note",
            "registered_contract": {
                "address": "contractA",
                "token": {"denom": "note", "exponent": 6, "aliases": []}
            }
        }));

        let (msg, memo) = msgs::create_staking_contract(42, "note", 6, None, channel.sender());
        let query = msgs::staking_contract_by_denom("note");
        let outcome = execute_and_confirm(&channel, "sym1orch", &msg, &memo, &[], Some(&query))
            .await
            .unwrap();

        assert_eq!(outcome.receipt.tx_hash, "TX1");
        let confirmed: StakingContractByDenomResponse =
            serde_json::from_value(outcome.confirmation.unwrap().unwrap()).unwrap();
        assert_eq!(confirmed.registered_contract.address, "contractA");

        // The follow-up query must carry exactly the denom the caller
        // supplied, not anything derived from the submission result.
        let queries = channel.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, "sym1orch");
        assert_eq!(queries[0].1, msgs::staking_contract_by_denom("note"));
    }

    #[tokio::test]
    async fn failed_submission_never_queries() {
        let mut channel = FakeChannel::new(json!({}));
        channel.submit_failure = Some("insufficient funds".to_string());

        let (msg, _, memo) = msgs::stake("1000", "note");
        let query = msgs::staked_balance(channel.sender());
        let result =
            execute_and_confirm(&channel, "sym1stake", &msg, &memo, &[], Some(&query)).await;

        assert!(result.is_err());
        assert!(channel.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn staked_balance_reflects_chain_state_not_input() {
        // Staked 1000, but the chain reports 500: the queried state wins.
        let channel = FakeChannel::new(json!({"balance": "500", "height": 11}));

        let (msg, funds, memo) = msgs::stake("1000", "note");
        let query = msgs::staked_balance(channel.sender());
        let outcome = execute_and_confirm(&channel, "sym1stake", &msg, &memo, &funds, Some(&query))
            .await
            .unwrap();

        assert_eq!(outcome.receipt.tx_hash, "TX1");
        let balance: StakedBalanceAtHeightResponse =
            serde_json::from_value(outcome.confirmation.unwrap().unwrap()).unwrap();
        assert_eq!(balance.balance, "500");

        let executes = channel.executes.lock().unwrap();
        assert_eq!(executes[0].3, vec![Funds::new("note", "1000")]);
    }

    #[tokio::test]
    async fn failed_confirmation_still_reports_receipt() {
        let mut channel = FakeChannel::new(json!({}));
        channel.query_response = Err("contract does not exist".to_string());

        let (msg, memo) = msgs::create_staking_contract(1, "note", 6, None, channel.sender());
        let query = msgs::staking_contract_by_denom("note");
        let outcome = execute_and_confirm(&channel, "sym1orch", &msg, &memo, &[], Some(&query))
            .await
            .unwrap();

        assert_eq!(outcome.receipt.tx_hash, "TX1");
        match outcome.confirmation {
            Some(Err(Error::Query(_))) => {}
            other => panic!("expected query failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn submit_only_commands_skip_the_query() {
        let channel = FakeChannel::new(json!({}));

        let (msg, funds, memo) = msgs::distribute_rewards("500", "note");
        let outcome = execute_and_confirm(&channel, "sym1rewards", &msg, &memo, &funds, None)
            .await
            .unwrap();

        assert!(outcome.confirmation.is_none());
        assert!(channel.queries.lock().unwrap().is_empty());
    }
}
