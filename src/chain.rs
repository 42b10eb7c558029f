//! Remote execution channel
//!
//! One channel per command invocation: a Tendermint RPC client bound to one
//! signing identity and one gas-price policy. `broadcast_tx_commit` is the
//! finality wait, so a submit returns only once the transaction is included
//! or rejected. Queries go through ABCI and are read-only.

use async_trait::async_trait;
use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode};
use cosmrs::proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use cosmrs::proto::cosmos::tx::v1beta1::{SimulateRequest, SimulateResponse};
use cosmrs::proto::cosmwasm::wasm::v1::{
    QueryCodeRequest, QueryCodeResponse, QuerySmartContractStateRequest,
    QuerySmartContractStateResponse,
};
use cosmrs::rpc::endpoint::abci_query::AbciQuery;
use cosmrs::rpc::{Client, HttpClient};
use cosmrs::tendermint::abci::Event;
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any, Coin};
use prost::Message;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, SubmissionErrorKind};
use crate::msgs::{ExecuteMsg, Funds, QueryMsg};
use crate::wallet::Wallet;

/// Simulated gas is an estimate; headroom keeps borderline transactions
/// from failing at delivery.
const GAS_ADJUSTMENT: f64 = 1.3;

/// Gas price as "amount + denom", e.g. "0.025note".
#[derive(Debug, Clone, PartialEq)]
pub struct GasPrice {
    pub amount: f64,
    pub denom: String,
}

impl FromStr for GasPrice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| Error::Storage(format!("gas price '{}' has no denom", s)))?;
        let (amount, denom) = s.split_at(split);
        let amount: f64 = amount
            .parse()
            .map_err(|_| Error::Storage(format!("gas price '{}' has no numeric amount", s)))?;
        if amount < 0.0 {
            return Err(Error::Storage(format!("gas price '{}' is negative", s)));
        }
        Ok(GasPrice {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl GasPrice {
    /// Fee coin for a gas limit, rounded up.
    fn fee_coin(&self, gas_limit: u64) -> Result<Coin, Error> {
        Ok(Coin {
            denom: self
                .denom
                .parse()
                .map_err(|_| Error::Storage(format!("invalid fee denom '{}'", self.denom)))?,
            amount: (gas_limit as f64 * self.amount).ceil() as u128,
        })
    }
}

/// Fee policy for submissions. Auto estimates via simulation; Manual is the
/// operator override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode {
    Auto,
    Manual { gas_limit: u64 },
}

/// Result of a finalized submission. Code id and contract address are
/// present when the transaction emitted the corresponding wasm events, so
/// upload and instantiate need no follow-up query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub height: u64,
    pub gas_used: u64,
    pub code_id: Option<u64>,
    pub contract_address: Option<String>,
}

/// Stored code metadata.
#[derive(Debug, Clone)]
pub struct CodeInfo {
    pub code_id: u64,
    pub creator: String,
    pub checksum: String,
}

/// The two primitives every command needs (plus the lifecycle helpers built
/// on them). Implemented by the live RPC channel and by fakes in tests.
#[async_trait]
pub trait ExecutionChannel {
    /// Principal address acting as transaction sender.
    fn sender(&self) -> &str;

    /// Sign, broadcast, and wait for inclusion of a contract execution.
    async fn execute(
        &self,
        contract: &str,
        msg: &ExecuteMsg,
        memo: &str,
        funds: &[Funds],
    ) -> Result<TxReceipt, Error>;

    /// Instantiate a stored code id with the sender as admin.
    async fn instantiate(
        &self,
        code_id: u64,
        msg: serde_json::Value,
        label: &str,
        memo: &str,
    ) -> Result<TxReceipt, Error>;

    /// Store a wasm artifact.
    async fn upload(&self, wasm: Vec<u8>, memo: &str) -> Result<TxReceipt, Error>;

    /// Sign and broadcast a raw protobuf message (non-wasm modules).
    async fn broadcast(&self, msg: Any, memo: &str) -> Result<TxReceipt, Error>;

    /// Read-only smart query against a deployed contract.
    async fn query_smart(
        &self,
        contract: &str,
        query: &QueryMsg,
    ) -> Result<serde_json::Value, Error>;

    /// Metadata of a stored code id.
    async fn code_info(&self, code_id: u64) -> Result<CodeInfo, Error>;
}

/// Live channel over Tendermint RPC.
pub struct RpcChannel {
    client: HttpClient,
    wallet: Wallet,
    sender: String,
    chain_id: chain::Id,
    gas_price: GasPrice,
    fee_mode: FeeMode,
    endpoint: String,
}

impl RpcChannel {
    /// Open the channel and verify the endpoint speaks Tendermint RPC.
    pub async fn connect(
        endpoint: &str,
        wallet: Wallet,
        gas_price: GasPrice,
        fee_mode: FeeMode,
    ) -> Result<Self, Error> {
        let client = HttpClient::new(endpoint).map_err(|e| Error::Connectivity {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let status = client.status().await.map_err(|e| Error::Connectivity {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let chain_id = status.node_info.network;
        debug!(%chain_id, endpoint, "connected to chain");

        let sender = wallet.address().to_string();
        Ok(RpcChannel {
            client,
            wallet,
            sender,
            chain_id,
            gas_price,
            fee_mode,
            endpoint: endpoint.to_string(),
        })
    }

    async fn abci_query(&self, path: &str, data: Vec<u8>) -> Result<AbciQuery, Error> {
        self.client
            .abci_query(Some(path.to_string()), data, None, false)
            .await
            .map_err(|e| Error::Connectivity {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })
    }

    /// Account number and sequence of the sender.
    async fn account(&self) -> Result<(u64, u64), Error> {
        let req = QueryAccountRequest {
            address: self.sender.clone(),
        };
        let res = self
            .abci_query("/cosmos.auth.v1beta1.Query/Account", req.encode_to_vec())
            .await?;
        if res.code.is_err() {
            return Err(Error::Query(format!(
                "account {} not found on chain: {}",
                self.sender, res.log
            )));
        }
        let res = QueryAccountResponse::decode(res.value.as_slice())
            .map_err(|e| Error::Query(format!("malformed account response: {}", e)))?;
        let any = res
            .account
            .ok_or_else(|| Error::Query(format!("account {} not found on chain", self.sender)))?;
        let account = BaseAccount::decode(any.value.as_slice())
            .map_err(|e| Error::Query(format!("unsupported account type {}: {}", any.type_url, e)))?;
        Ok((account.account_number, account.sequence))
    }

    fn sign(
        &self,
        body: &tx::Body,
        fee: Fee,
        account_number: u64,
        sequence: u64,
    ) -> Result<Vec<u8>, Error> {
        let signer_info = SignerInfo::single_direct(Some(self.wallet.public_key()), sequence);
        let auth_info = signer_info.auth_info(fee);
        let sign_doc = SignDoc::new(body, &auth_info, &self.chain_id, account_number)
            .map_err(sign_error)?;
        let raw = sign_doc.sign(self.wallet.signing_key()).map_err(sign_error)?;
        raw.to_bytes().map_err(sign_error)
    }

    /// Gas consumed by simulating the transaction with a zero fee.
    async fn simulate(
        &self,
        body: &tx::Body,
        account_number: u64,
        sequence: u64,
    ) -> Result<u64, Error> {
        let fee = Fee::from_amount_and_gas(self.gas_price.fee_coin(0)?, 0u64);
        let tx_bytes = self.sign(body, fee, account_number, sequence)?;
        let req = SimulateRequest {
            tx_bytes,
            ..Default::default()
        };
        let res = self
            .abci_query("/cosmos.tx.v1beta1.Service/Simulate", req.encode_to_vec())
            .await?;
        if res.code.is_err() {
            return Err(Error::from_tx_log(res.log.to_string()));
        }
        let res = SimulateResponse::decode(res.value.as_slice())
            .map_err(|e| Error::Query(format!("malformed simulate response: {}", e)))?;
        res.gas_info
            .map(|g| g.gas_used)
            .ok_or_else(|| Error::Query("simulate response missing gas info".into()))
    }

    /// Sign, broadcast, and wait for inclusion. Terminal on failure; the
    /// caller never retries.
    async fn sign_and_broadcast(&self, msgs: Vec<Any>, memo: &str) -> Result<TxReceipt, Error> {
        let (account_number, sequence) = self.account().await?;
        let body = tx::Body::new(msgs, memo, 0u32);

        let gas_limit = match self.fee_mode {
            FeeMode::Manual { gas_limit } => gas_limit,
            FeeMode::Auto => {
                let simulated = self.simulate(&body, account_number, sequence).await?;
                (simulated as f64 * GAS_ADJUSTMENT).ceil() as u64
            }
        };
        let fee = Fee::from_amount_and_gas(self.gas_price.fee_coin(gas_limit)?, gas_limit);
        debug!(gas_limit, memo, "broadcasting transaction");

        let tx_bytes = self.sign(&body, fee, account_number, sequence)?;
        let resp = self
            .client
            .broadcast_tx_commit(tx_bytes)
            .await
            .map_err(|e| Error::from_tx_log(e.to_string()))?;

        if resp.check_tx.code.is_err() {
            return Err(Error::from_tx_log(resp.check_tx.log));
        }
        if resp.tx_result.code.is_err() {
            return Err(Error::from_tx_log(resp.tx_result.log));
        }

        let events = &resp.tx_result.events;
        Ok(TxReceipt {
            tx_hash: resp.hash.to_string(),
            height: resp.height.value(),
            gas_used: resp.tx_result.gas_used as u64,
            code_id: event_attr(events, "store_code", "code_id").and_then(|v| v.parse().ok()),
            contract_address: event_attr(events, "instantiate", "_contract_address"),
        })
    }

    fn account_id(&self, address: &str) -> Result<AccountId, Error> {
        address
            .parse()
            .map_err(|_| Error::Query(format!("invalid contract address '{}'", address)))
    }

    fn sender_id(&self) -> Result<AccountId, Error> {
        self.account_id(&self.sender)
    }
}

#[async_trait]
impl ExecutionChannel for RpcChannel {
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
        let exec = MsgExecuteContract {
            sender: self.sender_id()?,
            contract: self.account_id(contract)?,
            msg: serde_json::to_vec(msg)
                .map_err(|e| Error::InvalidInput(format!("cannot encode execute message: {}", e)))?,
            funds: coins_from_funds(funds)?,
        };
        self.sign_and_broadcast(vec![exec.to_any().map_err(sign_error)?], memo)
            .await
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: serde_json::Value,
        label: &str,
        memo: &str,
    ) -> Result<TxReceipt, Error> {
        let sender = self.sender_id()?;
        let init = MsgInstantiateContract {
            sender: sender.clone(),
            admin: Some(sender),
            code_id,
            label: Some(label.to_string()),
            msg: serde_json::to_vec(&msg)
                .map_err(|e| Error::InvalidInput(format!("cannot encode instantiate message: {}", e)))?,
            funds: vec![],
        };
        self.sign_and_broadcast(vec![init.to_any().map_err(sign_error)?], memo)
            .await
    }

    async fn upload(&self, wasm: Vec<u8>, memo: &str) -> Result<TxReceipt, Error> {
        let store = MsgStoreCode {
            sender: self.sender_id()?,
            wasm_byte_code: wasm,
            instantiate_permission: None,
        };
        self.sign_and_broadcast(vec![store.to_any().map_err(sign_error)?], memo)
            .await
    }

    async fn broadcast(&self, msg: Any, memo: &str) -> Result<TxReceipt, Error> {
        self.sign_and_broadcast(vec![msg], memo).await
    }

    async fn query_smart(
        &self,
        contract: &str,
        query: &QueryMsg,
    ) -> Result<serde_json::Value, Error> {
        let req = QuerySmartContractStateRequest {
            address: contract.to_string(),
            query_data: serde_json::to_vec(query)
                .map_err(|e| Error::Query(format!("cannot encode query: {}", e)))?,
        };
        let res = self
            .abci_query(
                "/cosmwasm.wasm.v1.Query/SmartContractState",
                req.encode_to_vec(),
            )
            .await?;
        if res.code.is_err() {
            return Err(Error::Query(res.log.to_string()));
        }
        let res = QuerySmartContractStateResponse::decode(res.value.as_slice())
            .map_err(|e| Error::Query(format!("malformed query response: {}", e)))?;
        serde_json::from_slice(&res.data)
            .map_err(|e| Error::Query(format!("contract returned invalid JSON: {}", e)))
    }

    async fn code_info(&self, code_id: u64) -> Result<CodeInfo, Error> {
        let req = QueryCodeRequest { code_id };
        let res = self
            .abci_query("/cosmwasm.wasm.v1.Query/Code", req.encode_to_vec())
            .await?;
        if res.code.is_err() {
            return Err(Error::Query(res.log.to_string()));
        }
        let res = QueryCodeResponse::decode(res.value.as_slice())
            .map_err(|e| Error::Query(format!("malformed code response: {}", e)))?;
        let info = res
            .code_info
            .ok_or_else(|| Error::Query(format!("code id {} not found", code_id)))?;
        Ok(CodeInfo {
            code_id: info.code_id,
            creator: info.creator,
            checksum: hex::encode(info.data_hash),
        })
    }
}

/// Convert attached funds to chain coins. Bad denoms and non-integer
/// amounts are rejected here, before anything is signed.
fn coins_from_funds(funds: &[Funds]) -> Result<Vec<Coin>, Error> {
    funds
        .iter()
        .map(|f| {
            Ok(Coin {
                denom: f
                    .denom
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("invalid denom '{}'", f.denom)))?,
                amount: f
                    .amount
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("invalid amount '{}'", f.amount)))?,
            })
        })
        .collect()
}

fn sign_error(e: impl std::fmt::Display) -> Error {
    Error::Submission {
        kind: SubmissionErrorKind::Other,
        log: e.to_string(),
    }
}

/// First attribute value of a matching event kind.
fn event_attr(events: &[Event], kind: &str, key: &str) -> Option<String> {
    events
        .iter()
        .filter(|e| e.kind == kind)
        .flat_map(|e| e.attributes.iter())
        .find_map(|a| match (a.key_str(), a.value_str()) {
            (Ok(k), Ok(v)) if k == key => Some(v.to_string()),
            _ => None,
        })
}

// ---------------------------------------------------------------------------
// Market swap (symphony.market.v1beta1), hand-encoded: not part of the SDK
// proto set.
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct MsgSwapSend {
    #[prost(string, tag = "1")]
    pub from_address: String,
    #[prost(string, tag = "2")]
    pub to_address: String,
    #[prost(message, optional, tag = "3")]
    pub offer_coin: Option<cosmrs::proto::cosmos::base::v1beta1::Coin>,
    #[prost(string, tag = "4")]
    pub ask_denom: String,
}

pub const MSG_SWAP_SEND_TYPE_URL: &str = "/symphony.market.v1beta1.MsgSwapSend";

/// Swap message with the sender as both source and destination.
pub fn swap_send(sender: &str, source_denom: &str, target_denom: &str, amount: &str) -> Any {
    let msg = MsgSwapSend {
        from_address: sender.to_string(),
        to_address: sender.to_string(),
        offer_coin: Some(cosmrs::proto::cosmos::base::v1beta1::Coin {
            denom: source_denom.to_string(),
            amount: amount.to_string(),
        }),
        ask_denom: target_denom.to_string(),
    };
    Any {
        type_url: MSG_SWAP_SEND_TYPE_URL.to_string(),
        value: msg.encode_to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_price_parses_amount_and_denom() {
        let price: GasPrice = "0.025note".parse().unwrap();
        assert_eq!(price.amount, 0.025);
        assert_eq!(price.denom, "note");
    }

    #[test]
    fn gas_price_without_denom_is_rejected() {
        assert!("0.025".parse::<GasPrice>().is_err());
        assert!("note".parse::<GasPrice>().is_err());
    }

    #[test]
    fn fee_rounds_up() {
        let price: GasPrice = "0.025note".parse().unwrap();
        let coin = price.fee_coin(100_001).unwrap();
        // 100_001 * 0.025 = 2500.025 -> 2501
        assert_eq!(coin.amount, 2501);
        assert_eq!(coin.denom.to_string(), "note");
    }

    #[test]
    fn malformed_funds_are_rejected_as_invalid_input() {
        let coins = coins_from_funds(&[Funds::new("note", "1000")]).unwrap();
        assert_eq!(coins.len(), 1);

        match coins_from_funds(&[Funds::new("note", "12.5")]) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("12.5")),
            other => panic!("expected invalid input, got {:?}", other),
        }
        match coins_from_funds(&[Funds::new("!!", "1000")]) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("!!")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn event_attr_finds_matching_kind_and_key() {
        let events = vec![
            Event::new("message", [("action", "store_code", true)]),
            Event::new("store_code", [("code_id", "42", true)]),
        ];
        assert_eq!(event_attr(&events, "store_code", "code_id").as_deref(), Some("42"));
        assert_eq!(event_attr(&events, "instantiate", "_contract_address"), None);
    }

    #[test]
    fn swap_send_encodes_round_trip() {
        let any = swap_send("sym1sender", "note", "uusd", "1000");
        assert_eq!(any.type_url, MSG_SWAP_SEND_TYPE_URL);
        let decoded = MsgSwapSend::decode(any.value.as_slice()).unwrap();
        assert_eq!(decoded.from_address, "sym1sender");
        assert_eq!(decoded.to_address, "sym1sender");
        assert_eq!(decoded.ask_denom, "uusd");
        assert_eq!(decoded.offer_coin.unwrap().amount, "1000");
    }
}
