//! Error taxonomy for the command pipeline
//!
//! Every variant maps to one stage of the pipeline: config IO, key
//! derivation, endpoint connectivity, transaction submission, contract
//! query. Errors are surfaced verbatim to the operator; nothing is
//! retried locally because resubmitting a transaction blindly risks
//! duplication.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Config file exists but cannot be read, written, or parsed.
    #[error("config storage error: {0}")]
    Storage(String),

    /// The stored recovery phrase does not parse as a valid mnemonic.
    #[error("invalid recovery phrase: {0}")]
    InvalidCredential(String),

    /// Operator-supplied transaction input (denom, amount) that cannot be
    /// encoded into a message. Caught locally, before anything is signed.
    #[error("invalid transaction input: {0}")]
    InvalidInput(String),

    /// RPC endpoint unreachable or not speaking the expected protocol.
    #[error("cannot reach RPC endpoint {endpoint}: {reason}")]
    Connectivity { endpoint: String, reason: String },

    /// The chain rejected or failed a broadcast transaction.
    #[error("transaction failed ({kind}): {log}")]
    Submission { kind: SubmissionErrorKind, log: String },

    /// A smart query was rejected or its target does not exist.
    #[error("query failed: {0}")]
    Query(String),
}

/// Remote-reported reason a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    InsufficientFunds,
    ContractRejection,
    OutOfGas,
    Timeout,
    Other,
}

impl std::fmt::Display for SubmissionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionErrorKind::InsufficientFunds => "insufficient funds",
            SubmissionErrorKind::ContractRejection => "rejected by contract",
            SubmissionErrorKind::OutOfGas => "out of gas",
            SubmissionErrorKind::Timeout => "timed out",
            SubmissionErrorKind::Other => "error",
        };
        write!(f, "{}", s)
    }
}

impl Error {
    /// Classify a failed CheckTx/DeliverTx by its raw log.
    ///
    /// The SDK does not give a structured reason over RPC, so this matches
    /// the well-known substrings emitted by the bank, wasm, and mempool
    /// modules.
    pub fn from_tx_log(log: impl Into<String>) -> Self {
        let log = log.into();
        let lower = log.to_lowercase();
        let kind = if lower.contains("insufficient funds") || lower.contains("insufficient fee") {
            SubmissionErrorKind::InsufficientFunds
        } else if lower.contains("out of gas") {
            SubmissionErrorKind::OutOfGas
        } else if lower.contains("timed out") || lower.contains("timeout") {
            SubmissionErrorKind::Timeout
        } else if lower.contains("execute wasm contract failed")
            || lower.contains("instantiate wasm contract failed")
        {
            SubmissionErrorKind::ContractRejection
        } else {
            SubmissionErrorKind::Other
        };
        Error::Submission { kind, log }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_insufficient_funds() {
        let err = Error::from_tx_log("spendable balance 10note is smaller than 1000note: insufficient funds");
        match err {
            Error::Submission { kind, .. } => assert_eq!(kind, SubmissionErrorKind::InsufficientFunds),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn classifies_out_of_gas() {
        let err = Error::from_tx_log("out of gas in location: WritePerByte");
        match err {
            Error::Submission { kind, .. } => assert_eq!(kind, SubmissionErrorKind::OutOfGas),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn classifies_contract_rejection() {
        let err = Error::from_tx_log("failed to execute message; message index: 0: Unauthorized: execute wasm contract failed");
        match err {
            Error::Submission { kind, .. } => assert_eq!(kind, SubmissionErrorKind::ContractRejection),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn unknown_log_is_other() {
        let err = Error::from_tx_log("signature verification failed");
        match err {
            Error::Submission { kind, .. } => assert_eq!(kind, SubmissionErrorKind::Other),
            _ => panic!("wrong variant"),
        }
    }
}
