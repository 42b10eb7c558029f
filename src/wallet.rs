//! Signing identity derivation
//!
//! Derives a secp256k1 key from the stored recovery phrase using the
//! standard Cosmos HD path. The identity lives only in memory and is
//! recomputed on every invocation. Account index 0 is always the acting
//! principal.

use bip32::{Language, Mnemonic};
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use cosmrs::AccountId;

use crate::error::Error;

/// Cosmos HD derivation path, account index 0.
const DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

/// In-memory signing identity bound to one bech32 prefix.
pub struct Wallet {
    key: SigningKey,
    address: AccountId,
}

impl Wallet {
    /// Derive the identity from a recovery phrase and address prefix.
    /// Deterministic: identical inputs always produce the same address.
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> Result<Wallet, Error> {
        let mnemonic = Mnemonic::new(phrase.trim(), Language::English)
            .map_err(|e| Error::InvalidCredential(e.to_string()))?;
        let seed = mnemonic.to_seed("");

        let path = DERIVATION_PATH
            .parse()
            .map_err(|e: bip32::Error| Error::InvalidCredential(e.to_string()))?;
        let key = SigningKey::derive_from_path(&seed, &path)
            .map_err(|e| Error::InvalidCredential(e.to_string()))?;

        let address = key
            .public_key()
            .account_id(prefix)
            .map_err(|e| Error::InvalidCredential(format!("cannot derive address with prefix '{}': {}", prefix, e)))?;

        Ok(Wallet { key, address })
    }

    /// Principal address used as the transaction sender.
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derivation_is_deterministic() {
        let a = Wallet::from_mnemonic(PHRASE, "sym").unwrap();
        let b = Wallet::from_mnemonic(PHRASE, "sym").unwrap();
        assert_eq!(a.address().to_string(), b.address().to_string());
    }

    #[test]
    fn address_carries_prefix() {
        let wallet = Wallet::from_mnemonic(PHRASE, "sym").unwrap();
        assert!(wallet.address().to_string().starts_with("sym1"));
        assert_eq!(wallet.address().prefix(), "sym");
    }

    #[test]
    fn leading_whitespace_is_tolerated() {
        let a = Wallet::from_mnemonic(PHRASE, "sym").unwrap();
        let b = Wallet::from_mnemonic(&format!("  {}\n", PHRASE), "sym").unwrap();
        assert_eq!(a.address().to_string(), b.address().to_string());
    }

    #[test]
    fn invalid_phrase_is_rejected() {
        match Wallet::from_mnemonic("definitely not a mnemonic", "sym") {
            Err(Error::InvalidCredential(_)) => {}
            other => panic!("expected InvalidCredential, got {:?}", other.map(|w| w.address().to_string())),
        }
    }
}
