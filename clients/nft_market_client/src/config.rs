//! Client configuration.

use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::Error;

/// Configuration for the marketplace client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::program_id")]
    pub program_id: String,

    #[serde(default = "defaults::commitment")]
    pub commitment: String,

    /// Wallet keypair file. Absent means the wallet is disconnected.
    #[serde(default)]
    pub keypair_path: Option<String>,

    #[serde(default = "defaults::price_oracle_url")]
    pub price_oracle_url: String,

    #[serde(default = "defaults::http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            program_id: defaults::program_id(),
            commitment: defaults::commitment(),
            keypair_path: None,
            price_oracle_url: defaults::price_oracle_url(),
            http_timeout_secs: defaults::http_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from an optional `nft-market.toml` plus `NFT_MARKET_*` env vars.
    pub fn load() -> Result<Self, Error> {
        config::Config::builder()
            .add_source(config::File::with_name("nft-market").required(false))
            .add_source(config::Environment::with_prefix("NFT_MARKET"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn program_id(&self) -> Result<Pubkey, Error> {
        Pubkey::from_str(&self.program_id)
            .map_err(|e| Error::Config(format!("invalid program_id {}: {e}", self.program_id)))
    }

    pub fn commitment(&self) -> Result<CommitmentConfig, Error> {
        match self.commitment.to_ascii_lowercase().as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(Error::Config(format!("unknown commitment level: {other}"))),
        }
    }
}

mod defaults {
    pub fn rpc_url() -> String {
        "https://api.devnet.solana.com".into()
    }

    pub fn program_id() -> String {
        crate::ID.to_string()
    }

    pub fn commitment() -> String {
        "confirmed".into()
    }

    pub fn price_oracle_url() -> String {
        "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd".into()
    }

    pub fn http_timeout_secs() -> u64 {
        15
    }
}
