//! Explicit market context: connection, HTTP, program id and wallet.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::read_keypair_file;
use solana_sdk::signer::Signer;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetch::{http_client, JsonFetcher};
use crate::rpc::MarketRpc;
use crate::Error;

/// The connected wallet, if any.
#[derive(Clone, Default)]
pub struct Wallet {
    signer: Option<Arc<dyn Signer + Send + Sync>>,
}

impl Wallet {
    pub fn connected(signer: Arc<dyn Signer + Send + Sync>) -> Self {
        Self {
            signer: Some(signer),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        self.signer.as_ref().map(|s| s.pubkey())
    }

    /// The signer, or `WalletNotConnected` with a user-facing warning.
    pub(crate) fn require(&self) -> Result<&(dyn Signer + Send + Sync), Error> {
        match &self.signer {
            Some(signer) => Ok(signer.as_ref()),
            None => {
                warn!("Connect the wallet!");
                Err(Error::WalletNotConnected)
            }
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

/// Everything a marketplace operation needs, passed explicitly.
pub struct MarketContext<R = RpcClient, F = reqwest::Client> {
    pub rpc: R,
    pub http: F,
    pub program_id: Pubkey,
    pub wallet: Wallet,
    pub price_oracle_url: String,
}

impl MarketContext {
    /// Build a live context from configuration. Loads the wallet keypair when
    /// `keypair_path` is set.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let program_id = config.program_id()?;
        let rpc = RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment()?);
        let http = http_client(config.http_timeout_secs)?;

        let wallet = match &config.keypair_path {
            Some(path) => {
                let keypair = read_keypair_file(path)
                    .map_err(|e| Error::Config(format!("failed to read keypair {path}: {e}")))?;
                info!(wallet = %keypair.pubkey(), "Wallet connected");
                Wallet::connected(Arc::new(keypair))
            }
            None => {
                info!("No keypair configured, wallet disconnected");
                Wallet::disconnected()
            }
        };

        info!(rpc = %config.rpc_url, program = %program_id, "Market context ready");

        Ok(Self {
            rpc,
            http,
            program_id,
            wallet,
            price_oracle_url: config.price_oracle_url.clone(),
        })
    }
}

impl<R: MarketRpc, F: JsonFetcher> MarketContext<R, F> {
    pub fn new(rpc: R, http: F, program_id: Pubkey, wallet: Wallet) -> Self {
        Self {
            rpc,
            http,
            program_id,
            wallet,
            price_oracle_url: Config::default().price_oracle_url,
        }
    }

    /// Lamport balance of the connected wallet.
    pub async fn wallet_balance(&self) -> Result<u64, Error> {
        let owner = self.wallet.require()?.pubkey();
        self.rpc.get_balance(&owner).await
    }
}
