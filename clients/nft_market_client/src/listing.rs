//! Listing reader: enumerates the program's listing accounts.

use anchor_lang::AccountDeserialize;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::context::MarketContext;
use crate::fetch::JsonFetcher;
use crate::rpc::MarketRpc;
use crate::state;
use crate::Error;

/// Client-side snapshot of an on-chain listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(serialize_with = "as_base58")]
    pub address: Pubkey,
    #[serde(serialize_with = "as_base58")]
    pub seller: Pubkey,
    /// Lamports.
    pub price: u64,
    #[serde(serialize_with = "as_base58")]
    pub mint: Pubkey,
    pub is_active: bool,
    #[serde(skip)]
    pub vault_bump: u8,
}

impl Listing {
    /// Decode a listing account's raw data (discriminator included).
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, Error> {
        let mut buf = data;
        let account = state::Listing::try_deserialize(&mut buf)
            .map_err(|e| Error::Decode(format!("listing {address}: {e}")))?;
        Ok(Self {
            address,
            seller: account.seller,
            price: account.price,
            mint: account.mint,
            is_active: account.is_active,
            vault_bump: account.vault_bump,
        })
    }
}

pub(crate) fn as_base58<S: serde::Serializer>(key: &Pubkey, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(key)
}

/// All listings owned by the program. Order follows the RPC node's
/// enumeration and is not stable across calls.
pub async fn fetch_listings<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
) -> Result<Vec<Listing>, Error> {
    let accounts = ctx
        .rpc
        .get_program_accounts_by_size(&ctx.program_id, state::Listing::ACCOUNT_SIZE as u64)
        .await?;

    let listings: Vec<Listing> = accounts
        .into_iter()
        .filter_map(|(address, account)| match Listing::decode(address, &account.data) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable listing account");
                None
            }
        })
        .collect();

    info!(count = listings.len(), "Listings fetched");
    Ok(listings)
}

/// The listing for `mint`, active or not.
pub async fn find_listing_by_mint<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    mint: &Pubkey,
) -> Result<Option<Listing>, Error> {
    let found = fetch_listings(ctx)
        .await?
        .into_iter()
        .find(|l| l.mint == *mint);
    debug!(mint = %mint, found = found.is_some(), "Listing lookup");
    Ok(found)
}
