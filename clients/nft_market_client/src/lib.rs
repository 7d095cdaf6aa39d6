//! # NFT Market Client
//!
//! Off-chain client for the Solana NFT marketplace program. Reads listings,
//! enriches them with Token-2022 and off-chain metadata, and submits the
//! `list_nft`, `buy_nft` and `remove_listed_nft` instructions.
//!
//! ## Quick Start
//! ```bash
//! NFT_MARKET_KEYPAIR_PATH=~/.config/solana/id.json cargo run --bin nft-market -- market
//! ```

use anchor_lang::prelude::*;

pub mod actions;
pub mod config;
pub mod context;
mod errors;
pub mod fetch;
pub mod instructions;
pub mod listing;
pub mod market;
pub mod metadata;
pub mod oracle;
pub mod rpc;
pub mod state;
mod submit;
pub mod tokens;

#[cfg(test)]
pub(crate) mod test_utils;

pub use actions::{buy_nft, list_nft, withdraw_nft, ListReceipt};
pub use config::Config;
pub use context::{MarketContext, Wallet};
pub use errors::Error;
pub use listing::{fetch_listings, find_listing_by_mint, Listing};
pub use market::{available_action, Action, FilterCriteria, MarketView};
pub use metadata::{fetch_detail, fetch_details, NftDetail};
pub use oracle::fetch_sol_usd_price;
pub use tokens::{quote, sol_to_lamports, PaymentToken, Quote};

declare_id!("FX2TuF4AsoxvbkNC95CK5RGdkpdMWFsPszULZy68Kexp");
