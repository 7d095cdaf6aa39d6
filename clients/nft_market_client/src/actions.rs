//! Transaction builder for the three marketplace actions.
//!
//! Each action derives the vault PDA, makes sure the token accounts it
//! touches exist, builds exactly one program instruction and runs it through
//! [`submit`]. The wallet is checked before anything touches the network.

use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::associated_token::spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::{system_program, sysvar};
use tracing::info;

use crate::context::MarketContext;
use crate::fetch::JsonFetcher;
use crate::instructions::{self, BuyNft, ListNft, RemoveListedNft};
use crate::listing::{as_base58, Listing};
use crate::rpc::MarketRpc;
use crate::state::find_vault_address;
use crate::submit::submit;
use crate::tokens::PaymentToken;
use crate::Error;

/// Outcome of a successful `list_nft`.
#[derive(Debug, Clone, Serialize)]
pub struct ListReceipt {
    #[serde(serialize_with = "as_base58")]
    pub listing: Pubkey,
    #[serde(serialize_with = "as_base58")]
    pub vault: Pubkey,
    #[serde(serialize_with = "as_base58_signature")]
    pub signature: Signature,
}

fn as_base58_signature<S: serde::Serializer>(sig: &Signature, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(sig)
}

/// Return the ATA for (owner, mint, token program), creating it in its own
/// confirmed transaction when absent. `payer` funds the creation.
pub async fn ensure_associated_token_account<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    payer: &dyn Signer,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, Error> {
    let address = get_associated_token_address_with_program_id(owner, mint, token_program);
    if ctx.rpc.get_account(&address).await?.is_some() {
        return Ok(address);
    }

    info!(owner = %owner, mint = %mint, ata = %address, "Creating associated token account");
    let ix = create_associated_token_account_idempotent(&payer.pubkey(), owner, mint, token_program);
    submit(&ctx.rpc, &[ix], payer, &[]).await?;
    Ok(address)
}

/// List `mint` for `price` lamports. The listing account is a fresh keypair
/// that co-signs its own creation.
pub async fn list_nft<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    mint: &Pubkey,
    price: u64,
) -> Result<ListReceipt, Error> {
    let wallet = ctx.wallet.require()?;
    let seller = wallet.pubkey();

    let (vault, _) = find_vault_address(&ctx.program_id, mint);
    let nft_account =
        get_associated_token_address_with_program_id(&seller, mint, &anchor_spl::token_2022::ID);
    let listing = Keypair::new();

    let accounts = ListNft {
        listing: listing.pubkey(),
        seller,
        nft_account,
        mint: *mint,
        vault,
        system_program: system_program::ID,
        token_program: anchor_spl::token_2022::ID,
        rent: sysvar::rent::ID,
    };
    let ix = instructions::list_nft(&ctx.program_id, &accounts, price);

    info!(mint = %mint, price, vault = %vault, listing = %listing.pubkey(), "Listing NFT");
    let signature = submit(&ctx.rpc, &[ix], wallet, &[&listing]).await?;
    info!(listing = %listing.pubkey(), %signature, "NFT listed");

    Ok(ListReceipt {
        listing: listing.pubkey(),
        vault,
        signature,
    })
}

/// Buy `listing` paying with `token`. Creates the buyer's and seller's
/// payment-token accounts and the buyer's NFT account when missing.
pub async fn buy_nft<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    listing: &Listing,
    token: PaymentToken,
) -> Result<Signature, Error> {
    let wallet = ctx.wallet.require()?;
    let buyer = wallet.pubkey();

    let (vault, vault_bump) = find_vault_address(&ctx.program_id, &listing.mint);
    let payment_mint = token.mint();
    info!(token = %token, mint = %listing.mint, buyer = %buyer, "Buying NFT");

    let buyer_token_account = ensure_associated_token_account(
        ctx,
        wallet,
        &buyer,
        &payment_mint,
        &anchor_spl::token::ID,
    )
    .await?;
    let seller_token_account = ensure_associated_token_account(
        ctx,
        wallet,
        &listing.seller,
        &payment_mint,
        &anchor_spl::token::ID,
    )
    .await?;
    let buyer_nft_account = ensure_associated_token_account(
        ctx,
        wallet,
        &buyer,
        &listing.mint,
        &anchor_spl::token_2022::ID,
    )
    .await?;
    let nft_account = get_associated_token_address_with_program_id(
        &listing.seller,
        &listing.mint,
        &anchor_spl::token_2022::ID,
    );

    let accounts = BuyNft {
        listing: listing.address,
        vault,
        buyer,
        seller: seller_token_account,
        nft_account,
        buyer_token_account,
        buyer_nft_account,
        token_program: anchor_spl::token_2022::ID,
        system_program: system_program::ID,
        token_program_usdc: anchor_spl::token::ID,
    };
    let ix = instructions::buy_nft(&ctx.program_id, &accounts, vault_bump);

    let signature = submit(&ctx.rpc, &[ix], wallet, &[]).await?;
    info!(listing = %listing.address, %signature, "NFT sold");
    Ok(signature)
}

/// Withdraw the connected seller's `listing`, returning the NFT.
pub async fn withdraw_nft<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    listing: &Listing,
) -> Result<Signature, Error> {
    let wallet = ctx.wallet.require()?;
    let seller = wallet.pubkey();

    let (vault, _) = find_vault_address(&ctx.program_id, &listing.mint);
    let nft_account = get_associated_token_address_with_program_id(
        &seller,
        &listing.mint,
        &anchor_spl::token_2022::ID,
    );

    let accounts = RemoveListedNft {
        seller,
        listing: listing.address,
        nft_account,
        mint: listing.mint,
        vault,
        system_program: system_program::ID,
        token_program: anchor_spl::token_2022::ID,
        rent: sysvar::rent::ID,
    };
    let ix = instructions::remove_listed_nft(&ctx.program_id, &accounts);

    let signature = submit(&ctx.rpc, &[ix], wallet, &[]).await?;
    info!(listing = %listing.address, %signature, "Listing removed");
    Ok(signature)
}
