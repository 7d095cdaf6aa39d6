use anchor_lang::prelude::*;

/// On-chain listing record owned by the marketplace program.
///
/// Created by `list_nft`, deactivated by `buy_nft` or `remove_listed_nft`.
/// The client only ever reads it.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Listing {
    pub seller: Pubkey,
    pub mint: Pubkey,
    pub price: u64,
    pub is_active: bool,
    pub vault_bump: u8,
    pub reserved: [u8; 6],
}

impl Listing {
    /// Discriminator + body. Used as the `dataSize` filter when enumerating.
    pub const ACCOUNT_SIZE: usize = 8 + Listing::INIT_SPACE;
}

pub const MARKETPLACE_PREFIX: &[u8; 11] = b"MARKETPLACE";
pub const VAULT_SEED: &[u8; 5] = b"vault";

/// Vault PDA: seeds = ["MARKETPLACE", "vault", mint]
pub fn find_vault_address(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MARKETPLACE_PREFIX, VAULT_SEED, mint.as_ref()], program_id)
}
