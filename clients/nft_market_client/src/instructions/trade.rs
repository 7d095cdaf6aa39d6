use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use super::sighash;

// -------------------------------
// Accounts
// -------------------------------

/// Accounts for `list_nft`.
#[derive(Debug, Clone)]
pub struct ListNft {
    /// Fresh listing account; signs its own creation.
    pub listing: Pubkey,
    /// The NFT owner listing the NFT for sale.
    pub seller: Pubkey,
    /// Seller's Token-2022 ATA holding the NFT.
    pub nft_account: Pubkey,
    pub mint: Pubkey,
    /// Vault PDA: seeds = ["MARKETPLACE", "vault", mint]
    pub vault: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
    pub rent: Pubkey,
}

impl ListNft {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.listing, true),
            AccountMeta::new(self.seller, true),
            AccountMeta::new(self.nft_account, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.rent, false),
        ]
    }
}

/// Accounts for `buy_nft`.
#[derive(Debug, Clone)]
pub struct BuyNft {
    pub listing: Pubkey,
    pub vault: Pubkey,
    /// Buyer paying with the selected token and receiving the NFT.
    pub buyer: Pubkey,
    /// Seller's ATA for the payment token, not the seller wallet.
    pub seller: Pubkey,
    /// Seller's Token-2022 NFT ATA.
    pub nft_account: Pubkey,
    /// Buyer's ATA for the payment token.
    pub buyer_token_account: Pubkey,
    /// Buyer's Token-2022 ATA receiving the NFT.
    pub buyer_nft_account: Pubkey,
    pub token_program: Pubkey,
    pub system_program: Pubkey,
    /// SPL Token program that owns the payment token accounts.
    pub token_program_usdc: Pubkey,
}

impl BuyNft {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.listing, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new(self.buyer, true),
            AccountMeta::new(self.seller, false),
            AccountMeta::new(self.nft_account, false),
            AccountMeta::new(self.buyer_token_account, false),
            AccountMeta::new(self.buyer_nft_account, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.token_program_usdc, false),
        ]
    }
}

/// Accounts for `remove_listed_nft`.
#[derive(Debug, Clone)]
pub struct RemoveListedNft {
    pub seller: Pubkey,
    pub listing: Pubkey,
    /// Seller's Token-2022 ATA that receives the NFT back.
    pub nft_account: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
    pub rent: Pubkey,
}

impl RemoveListedNft {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.seller, true),
            AccountMeta::new(self.listing, false),
            AccountMeta::new(self.nft_account, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.rent, false),
        ]
    }
}

// -------------------------------
// Instructions
// -------------------------------

/// `list_nft(price: u64)`; price is in lamports.
pub fn list_nft(program_id: &Pubkey, accounts: &ListNft, price: u64) -> Instruction {
    let mut data = sighash("list_nft").to_vec();
    data.extend_from_slice(&price.to_le_bytes());
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data,
    }
}

/// `buy_nft(vault_bump: u8)`
pub fn buy_nft(program_id: &Pubkey, accounts: &BuyNft, vault_bump: u8) -> Instruction {
    let mut data = sighash("buy_nft").to_vec();
    data.push(vault_bump);
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data,
    }
}

/// `remove_listed_nft()`
pub fn remove_listed_nft(program_id: &Pubkey, accounts: &RemoveListedNft) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: sighash("remove_listed_nft").to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_accounts() -> ListNft {
        ListNft {
            listing: Pubkey::new_unique(),
            seller: Pubkey::new_unique(),
            nft_account: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            system_program: Pubkey::new_unique(),
            token_program: Pubkey::new_unique(),
            rent: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_list_nft_encodes_price_after_discriminator() {
        let accounts = list_accounts();
        let ix = list_nft(&crate::ID, &accounts, 1_500_000_000);
        assert_eq!(ix.program_id, crate::ID);
        assert_eq!(ix.data.len(), 16);
        assert_eq!(ix.data[..8], sighash("list_nft"));
        assert_eq!(ix.data[8..], 1_500_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_list_nft_signers_are_listing_and_seller() {
        let accounts = list_accounts();
        let ix = list_nft(&crate::ID, &accounts, 1);
        let signers: Vec<Pubkey> = ix
            .accounts
            .iter()
            .filter(|m| m.is_signer)
            .map(|m| m.pubkey)
            .collect();
        assert_eq!(signers, vec![accounts.listing, accounts.seller]);
        assert!(!ix.accounts[3].is_writable, "mint is read-only");
        assert!(ix.accounts[4].is_writable, "vault is writable");
    }

    #[test]
    fn test_buy_nft_account_order() {
        let accounts = BuyNft {
            listing: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            buyer: Pubkey::new_unique(),
            seller: Pubkey::new_unique(),
            nft_account: Pubkey::new_unique(),
            buyer_token_account: Pubkey::new_unique(),
            buyer_nft_account: Pubkey::new_unique(),
            token_program: Pubkey::new_unique(),
            system_program: Pubkey::new_unique(),
            token_program_usdc: Pubkey::new_unique(),
        };
        let ix = buy_nft(&crate::ID, &accounts, 254);
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                accounts.listing,
                accounts.vault,
                accounts.buyer,
                accounts.seller,
                accounts.nft_account,
                accounts.buyer_token_account,
                accounts.buyer_nft_account,
                accounts.token_program,
                accounts.system_program,
                accounts.token_program_usdc,
            ]
        );
        assert!(ix.accounts[2].is_signer);
        assert_eq!(ix.data[..8], sighash("buy_nft"));
        assert_eq!(ix.data[8..], [254u8]);
    }

    #[test]
    fn test_remove_listed_nft_has_no_args() {
        let accounts = RemoveListedNft {
            seller: Pubkey::new_unique(),
            listing: Pubkey::new_unique(),
            nft_account: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            system_program: Pubkey::new_unique(),
            token_program: Pubkey::new_unique(),
            rent: Pubkey::new_unique(),
        };
        let ix = remove_listed_nft(&crate::ID, &accounts);
        assert_eq!(ix.data, sighash("remove_listed_nft").to_vec());
        assert_eq!(ix.accounts.len(), 8);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
    }
}
