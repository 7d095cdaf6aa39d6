//! In-memory chain and HTTP doubles shared by the unit tests.

use anchor_lang::AccountSerialize;
use serde_json::Value;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::context::{MarketContext, Wallet};
use crate::fetch::JsonFetcher;
use crate::rpc::MarketRpc;
use crate::state;
use crate::Error;

/// Records every call; serves accounts from a map.
pub(crate) struct MockRpc {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    calls: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<Transaction>>,
    fail_reads: AtomicBool,
    reject_sends: Mutex<Option<String>>,
    fail_confirmations: Mutex<Option<String>>,
    blockhash: Hash,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            reject_sends: Mutex::new(None),
            fail_confirmations: Mutex::new(None),
            blockhash: Hash::new_unique(),
        }
    }
}

impl MockRpc {
    pub(crate) fn insert_account(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make every subsequent submission fail as an on-chain rejection.
    pub(crate) fn reject_sends(&self, reason: &str) {
        *self.reject_sends.lock().unwrap() = Some(reason.to_string());
    }

    /// Accept submissions but report them as failed once they land.
    pub(crate) fn fail_confirmations(&self, reason: &str) {
        *self.fail_confirmations.lock().unwrap() = Some(reason.to_string());
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_reads(&self) -> Result<(), Error> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(Error::Rpc("connection refused".into()));
        }
        Ok(())
    }
}

impl MarketRpc for MockRpc {
    async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: u64,
    ) -> Result<Vec<(Pubkey, Account)>, Error> {
        self.record("get_program_accounts");
        self.check_reads()?;
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, a)| a.owner == *program_id && a.data.len() as u64 == data_size)
            .map(|(k, a)| (*k, a.clone()))
            .collect())
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, Error> {
        self.record("get_account");
        self.check_reads()?;
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, Error> {
        self.record("get_balance");
        self.check_reads()?;
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .map(|a| a.lamports)
            .unwrap_or(0))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Error> {
        self.record("get_latest_blockhash");
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, Error> {
        self.record("send_transaction");
        if let Some(reason) = self.reject_sends.lock().unwrap().clone() {
            return Err(Error::Rpc(reason));
        }
        if !transaction.is_signed() {
            return Err(Error::Signing("transaction is not fully signed".into()));
        }
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(&self, _signature: &Signature) -> Result<(), Error> {
        self.record("confirm_transaction");
        match self.fail_confirmations.lock().unwrap().clone() {
            Some(reason) => Err(Error::Rpc(reason)),
            None => Ok(()),
        }
    }
}

/// Serves canned JSON documents by URL; anything else is a 404.
#[derive(Default)]
pub(crate) struct MockFetcher {
    documents: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn with_document(self, url: &str, document: Value) -> Self {
        self.documents.lock().unwrap().insert(url.to_string(), document);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl JsonFetcher for MockFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, Error> {
        self.requests.lock().unwrap().push(url.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Http(format!("404 Not Found: {url}")))
    }
}

pub(crate) fn test_context(
    rpc: MockRpc,
    http: MockFetcher,
    wallet: Wallet,
) -> MarketContext<MockRpc, MockFetcher> {
    MarketContext::new(rpc, http, crate::ID, wallet)
}

/// A program-owned listing account as the marketplace program writes it.
pub(crate) fn listing_account(seller: Pubkey, mint: Pubkey, price: u64, is_active: bool) -> Account {
    let (_, vault_bump) = state::find_vault_address(&crate::ID, &mint);
    let listing = state::Listing {
        seller,
        mint,
        price,
        is_active,
        vault_bump,
        reserved: [0; 6],
    };
    let mut data = Vec::new();
    listing.try_serialize(&mut data).unwrap();
    Account {
        lamports: 1_461_600,
        data,
        owner: crate::ID,
        executable: false,
        rent_epoch: 0,
    }
}

/// A Token-2022 mint carrying an embedded `TokenMetadata` extension.
pub(crate) fn token_2022_mint(
    mint: Pubkey,
    name: &str,
    symbol: &str,
    uri: &str,
    additional: &[(&str, &str)],
) -> Account {
    fn put_str(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    // Base mint: no authorities, supply 1, decimals 0, initialized.
    let mut data = vec![0u8; 82];
    data[36..44].copy_from_slice(&1u64.to_le_bytes());
    data[45] = 1;
    // Pad to the token account length, then the account type byte (Mint).
    data.resize(165, 0);
    data.push(1);

    let mut value = Vec::new();
    value.extend_from_slice(&[0u8; 32]); // update authority: none
    value.extend_from_slice(mint.as_ref());
    put_str(&mut value, name);
    put_str(&mut value, symbol);
    put_str(&mut value, uri);
    value.extend_from_slice(&(additional.len() as u32).to_le_bytes());
    for (key, val) in additional {
        put_str(&mut value, key);
        put_str(&mut value, val);
    }

    // TLV entry: ExtensionType::TokenMetadata = 19, u16 length.
    data.extend_from_slice(&19u16.to_le_bytes());
    data.extend_from_slice(&(value.len() as u16).to_le_bytes());
    data.extend_from_slice(&value);

    Account {
        lamports: 3_000_000,
        data,
        owner: anchor_spl::token_2022::ID,
        executable: false,
        rent_epoch: 0,
    }
}
