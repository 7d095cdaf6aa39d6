//! Chain access used by the reader, enricher and transaction builder.

use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::RpcFilterType;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::Error;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A blockhash expires after 150 slots (about 60 s); an unseen signature is
/// dropped after that.
const CONFIRM_MAX_POLLS: usize = 150;

/// The subset of Solana JSON-RPC the marketplace needs.
pub trait MarketRpc: Send + Sync + 'static {
    /// Accounts owned by `program_id` whose data is exactly `data_size` bytes.
    fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: u64,
    ) -> impl Future<Output = Result<Vec<(Pubkey, Account)>, Error>> + Send;

    /// `None` when the account does not exist.
    fn get_account(
        &self,
        address: &Pubkey,
    ) -> impl Future<Output = Result<Option<Account>, Error>> + Send;

    fn get_balance(&self, address: &Pubkey) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Latest finalized blockhash.
    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, Error>> + Send;

    fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = Result<Signature, Error>> + Send;

    /// Resolves once the signature reaches the client's commitment level.
    /// A transaction that landed but failed on chain is an error.
    fn confirm_transaction(
        &self,
        signature: &Signature,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl MarketRpc for RpcClient {
    async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: u64,
    ) -> Result<Vec<(Pubkey, Account)>, Error> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(data_size)]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .get_program_accounts_with_config(program_id, config)
            .await?;
        debug!(program = %program_id, count = accounts.len(), "Fetched program accounts");
        Ok(accounts)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, Error> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, Error> {
        Ok(RpcClient::get_balance(self, address).await?)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Error> {
        let (hash, _last_valid_height) = self
            .get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
            .await?;
        Ok(hash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, Error> {
        Ok(RpcClient::send_transaction(self, transaction).await?)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), Error> {
        for _ in 0..CONFIRM_MAX_POLLS {
            match self
                .get_signature_status_with_commitment(signature, self.commitment())
                .await?
            {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => {
                    return Err(Error::Rpc(format!("transaction {signature} failed: {e}")))
                }
                None => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }
        Err(Error::Rpc(format!(
            "transaction {signature} was not confirmed before its blockhash expired"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_client::rpc_request::RpcRequest;
    use solana_sdk::instruction::InstructionError;
    use solana_sdk::transaction::TransactionError;
    use std::collections::HashMap;

    fn status_response(err: Option<TransactionError>) -> serde_json::Value {
        let status = match &err {
            Some(e) => json!({ "Err": e }),
            None => json!({ "Ok": null }),
        };
        json!({
            "context": { "slot": 1 },
            "value": [{
                "slot": 1,
                "confirmations": null,
                "status": status,
                "err": err,
                "confirmationStatus": "finalized",
            }],
        })
    }

    #[tokio::test]
    async fn test_confirm_reports_on_chain_failure() {
        let failed = TransactionError::InstructionError(0, InstructionError::Custom(6000));
        let mut mocks = HashMap::new();
        mocks.insert(RpcRequest::GetSignatureStatuses, status_response(Some(failed)));
        let rpc = RpcClient::new_mock_with_mocks("succeeds".to_string(), mocks);

        let result = MarketRpc::confirm_transaction(&rpc, &Signature::default()).await;
        match result {
            Err(Error::Rpc(msg)) => assert!(msg.contains("custom program error"), "{msg}"),
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirm_accepts_successful_status() {
        let mut mocks = HashMap::new();
        mocks.insert(RpcRequest::GetSignatureStatuses, status_response(None));
        let rpc = RpcClient::new_mock_with_mocks("succeeds".to_string(), mocks);

        let result = MarketRpc::confirm_transaction(&rpc, &Signature::default()).await;
        assert_eq!(result, Ok(()));
    }
}
