//! build → blockhash → sign → send → confirm.

use solana_sdk::instruction::Instruction;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info};

use crate::rpc::MarketRpc;
use crate::Error;

/// Sign `instructions` with the fee payer plus any co-signers, submit, and
/// wait for confirmation.
pub(crate) async fn submit<R: MarketRpc>(
    rpc: &R,
    instructions: &[Instruction],
    fee_payer: &dyn Signer,
    co_signers: &[&dyn Signer],
) -> Result<Signature, Error> {
    let blockhash = rpc.get_latest_blockhash().await?;

    let mut transaction = Transaction::new_with_payer(instructions, Some(&fee_payer.pubkey()));

    let mut signers: Vec<&dyn Signer> = Vec::with_capacity(1 + co_signers.len());
    signers.push(fee_payer);
    signers.extend_from_slice(co_signers);
    transaction
        .try_sign(&signers, blockhash)
        .map_err(|e| Error::Signing(e.to_string()))?;

    let signature = rpc.send_transaction(&transaction).await?;
    debug!(%signature, "Transaction submitted");

    rpc.confirm_transaction(&signature).await?;
    info!(%signature, "Transaction confirmed");
    Ok(signature)
}
