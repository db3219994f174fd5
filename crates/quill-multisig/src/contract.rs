//! Multisig wallet operations.
//!
//! Each operation authenticates its envelope, enforces the operation
//! policy, then mutates wallet state. The acting owner is the first
//! authenticated signer's ETH address, which the authenticator has already
//! recovered from the envelope's signature. State is written only after
//! every check has passed.

use crate::state::{MultisigState, PendingTx};
use quill_auth::{authenticate_and_authorize, Context, Envelope, OperationPolicy};
use quill_crypto::normalize_eth_address;
use quill_store::LedgerStub;
use quill_types::ChainError;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const EVENT_MULTISIG_CREATED: &str = "MultisigCreated";
pub const EVENT_TX_SUBMITTED: &str = "TxSubmitted";
pub const EVENT_TX_EXECUTED: &str = "TxExecuted";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMultisigDto {
    pub wallet_id: String,
    pub owners: Vec<String>,
    pub threshold: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTxDto {
    pub wallet_id: String,
    pub to: String,
    pub data: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTxDto {
    pub wallet_id: String,
    pub nonce: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWalletDto {
    pub wallet_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MultisigCreatedEvent<'a> {
    wallet_id: &'a str,
    owners: &'a [String],
    threshold: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TxSubmittedEvent<'a> {
    wallet_id: &'a str,
    nonce: u64,
    to: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TxExecutedEvent<'a> {
    wallet_id: &'a str,
    nonce: u64,
}

fn emit<T: Serialize>(
    stub: &mut dyn LedgerStub,
    name: &str,
    event: &T,
) -> Result<(), ChainError> {
    let payload = serde_json::to_vec(event)?;
    stub.set_event(name, payload)?;
    Ok(())
}

/// ETH address of the acting owner: the first authenticated signer.
fn acting_owner(ctx: &Context) -> Result<String, ChainError> {
    ctx.calling_user()
        .and_then(|user| user.eth_address.clone())
        .ok_or_else(|| ChainError::validation("operation requires an ETH-addressed signer"))
}

/// Create a wallet. Fails when the wallet already exists or the threshold
/// does not fit the owner set. Returns the wallet id.
pub fn create_multisig(ctx: &mut Context, envelope: &Envelope) -> Result<String, ChainError> {
    authenticate_and_authorize(ctx, envelope, &OperationPolicy::submit())?;
    let dto: CreateMultisigDto = envelope.parse_payload()?;

    if dto.threshold == 0 {
        return Err(ChainError::validation("threshold must be positive"));
    }
    if dto.owners.is_empty() {
        return Err(ChainError::validation("owners must not be empty"));
    }
    if (dto.owners.len() as u32) < dto.threshold {
        return Err(ChainError::validation(format!(
            "threshold {} exceeds owner count {}",
            dto.threshold,
            dto.owners.len()
        )));
    }

    let mut owners = Vec::with_capacity(dto.owners.len());
    for owner in &dto.owners {
        let owner = normalize_eth_address(owner)?;
        if owners.contains(&owner) {
            return Err(ChainError::validation(format!("duplicate owner {owner}")));
        }
        owners.push(owner);
    }

    if MultisigState::load(ctx.stub, &dto.wallet_id)?.is_some() {
        return Err(ChainError::validation(format!(
            "multisig wallet {} already exists",
            dto.wallet_id
        )));
    }

    let wallet = MultisigState::new(dto.wallet_id.clone(), owners, dto.threshold);
    wallet.save(ctx.stub)?;
    emit(
        ctx.stub,
        EVENT_MULTISIG_CREATED,
        &MultisigCreatedEvent {
            wallet_id: &wallet.wallet_id,
            owners: &wallet.owners,
            threshold: wallet.threshold,
        },
    )?;

    info!(wallet = %wallet.wallet_id, owners = wallet.owners.len(), threshold = wallet.threshold, "created multisig wallet");
    Ok(dto.wallet_id)
}

/// Submit a transaction, counting the submitter as its first confirmation.
/// Returns the assigned nonce. With a threshold of one the submission
/// executes immediately.
pub fn submit_tx(ctx: &mut Context, envelope: &Envelope) -> Result<u64, ChainError> {
    authenticate_and_authorize(ctx, envelope, &OperationPolicy::submit())?;
    let dto: SubmitTxDto = envelope.parse_payload()?;

    let mut wallet = MultisigState::load(ctx.stub, &dto.wallet_id)?
        .ok_or_else(|| ChainError::not_found("multisig wallet", dto.wallet_id.clone()))?;

    let submitter = acting_owner(ctx)?;
    if !wallet.is_owner(&submitter) {
        return Err(ChainError::validation(format!(
            "Submitter {submitter} is not an owner of wallet {}",
            wallet.wallet_id
        )));
    }

    let nonce = wallet.nonce;
    wallet.pending_txs.insert(
        nonce,
        PendingTx {
            to: dto.to.clone(),
            data: dto.data,
            confirmations: vec![submitter],
        },
    );
    wallet.nonce += 1;

    // The threshold-reaching rule applies uniformly: with threshold one the
    // submitter's own confirmation executes the transaction.
    let executed = wallet.threshold == 1;
    if executed {
        wallet.pending_txs.remove(&nonce);
    }

    wallet.save(ctx.stub)?;
    emit(
        ctx.stub,
        EVENT_TX_SUBMITTED,
        &TxSubmittedEvent {
            wallet_id: &wallet.wallet_id,
            nonce,
            to: &dto.to,
        },
    )?;
    if executed {
        emit(
            ctx.stub,
            EVENT_TX_EXECUTED,
            &TxExecutedEvent {
                wallet_id: &wallet.wallet_id,
                nonce,
            },
        )?;
    }

    info!(wallet = %wallet.wallet_id, nonce, executed, "submitted multisig transaction");
    Ok(nonce)
}

/// Confirm a pending transaction. Returns whether the confirmation reached
/// the threshold and executed it.
pub fn confirm_tx(ctx: &mut Context, envelope: &Envelope) -> Result<bool, ChainError> {
    authenticate_and_authorize(ctx, envelope, &OperationPolicy::submit())?;
    let dto: ConfirmTxDto = envelope.parse_payload()?;

    let mut wallet = MultisigState::load(ctx.stub, &dto.wallet_id)?
        .ok_or_else(|| ChainError::not_found("multisig wallet", dto.wallet_id.clone()))?;

    let confirmer = acting_owner(ctx)?;
    if !wallet.is_owner(&confirmer) {
        return Err(ChainError::validation(format!(
            "Confirmer {confirmer} is not an owner of wallet {}",
            wallet.wallet_id
        )));
    }

    let pending = wallet.pending_txs.get_mut(&dto.nonce).ok_or_else(|| {
        ChainError::validation(format!(
            "no pending transaction with nonce {} in wallet {}",
            dto.nonce, dto.wallet_id
        ))
    })?;
    if pending.confirmations.contains(&confirmer) {
        return Err(ChainError::validation(format!(
            "owner {confirmer} already confirmed transaction {} of wallet {}",
            dto.nonce, dto.wallet_id
        )));
    }

    pending.confirmations.push(confirmer);
    let executed = pending.confirmations.len() as u32 >= wallet.threshold;
    if executed {
        wallet.pending_txs.remove(&dto.nonce);
    }

    wallet.save(ctx.stub)?;
    if executed {
        emit(
            ctx.stub,
            EVENT_TX_EXECUTED,
            &TxExecutedEvent {
                wallet_id: &wallet.wallet_id,
                nonce: dto.nonce,
            },
        )?;
    }

    info!(wallet = %wallet.wallet_id, nonce = dto.nonce, executed, "confirmed multisig transaction");
    Ok(executed)
}

/// Read a wallet's current state.
pub fn get_wallet(ctx: &mut Context, envelope: &Envelope) -> Result<MultisigState, ChainError> {
    authenticate_and_authorize(ctx, envelope, &OperationPolicy::evaluate())?;
    let dto: GetWalletDto = envelope.parse_payload()?;

    MultisigState::load(ctx.stub, &dto.wallet_id)?
        .ok_or_else(|| ChainError::not_found("multisig wallet", dto.wallet_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtos_parse_from_camel_case_json() {
        let dto: CreateMultisigDto = serde_json::from_value(serde_json::json!({
            "walletId": "W",
            "owners": ["0xaaa1"],
            "threshold": 1
        }))
        .unwrap();
        assert_eq!(dto.wallet_id, "W");

        let dto: ConfirmTxDto =
            serde_json::from_value(serde_json::json!({"walletId": "W", "nonce": 4})).unwrap();
        assert_eq!(dto.nonce, 4);
    }
}
