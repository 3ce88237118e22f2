//! Timelock scheduler.
//!
//! Entries are content-addressed: the queue stores only the sha256 of an
//! entry's XDR-encoded fields, so executing or cancelling an entry requires
//! presenting exactly the fields it was queued with. Every mutation takes a
//! capability minted by the proposal engine.
use soroban_sdk::{
    contractclient, log, xdr::ToXdr, Address, BytesN, Env, Error, IntoVal, Symbol, Val, Vec,
};

use crate::errors::MultisigError;
use crate::events::{
    emit_delay_changed, emit_transaction_cancelled, emit_transaction_executed,
    emit_transaction_queued, DelayChangedEvent, TransactionCancelledEvent,
    TransactionExecutedEvent, TransactionQueuedEvent,
};
use crate::proposal::{EngineCall, SelfCall};
use crate::storage::{self, DataKey};
use crate::types::{GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY};

/// Guarded invocation surface of the custody vault.
#[contractclient(name = "VaultClient")]
pub trait VaultInterface {
    fn execute(
        env: Env,
        caller: Address,
        target: Address,
        value: i128,
        function: Option<Symbol>,
        args: Vec<Val>,
        funder: Address,
        attached: i128,
    ) -> Val;
}

/// One scheduled action.
///
/// `call_from` selects the invocation route but is not part of the hash.
#[derive(Clone, Debug)]
pub struct TimelockEntry {
    pub proposal_id: u64,
    pub index: u32,
    pub target: Address,
    pub value: i128,
    pub function: Option<Symbol>,
    pub args: Vec<Val>,
    pub eta: u64,
    pub call_from: Address,
}

/// Result of the downstream call behind an entry.
pub type Outcome = Result<Val, Error>;

pub fn init(env: &Env, delay: u64, vault: Address) -> Result<(), MultisigError> {
    check_delay(delay)?;
    env.storage().instance().set(&DataKey::Delay, &delay);
    env.storage().instance().set(&DataKey::Vault, &vault);
    Ok(())
}

fn check_delay(delay: u64) -> Result<(), MultisigError> {
    if delay < MINIMUM_DELAY {
        return Err(MultisigError::DelayTooLow);
    }
    if delay > MAXIMUM_DELAY {
        return Err(MultisigError::DelayTooHigh);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────────────────────────

pub fn delay(env: &Env) -> Result<u64, MultisigError> {
    env.storage()
        .instance()
        .get(&DataKey::Delay)
        .ok_or(MultisigError::NotInitialized)
}

pub fn vault(env: &Env) -> Result<Address, MultisigError> {
    env.storage()
        .instance()
        .get(&DataKey::Vault)
        .ok_or(MultisigError::NotInitialized)
}

pub fn is_queued(env: &Env, hash: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Queued(hash.clone()))
        .unwrap_or(false)
}

pub fn hash_entry(env: &Env, entry: &TimelockEntry) -> BytesN<32> {
    let key = (
        entry.proposal_id,
        entry.index,
        entry.target.clone(),
        entry.value,
        entry.function.clone(),
        entry.args.clone(),
        entry.eta,
    );
    env.crypto().sha256(&key.to_xdr(env)).to_bytes()
}

// ─────────────────────────────────────────────────────────────────────────────
// Owner operations
// ─────────────────────────────────────────────────────────────────────────────

pub fn queue_transaction(
    env: &Env,
    _owner: &EngineCall,
    entry: &TimelockEntry,
) -> Result<BytesN<32>, MultisigError> {
    let earliest = env.ledger().timestamp().saturating_add(delay(env)?);
    if entry.eta < earliest {
        return Err(MultisigError::DelayTooLow);
    }

    let hash = hash_entry(env, entry);
    let key = DataKey::Queued(hash.clone());
    env.storage().persistent().set(&key, &true);
    storage::extend_persistent(env, &key);

    emit_transaction_queued(
        env,
        TransactionQueuedEvent {
            hash: hash.clone(),
            proposal_id: entry.proposal_id,
            index: entry.index,
            target: entry.target.clone(),
            value: entry.value,
            eta: entry.eta,
        },
    );
    Ok(hash)
}

/// Clears the entry's queued flag. Cancelling an entry that is not queued is
/// a no-op.
pub fn cancel_transaction(env: &Env, _owner: &EngineCall, entry: &TimelockEntry) -> BytesN<32> {
    let hash = hash_entry(env, entry);
    env.storage()
        .persistent()
        .remove(&DataKey::Queued(hash.clone()));

    emit_transaction_cancelled(
        env,
        TransactionCancelledEvent {
            hash: hash.clone(),
            proposal_id: entry.proposal_id,
            index: entry.index,
        },
    );
    hash
}

/// Consumes a due entry and performs its call.
///
/// Ordering violations are returned as the outer error. The inner
/// [`Outcome`] is the downstream call's result, left to the engine's failure
/// policy. Entries targeting this contract are handed to `on_self`; entries
/// routed through the vault go through [`VaultClient`]; anything else is
/// invoked directly.
pub fn execute_transaction<F>(
    env: &Env,
    _owner: &EngineCall,
    entry: &TimelockEntry,
    funder: &Address,
    attached: i128,
    on_self: F,
) -> Result<Outcome, MultisigError>
where
    F: FnOnce(&Env, &TimelockEntry) -> Outcome,
{
    let hash = hash_entry(env, entry);
    if !is_queued(env, &hash) {
        return Err(MultisigError::NotQueued);
    }
    let now = env.ledger().timestamp();
    if now < entry.eta {
        return Err(MultisigError::ProposalExpired);
    }
    if now > entry.eta.saturating_add(GRACE_PERIOD) {
        return Err(MultisigError::ProposalStale);
    }

    env.storage()
        .persistent()
        .remove(&DataKey::Queued(hash.clone()));

    let vault = vault(env)?;
    let outcome = if entry.target == env.current_contract_address() {
        on_self(env, entry)
    } else if entry.call_from == vault {
        invoke_through_vault(env, &vault, entry, funder, attached)
    } else {
        invoke_direct(env, entry)
    };

    log!(
        env,
        "timelock execute proposal={} index={} success={}",
        entry.proposal_id,
        entry.index,
        outcome.is_ok()
    );
    emit_transaction_executed(
        env,
        TransactionExecutedEvent {
            hash,
            proposal_id: entry.proposal_id,
            index: entry.index,
            target: entry.target.clone(),
            value: entry.value,
            success: outcome.is_ok(),
        },
    );
    Ok(outcome)
}

pub fn set_delay(env: &Env, _auth: &SelfCall, delay: u64) -> Result<(), MultisigError> {
    check_delay(delay)?;
    let prior = self::delay(env)?;
    env.storage().instance().set(&DataKey::Delay, &delay);

    log!(env, "timelock delay {} -> {}", prior, delay);
    emit_delay_changed(
        env,
        DelayChangedEvent {
            prior,
            current: delay,
        },
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation routes
// ─────────────────────────────────────────────────────────────────────────────

fn invoke_through_vault(
    env: &Env,
    vault: &Address,
    entry: &TimelockEntry,
    funder: &Address,
    attached: i128,
) -> Outcome {
    let client = VaultClient::new(env, vault);
    match client.try_execute(
        &env.current_contract_address(),
        &entry.target,
        &entry.value,
        &entry.function,
        &entry.args,
        funder,
        &attached,
    ) {
        Ok(Ok(result)) => Ok(result),
        Err(Ok(err)) => Err(err),
        _ => Err(MultisigError::CallFailed.into()),
    }
}

/// Direct calls carry no value; a value-only entry is a no-op.
fn invoke_direct(env: &Env, entry: &TimelockEntry) -> Outcome {
    let Some(function) = entry.function.as_ref() else {
        return Ok(().into_val(env));
    };
    match env.try_invoke_contract::<Val, Error>(&entry.target, function, entry.args.clone()) {
        Ok(Ok(result)) => Ok(result),
        _ => Err(MultisigError::CallFailed.into()),
    }
}
