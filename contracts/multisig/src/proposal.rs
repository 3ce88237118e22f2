//! Proposal engine: batch lifecycle, quorum crossing, and execution.
//!
//! The engine is the only module able to mint the capabilities that unlock
//! the timelock ([`EngineCall`]) and registry or delay reconfiguration
//! ([`SelfCall`]). Reconfiguration is reachable solely by executing a
//! self-targeted proposal action, which is decoded and applied in-process.
use soroban_sdk::{
    log, panic_with_error, Address, BytesN, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec,
};

use crate::errors::MultisigError;
use crate::events::{
    emit_proposal_cancelled, emit_proposal_created, emit_proposal_executed,
    emit_proposal_queued, emit_proposal_signed, ProposalCancelledEvent, ProposalCreatedEvent,
    ProposalExecutedEvent, ProposalQueuedEvent, ProposalSignedEvent,
};
use crate::registry;
use crate::storage::{self, DataKey};
use crate::timelock::{self, Outcome, TimelockEntry};
use crate::types::{
    ActionResult, AdminAction, Proposal, ProposalActions, ProposalStatus, ADMIN_CALL,
    TIME_FOR_SIGNING,
};

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Proof that a registry or delay mutation runs as part of an executed
/// self-targeted action.
pub struct SelfCall {
    _sealed: (),
}

/// Proof that a timelock mutation is requested by the proposal engine.
pub struct EngineCall {
    _sealed: (),
}

impl SelfCall {
    fn new() -> Self {
        Self { _sealed: () }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new()
    }
}

impl EngineCall {
    fn new() -> Self {
        Self { _sealed: () }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Status as observed at `now`. A proposal still collecting signatures after
/// its signing window reads as `Cancelled`; nothing is written.
pub fn live_status(proposal: &Proposal, now: u64) -> ProposalStatus {
    match proposal.status {
        ProposalStatus::Initialized
            if now >= proposal.initiated_at.saturating_add(TIME_FOR_SIGNING) =>
        {
            ProposalStatus::Cancelled
        }
        status => status,
    }
}

pub fn load(env: &Env, id: u64) -> Option<Proposal> {
    env.storage().persistent().get(&DataKey::Proposal(id))
}

/// Writes the proposal and keeps it and the configuration live.
fn save(env: &Env, proposal: &Proposal) {
    let key = DataKey::Proposal(proposal.id);
    env.storage().persistent().set(&key, proposal);
    storage::extend_persistent(env, &key);
    storage::extend_instance(env);
}

pub fn status(env: &Env, id: u64) -> ProposalStatus {
    match load(env, id) {
        Some(proposal) => live_status(&proposal, env.ledger().timestamp()),
        None => ProposalStatus::Empty,
    }
}

pub fn actions(env: &Env, id: u64) -> Option<ProposalActions> {
    load(env, id).map(|p| ProposalActions {
        targets: p.targets,
        values: p.values,
        functions: p.functions,
        args: p.args,
    })
}

pub fn count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0)
}

pub fn voted(env: &Env, id: u64, signer: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Voted(id, signer.clone()))
        .unwrap_or(false)
}

fn record_vote(env: &Env, id: u64, signer: &Address) {
    let key = DataKey::Voted(id, signer.clone());
    env.storage().persistent().set(&key, &true);
    storage::extend_persistent(env, &key);
}

/// Timelock hash of action `index`, available once the proposal is queued.
pub fn entry_hash(env: &Env, id: u64, index: u32) -> Option<BytesN<32>> {
    let proposal = load(env, id)?;
    let eta = proposal.eta?;
    let entry = timelock_entry(&proposal, index, eta).ok()?;
    Some(timelock::hash_entry(env, &entry))
}

fn timelock_entry(
    proposal: &Proposal,
    index: u32,
    eta: u64,
) -> Result<TimelockEntry, MultisigError> {
    Ok(TimelockEntry {
        proposal_id: proposal.id,
        index,
        target: proposal
            .targets
            .get(index)
            .ok_or(MultisigError::ArrayLengthMismatch)?,
        value: proposal
            .values
            .get(index)
            .ok_or(MultisigError::ArrayLengthMismatch)?,
        function: proposal
            .functions
            .get(index)
            .ok_or(MultisigError::ArrayLengthMismatch)?,
        args: proposal
            .args
            .get(index)
            .ok_or(MultisigError::ArrayLengthMismatch)?,
        eta,
        call_from: proposal.call_from.clone(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

pub fn initialize(
    env: &Env,
    signers: Vec<Address>,
    delay: u64,
    vault: Address,
) -> Result<(), MultisigError> {
    if env.storage().instance().has(&DataKey::Signers) {
        return Err(MultisigError::AlreadyInitialized);
    }
    let total = signers.len();
    registry::init(env, signers)?;
    timelock::init(env, delay, vault.clone())?;
    env.storage().instance().set(&DataKey::ProposalCount, &0u64);
    storage::extend_instance(env);

    log!(
        env,
        "multisig initialize signers={} delay={} vault={}",
        total,
        delay,
        vault
    );
    Ok(())
}

pub fn create_and_sign(
    env: &Env,
    proposer: Address,
    targets: Vec<Address>,
    values: Vec<i128>,
    functions: Vec<Option<Symbol>>,
    args: Vec<Vec<Val>>,
    description: String,
    call_from: Address,
) -> Result<u64, MultisigError> {
    registry::require_signer(env, &proposer)?;

    let len = targets.len();
    if len == 0 || values.len() != len || functions.len() != len || args.len() != len {
        return Err(MultisigError::ArrayLengthMismatch);
    }

    let vault_routed = call_from == timelock::vault(env)?;
    let this = env.current_contract_address();
    for (target, value) in targets.iter().zip(values.iter()) {
        if value < 0 {
            return Err(MultisigError::InvalidAction);
        }
        if value > 0 && (!vault_routed || target == this) {
            return Err(MultisigError::InvalidAction);
        }
    }

    let id = count(env)
        .checked_add(1)
        .ok_or(MultisigError::InvalidAction)?;
    let now = env.ledger().timestamp();
    let proposal = Proposal {
        id,
        proposer: proposer.clone(),
        status: ProposalStatus::Initialized,
        signs: 1,
        targets,
        values,
        functions,
        args,
        call_from: call_from.clone(),
        description,
        initiated_at: now,
        eta: None,
    };
    save(env, &proposal);
    record_vote(env, id, &proposer);
    env.storage().instance().set(&DataKey::ProposalCount, &id);

    log!(env, "proposal create id={} proposer={} actions={}", id, proposer, len);
    emit_proposal_created(
        env,
        ProposalCreatedEvent {
            proposal_id: id,
            proposer,
            actions: len,
            call_from,
            timestamp: now,
        },
    );
    Ok(id)
}

/// Records `signer`'s vote and returns the new signature count. The vote
/// that reaches the current quorum fixes `eta` and queues every action;
/// later votes on a queued proposal are counted but never move `eta`.
pub fn sign(env: &Env, signer: Address, id: u64) -> Result<u32, MultisigError> {
    registry::require_signer(env, &signer)?;

    let mut proposal = load(env, id).ok_or(MultisigError::WrongStatus)?;
    if voted(env, id, &signer) {
        return Err(MultisigError::AlreadySigned);
    }
    let now = env.ledger().timestamp();
    let status = live_status(&proposal, now);
    if status != ProposalStatus::Initialized && status != ProposalStatus::Queued {
        return Err(MultisigError::WrongStatus);
    }

    proposal.signs += 1;
    record_vote(env, id, &signer);

    if status == ProposalStatus::Initialized && proposal.signs >= registry::required_signs(env) {
        let eta = now.saturating_add(timelock::delay(env)?);
        let owner = EngineCall::new();
        for index in 0..proposal.targets.len() {
            let entry = timelock_entry(&proposal, index, eta)?;
            timelock::queue_transaction(env, &owner, &entry)?;
        }
        proposal.eta = Some(eta);
        proposal.status = ProposalStatus::Queued;

        log!(env, "proposal queued id={} eta={}", id, eta);
        emit_proposal_queued(env, ProposalQueuedEvent { proposal_id: id, eta });
    }
    save(env, &proposal);

    emit_proposal_signed(
        env,
        ProposalSignedEvent {
            proposal_id: id,
            signer,
            signs: proposal.signs,
        },
    );
    Ok(proposal.signs)
}

/// Runs every queued action of proposal `id` in order.
///
/// Timelock ordering violations always abort. A failing downstream call
/// aborts the whole execution unless `allow_partial` is set, in which case
/// the failure is recorded and the remaining actions still run. `attached`
/// is pulled from `executor` into the vault with the first vault-routed
/// action.
pub fn execute(
    env: &Env,
    executor: Address,
    id: u64,
    allow_partial: bool,
    attached: i128,
) -> Result<Vec<ActionResult>, MultisigError> {
    registry::require_signer(env, &executor)?;

    let mut proposal = load(env, id).ok_or(MultisigError::WrongStatus)?;
    if live_status(&proposal, env.ledger().timestamp()) != ProposalStatus::Queued {
        return Err(MultisigError::WrongStatus);
    }
    let eta = proposal.eta.ok_or(MultisigError::WrongStatus)?;

    let vault = timelock::vault(env)?;
    if attached < 0 || (attached > 0 && proposal.call_from != vault) {
        return Err(MultisigError::InvalidAction);
    }

    let owner = EngineCall::new();
    let this = env.current_contract_address();
    let mut remaining = attached;
    let mut results = Vec::new(env);
    let (mut succeeded, mut failed) = (0u32, 0u32);

    for index in 0..proposal.targets.len() {
        let entry = timelock_entry(&proposal, index, eta)?;
        // a failed action's vault frame is rolled back, so the top-up stays
        // pending until a vault-routed action succeeds
        let forwarded = if entry.call_from == vault && entry.target != this {
            remaining
        } else {
            0
        };

        let outcome =
            timelock::execute_transaction(env, &owner, &entry, &executor, forwarded, dispatch_self)?;
        match outcome {
            Ok(data) => {
                succeeded += 1;
                remaining -= forwarded;
                results.push_back(ActionResult {
                    index,
                    success: true,
                    data: Vec::from_array(env, [data]),
                });
            }
            Err(err) if allow_partial => {
                failed += 1;
                log!(env, "proposal {} action {} failed: {}", id, index, err);
                results.push_back(ActionResult {
                    index,
                    success: false,
                    data: Vec::new(env),
                });
            }
            Err(err) => {
                return Err(
                    MultisigError::try_from(err).unwrap_or_else(|err| panic_with_error!(env, err))
                );
            }
        }
    }

    proposal.status = ProposalStatus::Executed;
    save(env, &proposal);

    log!(
        env,
        "proposal executed id={} succeeded={} failed={}",
        id,
        succeeded,
        failed
    );
    emit_proposal_executed(
        env,
        ProposalExecutedEvent {
            proposal_id: id,
            executor,
            succeeded,
            failed,
            timestamp: env.ledger().timestamp(),
        },
    );
    Ok(results)
}

pub fn cancel(env: &Env, caller: Address, id: u64) -> Result<(), MultisigError> {
    registry::require_signer(env, &caller)?;

    let mut proposal = load(env, id).ok_or(MultisigError::WrongStatus)?;
    match live_status(&proposal, env.ledger().timestamp()) {
        ProposalStatus::Initialized => {}
        ProposalStatus::Queued => {
            let eta = proposal.eta.ok_or(MultisigError::WrongStatus)?;
            let owner = EngineCall::new();
            for index in 0..proposal.targets.len() {
                let entry = timelock_entry(&proposal, index, eta)?;
                timelock::cancel_transaction(env, &owner, &entry);
            }
        }
        _ => return Err(MultisigError::WrongStatus),
    }

    proposal.status = ProposalStatus::Cancelled;
    save(env, &proposal);

    log!(env, "proposal cancelled id={} by={}", id, caller);
    emit_proposal_cancelled(
        env,
        ProposalCancelledEvent {
            proposal_id: id,
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Self-targeted dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn dispatch_self(env: &Env, entry: &TimelockEntry) -> Outcome {
    let action = decode_admin_action(env, entry)?;
    apply_admin_action(env, &SelfCall::new(), action)?;
    Ok(().into_val(env))
}

/// A self-targeted entry must be exactly `admin_call(action)` with no value.
fn decode_admin_action(env: &Env, entry: &TimelockEntry) -> Result<AdminAction, MultisigError> {
    let expected = Symbol::new(env, ADMIN_CALL);
    if entry.function.as_ref() != Some(&expected) || entry.args.len() != 1 || entry.value != 0 {
        return Err(MultisigError::CallFailed);
    }
    let raw = entry.args.get(0).ok_or(MultisigError::CallFailed)?;
    AdminAction::try_from_val(env, &raw).map_err(|_| MultisigError::CallFailed)
}

fn apply_admin_action(
    env: &Env,
    auth: &SelfCall,
    action: AdminAction,
) -> Result<(), MultisigError> {
    match action {
        AdminAction::AddSigner(id) => registry::add_signer(env, auth, id),
        AdminAction::RemoveSigner(id) => registry::remove_signer(env, auth, id),
        AdminAction::FlipSigner(old, new) => registry::flip_signer(env, auth, old, new),
        AdminAction::SetRequiredSigns(n) => registry::set_required_signs(env, auth, n),
        AdminAction::SetDelay(delay) => timelock::set_delay(env, auth, delay),
    }
}
