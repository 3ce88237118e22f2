//! Structured events for every state change of the multisig.
//!
//! Each event is its own `#[contractevent]` struct; the snake_case struct
//! name becomes the leading topic and the fields form the data map. The
//! `emit_*` helpers give each action a single publish site.
use soroban_sdk::{contractevent, Address, BytesN, Env};

// ─────────────────────────────────────────────────────────────────────────────
// Signer registry
// ─────────────────────────────────────────────────────────────────────────────

/// Emitted when the signer set changes.
///
/// # Fields
/// * `prior` – The identity leaving the set; `None` for a pure addition.
/// * `current` – The identity entering the set; `None` for a pure removal.
#[contractevent]
#[derive(Clone, Debug)]
pub struct SignerChangedEvent {
    pub prior: Option<Address>,
    pub current: Option<Address>,
}

/// Emitted when the stored required-signatures value changes.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RequiredSignsChangedEvent {
    pub prior: u32,
    pub current: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Timelock scheduler
// ─────────────────────────────────────────────────────────────────────────────

#[contractevent]
#[derive(Clone, Debug)]
pub struct DelayChangedEvent {
    pub prior: u64,
    pub current: u64,
}

/// Emitted when an entry is scheduled.
///
/// # Fields
/// * `hash` – Content hash identifying the entry.
/// * `proposal_id` / `index` – The proposal action the entry was built from.
/// * `eta` – Earliest execution time.
#[contractevent]
#[derive(Clone, Debug)]
pub struct TransactionQueuedEvent {
    pub hash: BytesN<32>,
    pub proposal_id: u64,
    pub index: u32,
    pub target: Address,
    pub value: i128,
    pub eta: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct TransactionCancelledEvent {
    pub hash: BytesN<32>,
    pub proposal_id: u64,
    pub index: u32,
}

/// Emitted after an entry is consumed, whether or not the downstream call
/// succeeded.
#[contractevent]
#[derive(Clone, Debug)]
pub struct TransactionExecutedEvent {
    pub hash: BytesN<32>,
    pub proposal_id: u64,
    pub index: u32,
    pub target: Address,
    pub value: i128,
    pub success: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Proposal engine
// ─────────────────────────────────────────────────────────────────────────────

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalCreatedEvent {
    pub proposal_id: u64,
    pub proposer: Address,
    pub actions: u32,
    pub call_from: Address,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalSignedEvent {
    pub proposal_id: u64,
    pub signer: Address,
    pub signs: u32,
}

/// Emitted by the signature that reaches quorum.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalQueuedEvent {
    pub proposal_id: u64,
    pub eta: u64,
}

/// # Fields
/// * `succeeded` / `failed` – Action outcomes; `failed` is non-zero only for
///   partial executions.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalExecutedEvent {
    pub proposal_id: u64,
    pub executor: Address,
    pub succeeded: u32,
    pub failed: u32,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalCancelledEvent {
    pub proposal_id: u64,
    pub caller: Address,
    pub timestamp: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emit helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn emit_signer_changed(e: &Env, event: SignerChangedEvent) {
    event.publish(e);
}

pub fn emit_required_signs_changed(e: &Env, event: RequiredSignsChangedEvent) {
    event.publish(e);
}

pub fn emit_delay_changed(e: &Env, event: DelayChangedEvent) {
    event.publish(e);
}

pub fn emit_transaction_queued(e: &Env, event: TransactionQueuedEvent) {
    event.publish(e);
}

pub fn emit_transaction_cancelled(e: &Env, event: TransactionCancelledEvent) {
    event.publish(e);
}

pub fn emit_transaction_executed(e: &Env, event: TransactionExecutedEvent) {
    event.publish(e);
}

pub fn emit_proposal_created(e: &Env, event: ProposalCreatedEvent) {
    event.publish(e);
}

pub fn emit_proposal_signed(e: &Env, event: ProposalSignedEvent) {
    event.publish(e);
}

pub fn emit_proposal_queued(e: &Env, event: ProposalQueuedEvent) {
    event.publish(e);
}

pub fn emit_proposal_executed(e: &Env, event: ProposalExecutedEvent) {
    event.publish(e);
}

pub fn emit_proposal_cancelled(e: &Env, event: ProposalCancelledEvent) {
    event.publish(e);
}
