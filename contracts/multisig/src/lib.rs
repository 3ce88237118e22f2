//! # Timelock Multisig
//!
//! A quorum-gated, time-delayed multisignature contract on Soroban.
//!
//! - **Signer registry**: a bounded set of signers and a quorum policy that
//!   never drops below three quarters of the set
//! - **Proposals**: batches of calls that collect signatures within a
//!   one-day window
//! - **Timelock**: the signature that reaches quorum schedules every action
//!   behind a delay; actions run between `eta` and `eta + GRACE_PERIOD`
//! - **Vault routing**: actions created with `call_from` set to the custody
//!   vault run through the vault, which guards its balance
//!
//! The registry and the delay are reconfigured only by executed proposals
//! targeting this contract with `admin_call`.

#![allow(clippy::too_many_arguments)]
#![no_std]

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, String, Symbol, Val, Vec};

mod errors;
mod events;
mod proposal;
mod registry;
mod storage;
mod timelock;
mod types;

#[cfg(test)]
mod tests;

pub use errors::MultisigError;
pub use types::{
    ActionResult, AdminAction, Proposal, ProposalActions, ProposalStatus, GRACE_PERIOD,
    MAXIMUM_DELAY, MAX_SIGNERS, MINIMUM_DELAY, MIN_SIGNERS, TIME_FOR_SIGNING,
};

#[contract]
pub struct MultisigContract;

#[contractimpl]
impl MultisigContract {
    /// Initialize the multisig
    ///
    /// # Arguments
    /// * `signers` - Initial signer set, between 4 and 100 distinct addresses
    /// * `delay` - Timelock delay in seconds
    /// * `vault` - Custody vault whose owner is this contract
    pub fn initialize(
        env: Env,
        signers: Vec<Address>,
        delay: u64,
        vault: Address,
    ) -> Result<(), MultisigError> {
        proposal::initialize(&env, signers, delay, vault)
    }

    /// Create a proposal and record the proposer's signature
    ///
    /// # Arguments
    /// * `proposer` - A signer
    /// * `targets`, `values`, `functions`, `args` - One entry per action; a
    ///   `None` function is a value-only transfer
    /// * `description` - Free text
    /// * `call_from` - The vault address to route actions through the vault;
    ///   any other address invokes targets directly
    ///
    /// # Returns
    /// The new proposal id (ids start at 1)
    pub fn create_and_sign(
        env: Env,
        proposer: Address,
        targets: Vec<Address>,
        values: Vec<i128>,
        functions: Vec<Option<Symbol>>,
        args: Vec<Vec<Val>>,
        description: String,
        call_from: Address,
    ) -> Result<u64, MultisigError> {
        proposal::create_and_sign(
            &env,
            proposer,
            targets,
            values,
            functions,
            args,
            description,
            call_from,
        )
    }

    /// Sign a proposal
    ///
    /// Returns the new signature count. Reaching the required signatures
    /// queues the proposal.
    pub fn sign(env: Env, signer: Address, proposal_id: u64) -> Result<u32, MultisigError> {
        proposal::sign(&env, signer, proposal_id)
    }

    /// Execute a queued proposal
    ///
    /// # Arguments
    /// * `executor` - A signer; also funds `attached`
    /// * `proposal_id` - The proposal
    /// * `allow_partial` - Record failing actions and continue instead of
    ///   reverting the whole proposal
    /// * `attached` - Value pulled into the vault with the first
    ///   vault-routed action
    ///
    /// # Events
    /// - `transaction_executed` per action
    /// - `proposal_executed`
    pub fn execute(
        env: Env,
        executor: Address,
        proposal_id: u64,
        allow_partial: bool,
        attached: i128,
    ) -> Result<Vec<ActionResult>, MultisigError> {
        proposal::execute(&env, executor, proposal_id, allow_partial, attached)
    }

    /// Cancel a proposal that is collecting signatures or queued
    pub fn cancel(env: Env, caller: Address, proposal_id: u64) -> Result<(), MultisigError> {
        proposal::cancel(&env, caller, proposal_id)
    }

    /// Registry and delay changes are only applied from an executed
    /// self-targeted proposal; a direct call is always rejected.
    pub fn admin_call(
        _env: Env,
        _caller: Address,
        _action: AdminAction,
    ) -> Result<(), MultisigError> {
        Err(MultisigError::Unauthorized)
    }

    // ── Proposal views ────────────────────────────────────────────────────────

    /// Status as of the current ledger time; `Empty` for unknown ids.
    pub fn get_status(env: Env, proposal_id: u64) -> ProposalStatus {
        proposal::status(&env, proposal_id)
    }

    pub fn get_actions(env: Env, proposal_id: u64) -> Option<ProposalActions> {
        proposal::actions(&env, proposal_id)
    }

    pub fn proposal(env: Env, proposal_id: u64) -> Option<Proposal> {
        proposal::load(&env, proposal_id)
    }

    pub fn voted_by(env: Env, proposal_id: u64, signer: Address) -> bool {
        proposal::voted(&env, proposal_id, &signer)
    }

    pub fn proposal_count(env: Env) -> u64 {
        proposal::count(&env)
    }

    /// Timelock hash of one action of a queued proposal.
    pub fn entry_hash(env: Env, proposal_id: u64, index: u32) -> Option<BytesN<32>> {
        proposal::entry_hash(&env, proposal_id, index)
    }

    // ── Registry views ────────────────────────────────────────────────────────

    pub fn signers(env: Env) -> Vec<Address> {
        registry::signers(&env)
    }

    pub fn is_signer(env: Env, id: Address) -> bool {
        registry::is_signer(&env, &id)
    }

    /// Effective quorum for the current signer set.
    pub fn required_signs(env: Env) -> u32 {
        registry::required_signs(&env)
    }

    pub fn total_signers(env: Env) -> u32 {
        registry::total_signers(&env)
    }

    // ── Timelock views ────────────────────────────────────────────────────────

    pub fn delay(env: Env) -> Result<u64, MultisigError> {
        timelock::delay(&env)
    }

    pub fn vault(env: Env) -> Result<Address, MultisigError> {
        timelock::vault(&env)
    }

    pub fn queued_transaction(env: Env, hash: BytesN<32>) -> bool {
        timelock::is_queued(&env, &hash)
    }
}
