//! Signer registry: the authorized identity set and the quorum policy.
//!
//! The set always holds between [`MIN_SIGNERS`] and [`MAX_SIGNERS`] distinct
//! identities. Mutations take a [`SelfCall`], so they are reachable only
//! through an executed self-targeted proposal.
use soroban_sdk::{log, Address, Env, Vec};

use crate::errors::MultisigError;
use crate::events::{
    emit_required_signs_changed, emit_signer_changed, RequiredSignsChangedEvent,
    SignerChangedEvent,
};
use crate::proposal::SelfCall;
use crate::storage::DataKey;
use crate::types::{DEFAULT_REQUIRED_SIGNS, MAX_SIGNERS, MIN_SIGNERS};

pub fn init(env: &Env, signers: Vec<Address>) -> Result<(), MultisigError> {
    let total = signers.len();
    if !(MIN_SIGNERS..=MAX_SIGNERS).contains(&total) {
        return Err(MultisigError::WrongStatus);
    }

    let mut seen: Vec<Address> = Vec::new(env);
    for signer in signers.iter() {
        if seen.contains(&signer) {
            return Err(MultisigError::InvalidSigner);
        }
        seen.push_back(signer);
    }

    env.storage().instance().set(&DataKey::Signers, &signers);
    env.storage()
        .instance()
        .set(&DataKey::RequiredSigns, &DEFAULT_REQUIRED_SIGNS);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────────────────────────

pub fn signers(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Signers)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn total_signers(env: &Env) -> u32 {
    signers(env).len()
}

pub fn is_signer(env: &Env, id: &Address) -> bool {
    signers(env).contains(id)
}

fn stored_required_signs(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RequiredSigns)
        .unwrap_or(DEFAULT_REQUIRED_SIGNS)
}

/// Effective quorum for `total` signers given the stored value: never below
/// three quarters of the set (rounded down), unless the stored value already
/// exceeds the set size.
pub fn quorum(stored: u32, total: u32) -> u32 {
    if stored > total {
        return stored;
    }
    stored.max(total * 3 / 4)
}

pub fn required_signs(env: &Env) -> u32 {
    quorum(stored_required_signs(env), total_signers(env))
}

/// Authenticates `id` and checks it belongs to the signer set.
pub fn require_signer(env: &Env, id: &Address) -> Result<(), MultisigError> {
    id.require_auth();
    if !is_signer(env, id) {
        return Err(MultisigError::Unauthorized);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────────────────────────

pub fn add_signer(env: &Env, _auth: &SelfCall, id: Address) -> Result<(), MultisigError> {
    let mut signers = signers(env);
    if signers.contains(&id) {
        return Err(MultisigError::InvalidSigner);
    }
    if signers.len() >= MAX_SIGNERS {
        return Err(MultisigError::WrongStatus);
    }

    signers.push_back(id.clone());
    env.storage().instance().set(&DataKey::Signers, &signers);

    log!(env, "registry add signer={} total={}", id, signers.len());
    emit_signer_changed(
        env,
        SignerChangedEvent {
            prior: None,
            current: Some(id),
        },
    );
    Ok(())
}

pub fn remove_signer(env: &Env, _auth: &SelfCall, id: Address) -> Result<(), MultisigError> {
    let mut signers = signers(env);
    let index = signers
        .first_index_of(&id)
        .ok_or(MultisigError::InvalidSigner)?;
    if signers.len() <= MIN_SIGNERS {
        return Err(MultisigError::WrongStatus);
    }

    signers.remove(index);
    env.storage().instance().set(&DataKey::Signers, &signers);

    log!(env, "registry remove signer={} total={}", id, signers.len());
    emit_signer_changed(
        env,
        SignerChangedEvent {
            prior: Some(id),
            current: None,
        },
    );
    Ok(())
}

/// Replaces `old` with `new` in place; the set size is unchanged.
pub fn flip_signer(
    env: &Env,
    _auth: &SelfCall,
    old: Address,
    new: Address,
) -> Result<(), MultisigError> {
    let mut signers = signers(env);
    let index = signers
        .first_index_of(&old)
        .ok_or(MultisigError::InvalidSigner)?;
    if old == new || signers.contains(&new) {
        return Err(MultisigError::InvalidSigner);
    }

    signers.set(index, new.clone());
    env.storage().instance().set(&DataKey::Signers, &signers);

    log!(env, "registry flip old={} new={}", old, new);
    emit_signer_changed(
        env,
        SignerChangedEvent {
            prior: Some(old),
            current: Some(new),
        },
    );
    Ok(())
}

/// Stores a new required-signatures value. It must lie between three
/// quarters of the current set (rounded down) and the set size.
pub fn set_required_signs(env: &Env, _auth: &SelfCall, n: u32) -> Result<(), MultisigError> {
    let total = total_signers(env);
    if n > total || n < total * 3 / 4 {
        return Err(MultisigError::WrongStatus);
    }

    let prior = stored_required_signs(env);
    env.storage().instance().set(&DataKey::RequiredSigns, &n);

    log!(env, "registry required signs {} -> {}", prior, n);
    emit_required_signs_changed(env, RequiredSignsChangedEvent { prior, current: n });
    Ok(())
}
