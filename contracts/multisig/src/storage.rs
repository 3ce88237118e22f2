use soroban_sdk::{contracttype, Address, BytesN, Env};

/// Ledgers closed per day at a 5 second close time.
pub const DAY_IN_LEDGERS: u32 = 17_280;
/// Live range given to touched entries. It outlasts the signing window plus
/// the maximum delay plus the grace period.
pub const TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;
pub const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;

/// Storage keys.
///
/// Configuration (`Signers`, `RequiredSigns`, `Delay`, `Vault`,
/// `ProposalCount`) lives in instance storage; the proposal table, vote
/// flags and the timelock queue live in persistent storage.
#[derive(Clone)]
#[contracttype]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum DataKey {
    Signers,
    RequiredSigns,

    Delay,
    Vault,
    Queued(BytesN<32>),

    ProposalCount,
    Proposal(u64),
    Voted(u64, Address),
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
