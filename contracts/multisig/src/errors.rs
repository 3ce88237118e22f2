use soroban_sdk::contracterror;

/// Errors raised by the signer registry, the timelock scheduler and the
/// proposal engine.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MultisigError {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Caller is not a signer, or the operation is reserved to the engine itself
    Unauthorized = 3,
    /// Per-action arrays are empty or differ in length
    ArrayLengthMismatch = 4,
    /// Signer already voted on this proposal
    AlreadySigned = 5,
    /// Operation not valid in the proposal's current status, or a registry
    /// reconfiguration falls outside its bounds
    WrongStatus = 6,
    /// Timelock entry is not queued
    NotQueued = 7,
    /// Timelock entry is not yet due (before its eta)
    ProposalExpired = 8,
    /// Timelock entry is past its grace period
    ProposalStale = 9,
    /// Downstream invocation failed
    CallFailed = 10,
    /// Delay below the minimum, or eta earlier than now + delay
    DelayTooLow = 11,
    /// Delay above the maximum
    DelayTooHigh = 12,
    /// Signer identity rejected (duplicate, unknown, or unchanged)
    InvalidSigner = 13,
    /// Action value or attached value not allowed for this routing
    InvalidAction = 14,
}
