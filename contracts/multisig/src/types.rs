use soroban_sdk::{contracttype, Address, String, Symbol, Val, Vec};

// ─────────────────────────────────────────────────────────────────────────────
// Policy constants
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest signer set the registry accepts.
pub const MIN_SIGNERS: u32 = 4;
/// Largest signer set the registry accepts.
pub const MAX_SIGNERS: u32 = 100;
/// Stored required-signatures value written at initialization.
pub const DEFAULT_REQUIRED_SIGNS: u32 = 3;

/// Signing window in seconds (1 day). A proposal still `Initialized` at
/// `initiated_at + TIME_FOR_SIGNING` reads as `Cancelled`.
pub const TIME_FOR_SIGNING: u64 = 24 * 60 * 60;

/// Timelock delay bounds in seconds (6 hours to 30 days).
pub const MINIMUM_DELAY: u64 = 6 * 60 * 60;
pub const MAXIMUM_DELAY: u64 = 30 * 24 * 60 * 60;

/// Window after `eta` during which a queued entry may still run (14 days).
pub const GRACE_PERIOD: u64 = 14 * 24 * 60 * 60;

/// Function name a self-targeted action must carry to reach the in-process
/// admin dispatcher.
pub const ADMIN_CALL: &str = "admin_call";

// ─────────────────────────────────────────────────────────────────────────────
// Proposals
// ─────────────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProposalStatus {
    /// No proposal stored under this id
    Empty,
    /// Collecting signatures
    Initialized,
    /// Explicitly cancelled, or signing window elapsed
    Cancelled,
    /// Quorum reached; entries scheduled in the timelock
    Queued,
    /// Executed
    Executed,
}

/// A batch of actions awaiting signatures, delay, or execution.
///
/// The four per-action vectors always share one length. A `None` function
/// label is a value-only transfer.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub status: ProposalStatus,
    pub signs: u32,
    pub targets: Vec<Address>,
    pub values: Vec<i128>,
    pub functions: Vec<Option<Symbol>>,
    pub args: Vec<Vec<Val>>,
    pub call_from: Address,
    pub description: String,
    pub initiated_at: u64,
    /// Set once, by the signature that reaches quorum
    pub eta: Option<u64>,
}

/// The action arrays of a proposal, as returned by `get_actions`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalActions {
    pub targets: Vec<Address>,
    pub values: Vec<i128>,
    pub functions: Vec<Option<Symbol>>,
    pub args: Vec<Vec<Val>>,
}

/// Outcome of one action of an executed proposal.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ActionResult {
    pub index: u32,
    pub success: bool,
    /// Return value of the downstream call as a single element; empty on
    /// failure
    pub data: Vec<Val>,
}

/// Registry and scheduler reconfigurations. These reach the multisig only as
/// self-targeted proposal actions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdminAction {
    AddSigner(Address),
    RemoveSigner(Address),
    FlipSigner(Address, Address),
    SetRequiredSigns(u32),
    SetDelay(u64),
}
