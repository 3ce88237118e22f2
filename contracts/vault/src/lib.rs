//! # Custody Vault
//!
//! Holds the assets governed by the timelock multisig and exposes a single
//! owner-gated invocation primitive with a balance-sufficiency guard.
//! Incoming fungible and non-fungible transfers are accepted unconditionally.

#![no_std]
#![allow(deprecated)]
mod vault;

pub use vault::{VaultContract, VaultContractClient, VaultError};
