//! UniCred Admin Registry
//!
//! Holds the two administrative identities of a UniCred deployment:
//! the platform admin, fixed once at initialization, and the college admin,
//! which only the platform admin may reassign. Anyone may read both.
//!
//! Only the principal that deployed the registry may initialize it, and only
//! once. Every operation runs to completion under a single lock, so each
//! authorization check sees the latest committed state.

pub mod call;
pub mod errors;
pub mod policy;
pub mod registry;
pub mod types;

pub use call::{RegistryCall, SignedCall, CALL_DOMAIN};
pub use errors::*;
pub use registry::AdminRegistry;
pub use types::*;

pub use unicred_storage::{AdminSlots, MemoryRegistryStore, RegistryStore, SledRegistryStore};
pub use unicred_types::Address;
