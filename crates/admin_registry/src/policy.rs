//! Authorization predicates.
//!
//! Pure functions over the caller and the current state. They never touch
//! storage, so every rule can be checked in isolation and re-evaluated inside
//! the registry's write section against the latest committed state.

use crate::errors::{RegistryError, Result};
use crate::types::{Operation, RegistryState};
use unicred_types::Address;

/// Only the deploying principal may initialize.
pub fn may_initialize(caller: &Address, creator: &Address) -> bool {
    caller == creator
}

/// Only the current platform admin may replace the college admin.
pub fn may_update_college_admin(caller: &Address, state: &RegistryState) -> bool {
    state.platform_admin().is_some_and(|admin| admin == *caller)
}

/// Full precondition for `initialize`.
///
/// The caller check runs first so a non-creator learns nothing about the
/// registry's lifecycle.
pub fn check_initialize(caller: &Address, creator: &Address, state: &RegistryState) -> Result<()> {
    if !may_initialize(caller, creator) {
        return Err(RegistryError::Unauthorized {
            caller: *caller,
            operation: Operation::Initialize,
        });
    }
    if state.is_active() {
        return Err(RegistryError::AlreadyInitialized);
    }
    Ok(())
}

/// Full precondition for `update_college_admin`.
pub fn check_update_college_admin(caller: &Address, state: &RegistryState) -> Result<()> {
    if !state.is_active() {
        return Err(RegistryError::NotInitialized);
    }
    if !may_update_college_admin(caller, state) {
        return Err(RegistryError::Unauthorized {
            caller: *caller,
            operation: Operation::UpdateCollegeAdmin,
        });
    }
    Ok(())
}
