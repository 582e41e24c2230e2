//! Admin registry state machine
//!
//! Owns the two identity slots and serializes every operation behind one
//! lock. Writers commit to the backing store before publishing the new state
//! in memory, so a failed commit leaves both views unchanged.

use crate::errors::*;
use crate::policy;
use crate::types::*;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use unicred_storage::{AdminSlots, RegistryStore};
use unicred_types::Address;

/// Admin Registry
///
/// `Uninitialized` until the creator calls [`AdminRegistry::initialize`],
/// `Active` forever after.
pub struct AdminRegistry<S: RegistryStore> {
    store: S,
    creator: Address,
    state: Mutex<RegistryState>,
}

impl<S: RegistryStore> AdminRegistry<S> {
    /// Load a registry from its backing store.
    pub fn new(store: S) -> Result<Self> {
        let state = RegistryState::from(store.load()?);
        let creator = store.creator();
        debug!(%creator, active = state.is_active(), "Loaded admin registry");
        Ok(Self {
            store,
            creator,
            state: Mutex::new(state),
        })
    }

    /// Principal that deployed this registry.
    pub fn creator(&self) -> Address {
        self.creator
    }

    /// Set both admin identities. Creator only, and only once.
    pub fn initialize(
        &self,
        caller: &Address,
        platform_admin: Address,
        college_admin: Address,
    ) -> Result<()> {
        let mut state = self.state.lock();

        if let Err(err) = policy::check_initialize(caller, &self.creator, &state) {
            warn!(%caller, error = %err, "Rejected initialize");
            return Err(err);
        }

        self.store.write_slots(&AdminSlots {
            platform_admin,
            college_admin,
        })?;
        *state = RegistryState::Active {
            platform_admin,
            college_admin,
        };

        info!(%platform_admin, %college_admin, "Admin registry initialized");
        Ok(())
    }

    /// Replace the college admin. Platform admin only.
    pub fn update_college_admin(&self, caller: &Address, new_admin: Address) -> Result<()> {
        let mut state = self.state.lock();

        if let Err(err) = policy::check_update_college_admin(caller, &state) {
            warn!(%caller, error = %err, "Rejected update_college_admin");
            return Err(err);
        }

        let RegistryState::Active {
            platform_admin,
            college_admin: previous,
        } = *state
        else {
            return Err(RegistryError::NotInitialized);
        };

        self.store.write_college_admin(&new_admin)?;
        *state = RegistryState::Active {
            platform_admin,
            college_admin: new_admin,
        };

        info!(%previous, college_admin = %new_admin, "College admin updated");
        Ok(())
    }

    pub fn get_platform_admin(&self) -> Result<Address> {
        self.state
            .lock()
            .platform_admin()
            .ok_or(RegistryError::NotInitialized)
    }

    pub fn get_college_admin(&self) -> Result<Address> {
        self.state
            .lock()
            .college_admin()
            .ok_or(RegistryError::NotInitialized)
    }

    /// Both slots in one consistent read.
    pub fn snapshot(&self) -> RegistryState {
        *self.state.lock()
    }

    pub fn is_platform_admin(&self, identity: &Address) -> bool {
        self.snapshot().platform_admin() == Some(*identity)
    }

    pub fn is_college_admin(&self, identity: &Address) -> bool {
        self.snapshot().college_admin() == Some(*identity)
    }

    /// Slots as currently committed in the backing store.
    pub fn persisted_slots(&self) -> Result<Option<AdminSlots>> {
        // serialized with writers
        let _state = self.state.lock();
        Ok(self.store.load()?)
    }
}

impl<S: RegistryStore> std::fmt::Debug for AdminRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRegistry")
            .field("creator", &self.creator)
            .field("state", &*self.state.lock())
            .finish()
    }
}
