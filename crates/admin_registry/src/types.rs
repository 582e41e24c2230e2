//! Types for the admin registry

use serde::{Deserialize, Serialize};
use std::fmt;
use unicred_storage::AdminSlots;
use unicred_types::Address;

/// Lifecycle of the registry. `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistryState {
    Uninitialized,
    Active {
        platform_admin: Address,
        college_admin: Address,
    },
}

impl RegistryState {
    pub fn is_active(&self) -> bool {
        matches!(self, RegistryState::Active { .. })
    }

    pub fn platform_admin(&self) -> Option<Address> {
        match self {
            RegistryState::Active { platform_admin, .. } => Some(*platform_admin),
            RegistryState::Uninitialized => None,
        }
    }

    pub fn college_admin(&self) -> Option<Address> {
        match self {
            RegistryState::Active { college_admin, .. } => Some(*college_admin),
            RegistryState::Uninitialized => None,
        }
    }
}

impl From<Option<AdminSlots>> for RegistryState {
    fn from(slots: Option<AdminSlots>) -> Self {
        match slots {
            Some(AdminSlots {
                platform_admin,
                college_admin,
            }) => RegistryState::Active {
                platform_admin,
                college_admin,
            },
            None => RegistryState::Uninitialized,
        }
    }
}

/// Registry operation names, as exposed to submission clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Initialize,
    UpdateCollegeAdmin,
    GetPlatformAdmin,
    GetCollegeAdmin,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::UpdateCollegeAdmin => "update_college_admin",
            Operation::GetPlatformAdmin => "get_platform_admin",
            Operation::GetCollegeAdmin => "get_college_admin",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
