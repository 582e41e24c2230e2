//! Storage backends for the admin registry's two identity slots.
//!
//! The registry persists exactly two values (`platform_admin` and
//! `college_admin`) plus the deployment record naming the creator. Backends
//! must make every write all-or-nothing: both slots land together on
//! initialization and the college slot is replaced alone afterwards.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sled::{Batch, Db, Tree};
use std::path::{Path, PathBuf};
use unicred_types::Address;

const SLOTS_TREE: &str = "admin_registry";
const DEPLOYMENT_TREE: &str = "deployment";

pub const PLATFORM_ADMIN_KEY: &str = "platform_admin";
pub const COLLEGE_ADMIN_KEY: &str = "college_admin";
pub const CREATOR_KEY: &str = "creator";

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("No registry deployed at {}", .path.display())]
    NotDeployed { path: PathBuf },
    #[error("Registry already deployed by {creator}")]
    AlreadyDeployed { creator: Address },
    #[error("Corrupt value under key {key}: expected 32 bytes, found {len}")]
    CorruptSlot { key: &'static str, len: usize },
    #[error("Only one of the two admin slots is set")]
    PartialState,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Both identity slots as persisted after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSlots {
    pub platform_admin: Address,
    pub college_admin: Address,
}

/// Abstract slot storage
pub trait RegistryStore: Send + Sync {
    /// Principal recorded when the registry was deployed.
    fn creator(&self) -> Address;

    /// Load the slots, `None` while the registry is uninitialized.
    fn load(&self) -> Result<Option<AdminSlots>>;

    /// Write both slots in one atomic step.
    fn write_slots(&self, slots: &AdminSlots) -> Result<()>;

    /// Replace the college admin slot, leaving the platform slot untouched.
    fn write_college_admin(&self, college_admin: &Address) -> Result<()>;
}

/// Sled-backed implementation
pub struct SledRegistryStore {
    db: Db,
    slots: Tree,
    creator: Address,
}

impl SledRegistryStore {
    /// Create a fresh registry store at `path`, recording `creator` as the
    /// deploying principal. Fails if the path already holds a deployment.
    pub fn deploy<P: AsRef<Path>>(path: P, creator: Address) -> Result<Self> {
        let db = sled::open(path)?;
        let deployment = db.open_tree(DEPLOYMENT_TREE)?;

        // only the first deployer records a creator
        let recorded = deployment.compare_and_swap(
            CREATOR_KEY,
            None as Option<&[u8]>,
            Some(&creator.as_bytes()[..]),
        )?;
        if let Err(conflict) = recorded {
            let existing = conflict
                .current
                .map(|v| decode_slot(CREATOR_KEY, &v))
                .transpose()?
                .unwrap_or(creator);
            return Err(StorageError::AlreadyDeployed { creator: existing });
        }
        deployment.flush()?;

        tracing::info!(%creator, "Deployed admin registry store");
        let slots = db.open_tree(SLOTS_TREE)?;
        Ok(Self {
            db,
            slots,
            creator,
        })
    }

    /// Reopen a store created earlier with [`SledRegistryStore::deploy`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        let deployment = db.open_tree(DEPLOYMENT_TREE)?;
        let creator = match deployment.get(CREATOR_KEY)? {
            Some(v) => decode_slot(CREATOR_KEY, &v)?,
            None => {
                return Err(StorageError::NotDeployed {
                    path: path.to_path_buf(),
                })
            }
        };
        let slots = db.open_tree(SLOTS_TREE)?;
        tracing::debug!(%creator, path = %path.display(), "Opened admin registry store");
        Ok(Self {
            db,
            slots,
            creator,
        })
    }
}

impl RegistryStore for SledRegistryStore {
    fn creator(&self) -> Address {
        self.creator
    }

    fn load(&self) -> Result<Option<AdminSlots>> {
        let platform = self.slots.get(PLATFORM_ADMIN_KEY)?;
        let college = self.slots.get(COLLEGE_ADMIN_KEY)?;
        match (platform, college) {
            (Some(p), Some(c)) => Ok(Some(AdminSlots {
                platform_admin: decode_slot(PLATFORM_ADMIN_KEY, &p)?,
                college_admin: decode_slot(COLLEGE_ADMIN_KEY, &c)?,
            })),
            (None, None) => Ok(None),
            _ => Err(StorageError::PartialState),
        }
    }

    fn write_slots(&self, slots: &AdminSlots) -> Result<()> {
        let mut batch = Batch::default();
        batch.insert(PLATFORM_ADMIN_KEY, &slots.platform_admin.as_bytes()[..]);
        batch.insert(COLLEGE_ADMIN_KEY, &slots.college_admin.as_bytes()[..]);
        self.slots.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }

    fn write_college_admin(&self, college_admin: &Address) -> Result<()> {
        self.slots
            .insert(COLLEGE_ADMIN_KEY, &college_admin.as_bytes()[..])?;
        self.db.flush()?;
        Ok(())
    }
}

fn decode_slot(key: &'static str, value: &[u8]) -> Result<Address> {
    Address::try_from(value).map_err(|_| StorageError::CorruptSlot {
        key,
        len: value.len(),
    })
}

/// In-memory backend
pub struct MemoryRegistryStore {
    creator: Address,
    slots: RwLock<Option<AdminSlots>>,
}

impl MemoryRegistryStore {
    pub fn new(creator: Address) -> Self {
        Self {
            creator,
            slots: RwLock::new(None),
        }
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn creator(&self) -> Address {
        self.creator
    }

    fn load(&self) -> Result<Option<AdminSlots>> {
        Ok(*self.slots.read())
    }

    fn write_slots(&self, slots: &AdminSlots) -> Result<()> {
        *self.slots.write() = Some(*slots);
        Ok(())
    }

    fn write_college_admin(&self, college_admin: &Address) -> Result<()> {
        match self.slots.write().as_mut() {
            Some(slots) => {
                slots.college_admin = *college_admin;
                Ok(())
            }
            None => Err(StorageError::PartialState),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    #[test]
    fn deploy_then_reopen_keeps_creator_and_slots() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry");

        {
            let store = SledRegistryStore::deploy(&path, addr(1)).unwrap();
            assert_eq!(store.load().unwrap(), None);
            store
                .write_slots(&AdminSlots {
                    platform_admin: addr(2),
                    college_admin: addr(3),
                })
                .unwrap();
        }

        let store = SledRegistryStore::open(&path).unwrap();
        assert_eq!(store.creator(), addr(1));
        assert_eq!(
            store.load().unwrap(),
            Some(AdminSlots {
                platform_admin: addr(2),
                college_admin: addr(3),
            })
        );
    }

    #[test]
    fn second_deploy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry");
        drop(SledRegistryStore::deploy(&path, addr(1)).unwrap());

        let err = SledRegistryStore::deploy(&path, addr(9)).err().unwrap();
        assert!(matches!(err, StorageError::AlreadyDeployed { creator } if creator == addr(1)));
    }

    #[test]
    fn open_without_deployment_fails() {
        let dir = TempDir::new().unwrap();
        let err = SledRegistryStore::open(dir.path().join("empty")).err().unwrap();
        assert!(matches!(err, StorageError::NotDeployed { .. }));
    }

    #[test]
    fn college_write_leaves_platform_slot_alone() {
        let dir = TempDir::new().unwrap();
        let store = SledRegistryStore::deploy(dir.path().join("registry"), addr(1)).unwrap();
        store
            .write_slots(&AdminSlots {
                platform_admin: addr(2),
                college_admin: addr(3),
            })
            .unwrap();
        store.write_college_admin(&addr(4)).unwrap();

        let slots = store.load().unwrap().unwrap();
        assert_eq!(slots.platform_admin, addr(2));
        assert_eq!(slots.college_admin, addr(4));
    }

    #[test]
    fn half_written_state_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = SledRegistryStore::deploy(dir.path().join("registry"), addr(1)).unwrap();
        store.slots.insert(PLATFORM_ADMIN_KEY, &[5u8; 32][..]).unwrap();
        assert!(matches!(store.load(), Err(StorageError::PartialState)));
    }

    #[test]
    fn truncated_slot_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = SledRegistryStore::deploy(dir.path().join("registry"), addr(1)).unwrap();
        store.slots.insert(PLATFORM_ADMIN_KEY, &[5u8; 31][..]).unwrap();
        store.slots.insert(COLLEGE_ADMIN_KEY, &[6u8; 32][..]).unwrap();
        assert!(matches!(
            store.load(),
            Err(StorageError::CorruptSlot {
                key: PLATFORM_ADMIN_KEY,
                len: 31
            })
        ));
    }

    #[test]
    fn memory_store_requires_initial_write_before_college_update() {
        let store = MemoryRegistryStore::new(addr(1));
        assert!(store.write_college_admin(&addr(3)).is_err());
        store
            .write_slots(&AdminSlots {
                platform_admin: addr(2),
                college_admin: addr(3),
            })
            .unwrap();
        store.write_college_admin(&addr(4)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().college_admin, addr(4));
    }
}
