//! Typed registry calls and the signed envelope used to submit them.
//!
//! The hosting environment authenticates a call by checking an Ed25519
//! signature from `sender` over the call; the verified sender becomes the
//! calling principal handed to the state machine.

use crate::errors::*;
use crate::registry::AdminRegistry;
use crate::types::Operation;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use unicred_storage::RegistryStore;
use unicred_types::Address;

/// Domain separator prepended to every signed call.
pub const CALL_DOMAIN: &[u8] = b"UNICRED_ADMIN_CALL";

/// One of the four registry operations with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RegistryCall {
    Initialize {
        platform_admin: Address,
        college_admin: Address,
    },
    UpdateCollegeAdmin {
        new_admin: Address,
    },
    GetPlatformAdmin,
    GetCollegeAdmin,
}

impl RegistryCall {
    pub fn operation(&self) -> Operation {
        match self {
            RegistryCall::Initialize { .. } => Operation::Initialize,
            RegistryCall::UpdateCollegeAdmin { .. } => Operation::UpdateCollegeAdmin,
            RegistryCall::GetPlatformAdmin => Operation::GetPlatformAdmin,
            RegistryCall::GetCollegeAdmin => Operation::GetCollegeAdmin,
        }
    }
}

/// A call together with the sender's signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCall {
    pub sender: Address,
    pub call: RegistryCall,
    pub signature: Vec<u8>,
}

impl SignedCall {
    /// Sign `call` with `key`; the sender is the key's address.
    pub fn sign(key: &SigningKey, call: RegistryCall) -> Result<Self> {
        let sender = Address::from_public_key(&key.verifying_key());
        let digest = signing_digest(&sender, &call)?;
        let signature = key.sign(&digest);
        Ok(Self {
            sender,
            call,
            signature: signature.to_bytes().to_vec(),
        })
    }

    /// Verify the signature and return the authenticated principal.
    pub fn authenticate(&self) -> Result<Address> {
        if self.signature.len() != Signature::BYTE_SIZE {
            return Err(RegistryError::InvalidSignature);
        }

        let verifying_key = self
            .sender
            .verifying_key()
            .ok_or(RegistryError::InvalidSignature)?;
        let signature =
            Signature::from_slice(&self.signature).map_err(|_| RegistryError::InvalidSignature)?;

        let digest = signing_digest(&self.sender, &self.call)?;
        verifying_key
            .verify(&digest, &signature)
            .map_err(|_| RegistryError::InvalidSignature)?;

        Ok(self.sender)
    }
}

/// SHA-256 over domain, sender and the call's JSON encoding.
fn signing_digest(sender: &Address, call: &RegistryCall) -> Result<[u8; 32]> {
    let mut hasher = Sha256::new();
    hasher.update(CALL_DOMAIN);
    hasher.update(sender.as_bytes());
    hasher.update(serde_json::to_vec(call)?);
    Ok(hasher.finalize().into())
}

impl<S: RegistryStore> AdminRegistry<S> {
    /// Route a call from an already-authenticated principal.
    ///
    /// Reads return `Some(address)`; writes return `None`.
    pub fn dispatch(&self, caller: &Address, call: &RegistryCall) -> Result<Option<Address>> {
        debug!(%caller, operation = %call.operation(), "Dispatching registry call");
        match *call {
            RegistryCall::Initialize {
                platform_admin,
                college_admin,
            } => self
                .initialize(caller, platform_admin, college_admin)
                .map(|_| None),
            RegistryCall::UpdateCollegeAdmin { new_admin } => self
                .update_college_admin(caller, new_admin)
                .map(|_| None),
            RegistryCall::GetPlatformAdmin => self.get_platform_admin().map(Some),
            RegistryCall::GetCollegeAdmin => self.get_college_admin().map(Some),
        }
    }

    /// Authenticate a signed call, then dispatch it.
    pub fn submit(&self, signed: &SignedCall) -> Result<Option<Address>> {
        let caller = signed.authenticate()?;
        self.dispatch(&caller, &signed.call)
    }
}
