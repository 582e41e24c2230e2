//! Files the operator CLI reads and writes: hex key files and the
//! deployment record.

use anyhow::{Context, Result};
use ed25519_dalek::SigningKey;
use rand_core::OsRng;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use unicred_admin_registry::RegistryState;
use unicred_types::Address;

/// Generate a keypair and write `<name>_private.key` / `<name>_public.key`.
///
/// The private file holds the 32-byte secret as hex, the public file holds
/// the address in its text form.
pub fn generate_keypair(output: &Path, name: &str) -> Result<(PathBuf, Address)> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let address = Address::from_public_key(&signing_key.verifying_key());

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let private_path = output.join(format!("{name}_private.key"));
    let public_path = output.join(format!("{name}_public.key"));

    fs::write(&private_path, hex::encode(signing_key.to_bytes()))
        .context("Failed to write private key")?;
    fs::write(&public_path, address.to_string()).context("Failed to write public key")?;

    Ok((private_path, address))
}

pub fn load_signing_key(path: &Path) -> Result<SigningKey> {
    let private_hex = fs::read_to_string(path)
        .with_context(|| format!("Failed to read private key file {}", path.display()))?;
    let private_bytes =
        hex::decode(private_hex.trim()).context("Invalid hex format in private key file")?;

    let key_bytes: [u8; 32] = private_bytes.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "Invalid private key length: expected 32 bytes, got {}",
            private_bytes.len()
        )
    })?;

    Ok(SigningKey::from_bytes(&key_bytes))
}

/// Render the `KEY=value` deployment record.
pub fn render_deployment_info(creator: &Address, state: &RegistryState, data_dir: &Path) -> String {
    let mut info = String::new();
    let _ = writeln!(info, "DATA_DIR={}", data_dir.display());
    let _ = writeln!(info, "CREATOR={creator}");
    if let RegistryState::Active {
        platform_admin,
        college_admin,
    } = state
    {
        let _ = writeln!(info, "PLATFORM_ADMIN={platform_admin}");
        let _ = writeln!(info, "COLLEGE_ADMIN={college_admin}");
    }
    info
}
