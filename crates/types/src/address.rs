use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing a UniCred address string.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 'u'")]
    InvalidPrefix,
    #[error("address must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("address payload must be exactly 32 bytes")]
    InvalidPayloadLength,
}

/// Number of raw bytes contained in an address.
pub const ADDRESS_BYTES: usize = 32;
/// Expected string length of an encoded address (prefix + 64 hex chars).
pub const ADDRESS_STRING_LENGTH: usize = 1 + ADDRESS_BYTES * 2;

const ADDRESS_PREFIX: char = 'u';

/// A 32-byte principal identity (an Ed25519 public key).
///
/// Serialised as its text form so JSON payloads and deployment files stay
/// human readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn from_public_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Reconstruct the Ed25519 verifying key this address names.
    pub fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ADDRESS_PREFIX}{}", hex::encode(self.0))
    }
}

/// Parses the text form `u<64 lowercase or uppercase hex chars>`.
/// Surrounding whitespace is ignored.
impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let payload = s
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or(AddressError::InvalidPrefix)?;
        if s.len() != ADDRESS_STRING_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_STRING_LENGTH,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(payload, &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(value: [u8; ADDRESS_BYTES]) -> Self {
        Address(value)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; ADDRESS_BYTES] = value
            .try_into()
            .map_err(|_| AddressError::InvalidPayloadLength)?;
        Ok(Address(bytes))
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn display_and_parse_agree() {
        let address = Address::new([0xABu8; ADDRESS_BYTES]);
        let encoded = address.to_string();
        assert!(encoded.starts_with('u'));
        assert_eq!(encoded.len(), ADDRESS_STRING_LENGTH);
        assert_eq!(encoded.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn invalid_prefix_rejected() {
        let bad = "x".to_string() + &"00".repeat(ADDRESS_BYTES);
        let err = bad.parse::<Address>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidPrefix));
    }

    #[test]
    fn invalid_length_rejected() {
        let bad = "u".to_string() + &"00".repeat(ADDRESS_BYTES - 1);
        let err = bad.parse::<Address>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidLength { .. }));
    }

    #[test]
    fn invalid_hex_rejected() {
        let bad = format!("u{}", "gg".repeat(ADDRESS_BYTES));
        let err = bad.parse::<Address>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidHex(_)));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let address = Address::new([0x3Cu8; ADDRESS_BYTES]);
        let padded = format!("  {address}\n");
        assert_eq!(padded.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn raw_slices_must_be_32_bytes() {
        assert!(Address::try_from(&[1u8; 31][..]).is_err());
        assert_eq!(
            Address::try_from(&[1u8; 32][..]).unwrap(),
            Address::new([1u8; 32])
        );
    }

    #[test]
    fn public_key_addresses_resolve_back_to_the_key() {
        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        let address = Address::from_public_key(&signing_key.verifying_key());
        assert_eq!(address.verifying_key(), Some(signing_key.verifying_key()));
    }

    #[test]
    fn json_uses_text_form() {
        let address = Address::new([7u8; ADDRESS_BYTES]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<Address>("\"not-an-address\"").is_err());
    }
}
