use alloy::primitives::{FixedBytes, hex};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// Version byte prefixed to an account id before base58 encoding.
const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Length of the double-SHA-256 checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Errors produced when parsing an account address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The string is neither base58 (ripple alphabet) nor 40 hex digits.
    #[error("invalid account encoding")]
    Encoding,
    /// The decoded payload has the wrong length or version byte.
    #[error("invalid account payload")]
    Payload,
    /// The checksum does not match the payload.
    #[error("invalid account checksum")]
    Checksum,
}

/// A 160-bit ledger account identifier.
///
/// Displays as the classic `r...` address. Parses from either a classic
/// address or 40 hexadecimal digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(FixedBytes<20>);

impl AccountId {
    /// Wrap raw account id bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// The raw 20-byte account id.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0.0
    }

    /// Parse a classic base58 address.
    pub fn from_classic(address: &str) -> Result<Self, AddressError> {
        let decoded = bs58::decode(address)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_vec()
            .map_err(|_| AddressError::Encoding)?;

        if decoded.len() != 1 + 20 + CHECKSUM_LEN || decoded[0] != ACCOUNT_ID_VERSION {
            return Err(AddressError::Payload);
        }

        let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
        if checksum != &double_sha256(payload)[..CHECKSUM_LEN] {
            return Err(AddressError::Checksum);
        }

        Ok(Self(FixedBytes::from_slice(&payload[1..])))
    }

    /// Encode as a classic base58 address.
    pub fn to_classic(&self) -> String {
        let mut payload = Vec::with_capacity(1 + 20 + CHECKSUM_LEN);
        payload.push(ACCOUNT_ID_VERSION);
        payload.extend_from_slice(self.0.as_slice());
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        bs58::encode(payload).with_alphabet(bs58::Alphabet::RIPPLE).into_string()
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let once = Sha256::digest(data);
    Sha256::digest(once).into()
}

impl From<[u8; 20]> for AccountId {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 40 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return hex::decode_to_array::<_, 20>(s)
                .map(Self::new)
                .map_err(|_| AddressError::Encoding);
        }
        Self::from_classic(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_classic())
    }
}
