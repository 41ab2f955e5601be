use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

use super::SigningError;

pub type Address = [u8; 20];

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Parse a 20-byte hex address; checksum casing is not enforced.
pub fn parse_address(s: &str) -> Result<Address, SigningError> {
    let bytes = hex::decode(strip_hex_prefix(s)).map_err(|_| SigningError::InvalidAddress(s.to_owned()))?;
    Address::try_from(bytes.as_slice()).map_err(|_| SigningError::InvalidAddress(s.to_owned()))
}

/// EIP-55 mixed-case rendering.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

/// secp256k1 key pair plus its derived address.
pub struct EvmAccount {
    key: SigningKey,
    address: Address,
}

impl EvmAccount {
    pub fn from_hex(private_key: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(strip_hex_prefix(private_key))
            .map_err(|_| SigningError::InvalidKey("not hex".into()))?;
        if bytes.len() != 32 {
            return Err(SigningError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| SigningError::InvalidKey("scalar out of range".into()))?;
        let address = address_of(key.verifying_key());
        Ok(Self { key, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn checksum_address(&self) -> String {
        to_checksum(&self.address)
    }

    /// 65-byte `r || s || v` with `v = 27 + recovery id`.
    pub fn sign_hash(&self, digest: &[u8; 32]) -> Result<[u8; 65], SigningError> {
        let (signature, recid) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| SigningError::Signature(e.to_string()))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recid.to_byte();
        Ok(out)
    }
}

// never print the key
impl fmt::Debug for EvmAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmAccount").field("address", &self.checksum_address()).finish()
    }
}
