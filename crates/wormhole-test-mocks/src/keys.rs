//! Standalone secp256k1 helpers.
//!
//! These are pure functions over explicit inputs; nothing here holds a key
//! store. Digests are keccak256 outputs and must be exactly 32 bytes.

use libsecp256k1::{Message, PublicKey, RecoveryId, SecretKey};
use sha3::{Digest, Keccak256};

use crate::error::{Error, Result};

/// A recoverable ECDSA signature in Wormhole's `[r, s, v]` layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Recovery id (0 or 1), not Ethereum's 27/28 offset form.
    pub recovery_id: u8,
}

impl Signature {
    /// Serialize as 65 bytes: `r || s || v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id;
        out
    }

    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self {
            r,
            s,
            recovery_id: bytes[64],
        }
    }

    fn rs(&self) -> [u8; 64] {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        rs
    }
}

fn message(hash: &[u8]) -> Result<Message> {
    let digest: &[u8; 32] = hash
        .try_into()
        .map_err(|_| Error::InvalidDigestLength { len: hash.len() })?;
    Ok(Message::parse(digest))
}

/// Parse a raw 32-byte secp256k1 secret.
pub fn parse_secret_key(bytes: &[u8]) -> Result<SecretKey> {
    let bytes: &[u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::InvalidKeyLength(bytes.len()))?;
    Ok(SecretKey::parse(bytes)?)
}

/// Parse a hex-encoded secret, with or without a `0x` prefix.
pub fn secret_key_from_hex(hex_key: &str) -> Result<SecretKey> {
    let hex_key = hex_key.strip_prefix("0x").unwrap_or(hex_key);
    parse_secret_key(&hex::decode(hex_key)?)
}

/// Derive the public key for a secret key.
pub fn eth_private_to_public(secret_key: &SecretKey) -> PublicKey {
    PublicKey::from_secret_key(secret_key)
}

/// Ethereum address of a public key (last 20 bytes of keccak256(pubkey[1..])).
pub fn eth_address(public_key: &PublicKey) -> [u8; 20] {
    let hash = Keccak256::digest(&public_key.serialize()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Sign a 32-byte hash.
pub fn eth_sign_with_private(secret_key: &SecretKey, hash: &[u8]) -> Result<Signature> {
    let digest: &[u8; 32] = hash
        .try_into()
        .map_err(|_| Error::InvalidDigestLength { len: hash.len() })?;
    Ok(sign_digest(secret_key, digest))
}

/// Sign a digest already known to be 32 bytes.
pub fn sign_digest(secret_key: &SecretKey, digest: &[u8; 32]) -> Signature {
    let (signature, recovery_id) = libsecp256k1::sign(&Message::parse(digest), secret_key);
    let rs = signature.serialize();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&rs[..32]);
    s.copy_from_slice(&rs[32..]);
    Signature {
        r,
        s,
        recovery_id: recovery_id.serialize(),
    }
}

/// Check `signature` over `hash` against `public_key`.
///
/// Only `r` and `s` take part; the recovery id is ignored. Scalars that do
/// not parse as a valid signature verify as `false` rather than erroring.
pub fn eth_validate_sig(signature: &Signature, public_key: &PublicKey, hash: &[u8]) -> Result<bool> {
    let message = message(hash)?;
    let Ok(signature) = libsecp256k1::Signature::parse_standard(&signature.rs()) else {
        return Ok(false);
    };
    Ok(libsecp256k1::verify(&message, &signature, public_key))
}

/// Recover the signer's public key from a signature and the signed hash.
pub fn recover_public_key(signature: &Signature, hash: &[u8]) -> Result<PublicKey> {
    let message = message(hash)?;
    let recovery_id = RecoveryId::parse(signature.recovery_id)?;
    let parsed = libsecp256k1::Signature::parse_standard(&signature.rs())?;
    Ok(libsecp256k1::recover(&message, &parsed, &recovery_id)?)
}
