//! VAA v1 envelope: construction, wire codec and signing digest.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! header: version u8 | guardian_set_index u32 | n u8 | n * (index u8 | r 32 | s 32 | v u8)
//! body:   timestamp u32 | nonce u32 | emitter_chain u16 | emitter_address 32 |
//!         sequence u64 | consistency_level u8 | payload ..
//! ```

use libsecp256k1::PublicKey;
use sha3::{Digest, Keccak256};

use crate::error::{Error, Result};
use crate::keys::{eth_validate_sig, Signature};
use crate::types::{ChainId, UniversalAddress};

pub const VAA_VERSION: u8 = 1;

/// Size of one serialized guardian signature: index + r + s + v.
pub const GUARDIAN_SIGNATURE_LEN: usize = 66;

const HEADER_FIXED_LEN: usize = 6;
const BODY_FIXED_LEN: usize = 51;

/// A signature entry in the VAA header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardianSignature {
    pub guardian_index: u8,
    pub signature: Signature,
}

impl GuardianSignature {
    pub fn to_bytes(&self) -> [u8; GUARDIAN_SIGNATURE_LEN] {
        let mut out = [0u8; GUARDIAN_SIGNATURE_LEN];
        out[0] = self.guardian_index;
        out[1..].copy_from_slice(&self.signature.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; GUARDIAN_SIGNATURE_LEN]) -> Self {
        let mut sig = [0u8; 65];
        sig.copy_from_slice(&bytes[1..]);
        Self {
            guardian_index: bytes[0],
            signature: Signature::from_bytes(&sig),
        }
    }
}

/// A Wormhole VAA, signed or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<GuardianSignature>,
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: ChainId,
    pub emitter_address: UniversalAddress,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

impl Vaa {
    /// Create an unsigned VAA with zeroed metadata.
    pub fn new(
        emitter_chain: ChainId,
        emitter_address: UniversalAddress,
        sequence: u64,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            version: VAA_VERSION,
            guardian_set_index: 0,
            signatures: Vec::new(),
            timestamp: 0,
            nonce: 0,
            emitter_chain,
            emitter_address,
            sequence,
            consistency_level: 0,
            payload,
        }
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_consistency_level(mut self, consistency_level: u8) -> Self {
        self.consistency_level = consistency_level;
        self
    }

    pub fn with_guardian_set_index(mut self, guardian_set_index: u32) -> Self {
        self.guardian_set_index = guardian_set_index;
        self
    }

    /// The signed portion of the VAA.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(BODY_FIXED_LEN + self.payload.len());
        body.extend_from_slice(&self.timestamp.to_be_bytes());
        body.extend_from_slice(&self.nonce.to_be_bytes());
        body.extend_from_slice(&self.emitter_chain.0.to_be_bytes());
        body.extend_from_slice(self.emitter_address.as_bytes());
        body.extend_from_slice(&self.sequence.to_be_bytes());
        body.push(self.consistency_level);
        body.extend_from_slice(&self.payload);
        body
    }

    /// keccak256 of the body.
    pub fn hash(&self) -> [u8; 32] {
        Keccak256::digest(self.body_bytes()).into()
    }

    /// keccak256(keccak256(body)), the digest guardians sign.
    pub fn digest(&self) -> [u8; 32] {
        Keccak256::digest(self.hash()).into()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let count = u8::try_from(self.signatures.len())
            .map_err(|_| Error::TooManySignatures(self.signatures.len()))?;

        let body = self.body_bytes();
        let mut out = Vec::with_capacity(
            HEADER_FIXED_LEN + self.signatures.len() * GUARDIAN_SIGNATURE_LEN + body.len(),
        );
        out.push(self.version);
        out.extend_from_slice(&self.guardian_set_index.to_be_bytes());
        out.push(count);
        for sig in &self.signatures {
            out.extend_from_slice(&sig.to_bytes());
        }
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Decode a VAA with `wormhole_raw_vaas`, copying every field out.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if let Some(&version) = bytes.first() {
            if version != VAA_VERSION {
                return Err(Error::UnsupportedVersion(version));
            }
        }
        let raw = wormhole_raw_vaas::Vaa::parse(bytes).map_err(|_| Error::MalformedVaa {
            len: bytes.len(),
        })?;

        let signatures = raw
            .signatures()
            .into_iter()
            .map(|sig| {
                let rs = sig.rs();
                let mut r = [0u8; 32];
                let mut s = [0u8; 32];
                r.copy_from_slice(&rs[..32]);
                s.copy_from_slice(&rs[32..]);
                GuardianSignature {
                    guardian_index: sig.guardian_index(),
                    signature: Signature {
                        r,
                        s,
                        recovery_id: sig.recovery_id(),
                    },
                }
            })
            .collect();

        let body = raw.body();
        Ok(Self {
            version: VAA_VERSION,
            guardian_set_index: raw.guardian_set_index(),
            signatures,
            timestamp: body.timestamp(),
            nonce: body.nonce(),
            emitter_chain: ChainId(body.emitter_chain()),
            emitter_address: UniversalAddress(body.emitter_address()),
            sequence: body.sequence(),
            consistency_level: body.consistency_level(),
            payload: body.payload().as_ref().to_vec(),
        })
    }

    /// Check every signature entry against `public_keys[guardian_index]`.
    ///
    /// Returns `false` if an entry's index has no key or its signature does
    /// not verify over [`Vaa::digest`]. An unsigned VAA verifies trivially.
    pub fn verify_signatures(&self, public_keys: &[PublicKey]) -> Result<bool> {
        let digest = self.digest();
        for sig in &self.signatures {
            let Some(key) = public_keys.get(sig.guardian_index as usize) else {
                return Ok(false);
            };
            if !eth_validate_sig(&sig.signature, key, &digest)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
