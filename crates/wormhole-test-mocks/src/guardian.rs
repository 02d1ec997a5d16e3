//! Mock guardian set: positional guardian keys and VAA signing.

use libsecp256k1::{PublicKey, SecretKey};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::keys::{
    eth_address, eth_private_to_public, parse_secret_key, secret_key_from_hex, sign_digest,
    Signature,
};
use crate::vaa::{GuardianSignature, Vaa, GUARDIAN_SIGNATURE_LEN};

/// Well-known devnet guardian secret key (from Wormhole test fixtures).
pub const DEFAULT_GUARDIAN_SECRET_KEY: [u8; 32] = [
    0xcf, 0xb1, 0x23, 0x03, 0xa1, 0x9c, 0xde, 0x58, 0x0b, 0xb4, 0xdd, 0x77, 0x16, 0x39, 0xb0, 0xd2,
    0x6b, 0xc6, 0x83, 0x53, 0x64, 0x55, 0x71, 0xa8, 0xcf, 0xf5, 0x16, 0xab, 0x2e, 0xe1, 0x13, 0xa0,
];

const MAX_GUARDIANS: usize = u8::MAX as usize + 1;

/// How [`MockGuardians::add_signatures`] tags the signature entries it appends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignerIndexing {
    /// Tag with the signer's position among the selected guardians (0, 1, ..).
    ///
    /// Requesting guardians `[2, 5]` yields entries tagged `0` and `1`. This
    /// matches the behaviour existing fixtures were recorded against; verifiers
    /// that look keys up by index must be given the selected keys only.
    #[default]
    Compact,
    /// Tag with the guardian's index in the set.
    Roster,
}

/// A single guardian with signing capabilities.
#[derive(Clone)]
pub struct Guardian {
    secret_key: SecretKey,
    /// The guardian's public key.
    pub public_key: PublicKey,
    /// The guardian's Ethereum address (last 20 bytes of keccak256(pubkey)).
    pub eth_address: [u8; 20],
    /// Position of the guardian within its set.
    pub index: u8,
}

impl Guardian {
    /// Create a guardian from a secret key and its index within the set.
    pub fn new(secret_key: SecretKey, index: u8) -> Self {
        let public_key = eth_private_to_public(&secret_key);
        Self {
            secret_key,
            eth_address: eth_address(&public_key),
            public_key,
            index,
        }
    }

    /// Create a guardian from a hex-encoded secret key.
    pub fn from_hex(hex_key: &str, index: u8) -> Result<Self> {
        Ok(Self::new(secret_key_from_hex(hex_key)?, index))
    }

    /// The guardian's secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Sign a 32-byte digest.
    pub fn sign(&self, digest: &[u8; 32]) -> Signature {
        sign_digest(&self.secret_key, digest)
    }

    /// Sign a digest and return `[index || r || s || v]`.
    pub fn sign_indexed(&self, digest: &[u8; 32]) -> [u8; GUARDIAN_SIGNATURE_LEN] {
        GuardianSignature {
            guardian_index: self.index,
            signature: self.sign(digest),
        }
        .to_bytes()
    }
}

impl std::fmt::Debug for Guardian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guardian")
            .field("index", &self.index)
            .field("eth_address", &hex::encode(self.eth_address))
            .finish_non_exhaustive()
    }
}

/// A guardian set whose indices follow key order.
#[derive(Clone, Debug)]
pub struct MockGuardians {
    set_index: u32,
    guardians: Vec<Guardian>,
    indexing: SignerIndexing,
}

impl MockGuardians {
    /// Build a set from raw secret keys; guardian `i` holds `keys[i]`.
    ///
    /// Keys are not deduplicated.
    pub fn new<I>(set_index: u32, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = [u8; 32]>,
    {
        let secrets = keys
            .into_iter()
            .map(|key| parse_secret_key(&key))
            .collect::<Result<Vec<_>>>()?;
        Self::from_secret_keys(set_index, secrets)
    }

    /// Build a set from hex-encoded secret keys (`0x` prefix optional).
    pub fn from_hex_keys(set_index: u32, keys: &[&str]) -> Result<Self> {
        let secrets = keys
            .iter()
            .map(|key| secret_key_from_hex(key))
            .collect::<Result<Vec<_>>>()?;
        Self::from_secret_keys(set_index, secrets)
    }

    /// Build a set from parsed secret keys; guardian `i` holds `secrets[i]`.
    pub fn from_secret_keys(set_index: u32, secrets: Vec<SecretKey>) -> Result<Self> {
        if secrets.len() > MAX_GUARDIANS {
            return Err(Error::TooManyGuardians(secrets.len()));
        }
        let guardians = secrets
            .into_iter()
            .enumerate()
            .map(|(i, secret)| Guardian::new(secret, i as u8))
            .collect();
        Ok(Self {
            set_index,
            guardians,
            indexing: SignerIndexing::default(),
        })
    }

    /// Generate `count` guardians deterministically from a seed.
    ///
    /// Uses keccak256(seed || index) as the secret key for each guardian.
    pub fn generate(set_index: u32, count: usize, seed: u64) -> Result<Self> {
        let secrets = (0..count)
            .map(|i| {
                let mut input = [0u8; 40];
                input[..8].copy_from_slice(&seed.to_le_bytes());
                input[8..16].copy_from_slice(&(i as u64).to_le_bytes());
                let secret: [u8; 32] = Keccak256::digest(input).into();
                parse_secret_key(&secret)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_secret_keys(set_index, secrets)
    }

    /// Single devnet guardian at set index 0.
    pub fn devnet() -> Self {
        let secret = SecretKey::parse(&DEFAULT_GUARDIAN_SECRET_KEY).expect("Invalid secret key");
        Self {
            set_index: 0,
            guardians: vec![Guardian::new(secret, 0)],
            indexing: SignerIndexing::default(),
        }
    }

    /// Choose how `add_signatures` tags signature entries.
    pub fn with_signer_indexing(mut self, indexing: SignerIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// The guardian set index (roster version).
    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    /// The active signature tagging mode.
    pub fn signer_indexing(&self) -> SignerIndexing {
        self.indexing
    }

    /// Public keys of all guardians, in index order.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.guardians
            .iter()
            .map(|g| eth_private_to_public(&g.secret_key))
            .collect()
    }

    /// Get the Ethereum addresses of all guardians.
    pub fn eth_addresses(&self) -> Vec<[u8; 20]> {
        self.guardians.iter().map(|g| g.eth_address).collect()
    }

    /// Decode `vaa_bytes` and append signatures from the guardians in
    /// `guardian_indices`.
    ///
    /// Guardians sign in set order regardless of the order of
    /// `guardian_indices`; duplicates are ignored. Entries are tagged per
    /// [`SignerIndexing`]. Existing signatures are kept.
    pub fn add_signatures(&self, vaa_bytes: &[u8], guardian_indices: &[u8]) -> Result<Vaa> {
        if guardian_indices.is_empty() {
            return Err(Error::EmptySignerSelection);
        }

        let mut vaa = Vaa::deserialize(vaa_bytes)?;

        if let Some(&missing) = guardian_indices
            .iter()
            .find(|&&i| i as usize >= self.guardians.len())
        {
            return Err(Error::GuardianNotFound(missing));
        }

        let signers: Vec<&Guardian> = self
            .guardians
            .iter()
            .filter(|g| guardian_indices.contains(&g.index))
            .collect();

        let digest = vaa.digest();
        for (position, signer) in signers.iter().enumerate() {
            let guardian_index = match self.indexing {
                SignerIndexing::Compact => position as u8,
                SignerIndexing::Roster => signer.index,
            };
            vaa.signatures.push(GuardianSignature {
                guardian_index,
                signature: signer.sign(&digest),
            });
        }

        debug!(
            set_index = self.set_index,
            requested = ?guardian_indices,
            signed = signers.len(),
            indexing = ?self.indexing,
            digest = %hex::encode(digest),
            "added guardian signatures"
        );

        Ok(vaa)
    }

    /// Sign an arbitrary digest with specific guardians (by index).
    ///
    /// Entries are always tagged with the set index, in the order requested.
    pub fn sign_digest_with(
        &self,
        digest: &[u8; 32],
        indices: &[u8],
    ) -> Result<Vec<[u8; GUARDIAN_SIGNATURE_LEN]>> {
        indices
            .iter()
            .map(|&i| {
                self.get(i as usize)
                    .map(|g| g.sign_indexed(digest))
                    .ok_or(Error::GuardianNotFound(i))
            })
            .collect()
    }

    /// Get the number of guardians in the set.
    pub fn len(&self) -> usize {
        self.guardians.len()
    }

    /// Check if the guardian set is empty.
    pub fn is_empty(&self) -> bool {
        self.guardians.is_empty()
    }

    /// Get a guardian by index.
    pub fn get(&self, index: usize) -> Option<&Guardian> {
        self.guardians.get(index)
    }

    /// Iterate over guardians.
    pub fn iter(&self) -> impl Iterator<Item = &Guardian> {
        self.guardians.iter()
    }
}

impl Default for MockGuardians {
    fn default() -> Self {
        Self::devnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::eth_validate_sig;
    use crate::types::{ChainId, UniversalAddress};
    use tracing_test::traced_test;

    fn unsigned_vaa() -> Vec<u8> {
        Vaa::new(ChainId::ETHEREUM, UniversalAddress([0x11; 32]), 6, vec![0x01, 0x02])
            .with_nonce(7)
            .with_consistency_level(1)
            .serialize()
            .unwrap()
    }

    #[test]
    fn test_devnet_guardian_eth_address() {
        let guardians = MockGuardians::devnet();
        assert_eq!(guardians.len(), 1);
        // Well-known devnet guardian address
        assert_eq!(
            hex::encode(guardians.eth_addresses()[0]),
            "befa429d57cd18b7f8a4d91a2da9ab4af05d0fbe"
        );
    }

    #[test]
    fn test_positional_indices() {
        let guardians = MockGuardians::new(3, [[1u8; 32], [2u8; 32], [3u8; 32]]).unwrap();

        assert_eq!(guardians.set_index(), 3);
        for (i, g) in guardians.iter().enumerate() {
            assert_eq!(g.index, i as u8);
        }
    }

    #[test]
    fn test_keys_are_not_deduplicated() {
        let guardians = MockGuardians::new(0, [[9u8; 32], [9u8; 32]]).unwrap();
        assert_eq!(guardians.len(), 2);
        assert_eq!(guardians.public_keys()[0], guardians.public_keys()[1]);
    }

    #[test]
    fn test_public_keys_in_order() {
        let guardians = MockGuardians::generate(0, 4, 1).unwrap();
        let keys = guardians.public_keys();

        assert_eq!(keys.len(), 4);
        for (key, g) in keys.iter().zip(guardians.iter()) {
            assert_eq!(*key, g.public_key);
        }
        // Pure: a second call gives the same result
        assert_eq!(keys, guardians.public_keys());
    }

    #[test]
    fn test_guardian_set_generate() {
        let set = MockGuardians::generate(0, 13, 12345).unwrap();
        assert_eq!(set.len(), 13);

        // All addresses should be unique
        let addrs = set.eth_addresses();
        for i in 0..addrs.len() {
            for j in (i + 1)..addrs.len() {
                assert_ne!(addrs[i], addrs[j]);
            }
        }

        // Same seed, same keys
        let again = MockGuardians::generate(0, 13, 12345).unwrap();
        assert_eq!(addrs, again.eth_addresses());
    }

    #[test]
    fn test_too_many_guardians() {
        assert!(MockGuardians::generate(0, 256, 7).is_ok());
        assert!(matches!(
            MockGuardians::generate(0, 257, 7),
            Err(Error::TooManyGuardians(257))
        ));
    }

    #[test]
    fn test_from_hex_keys() {
        let devnet = hex::encode(DEFAULT_GUARDIAN_SECRET_KEY);
        let guardians = MockGuardians::from_hex_keys(0, &[&devnet]).unwrap();
        assert_eq!(
            guardians.eth_addresses(),
            MockGuardians::devnet().eth_addresses()
        );

        let single = Guardian::from_hex(&format!("0x{devnet}"), 0).unwrap();
        assert_eq!(single.eth_address, guardians.eth_addresses()[0]);
        assert_eq!(single.secret_key().serialize(), DEFAULT_GUARDIAN_SECRET_KEY);

        assert!(matches!(
            MockGuardians::from_hex_keys(0, &["nothex"]),
            Err(Error::Hex(_))
        ));
    }

    #[traced_test]
    #[test]
    fn test_add_signatures_all() {
        let guardians = MockGuardians::generate(1, 2, 42).unwrap();
        let vaa = guardians.add_signatures(&unsigned_vaa(), &[0, 1]).unwrap();

        assert_eq!(vaa.signatures.len(), 2);
        let keys = guardians.public_keys();
        let digest = vaa.digest();
        for (sig, key) in vaa.signatures.iter().zip(&keys) {
            assert!(eth_validate_sig(&sig.signature, key, &digest).unwrap());
        }
        assert!(logs_contain("added guardian signatures"));
    }

    #[test]
    fn test_add_signatures_passes_fields_through() {
        let guardians = MockGuardians::generate(0, 2, 42).unwrap();
        let bytes = unsigned_vaa();
        let before = Vaa::deserialize(&bytes).unwrap();

        let after = guardians.add_signatures(&bytes, &[1]).unwrap();
        assert_eq!(after.guardian_set_index, before.guardian_set_index);
        assert_eq!(after.body_bytes(), before.body_bytes());
        assert_eq!(after.digest(), before.digest());
    }

    #[test]
    fn test_add_signatures_compact_indices() {
        let guardians = MockGuardians::generate(0, 6, 999).unwrap();
        let vaa = guardians.add_signatures(&unsigned_vaa(), &[5, 2]).unwrap();

        // Tagged by position among the selected signers, not by set index
        let tags: Vec<u8> = vaa.signatures.iter().map(|s| s.guardian_index).collect();
        assert_eq!(tags, vec![0, 1]);

        // Signers are taken in set order: entry 0 is guardian 2, entry 1 is guardian 5
        let digest = vaa.digest();
        let keys = guardians.public_keys();
        assert!(eth_validate_sig(&vaa.signatures[0].signature, &keys[2], &digest).unwrap());
        assert!(eth_validate_sig(&vaa.signatures[1].signature, &keys[5], &digest).unwrap());
    }

    #[test]
    fn test_add_signatures_roster_indices() {
        let guardians = MockGuardians::generate(0, 6, 999)
            .unwrap()
            .with_signer_indexing(SignerIndexing::Roster);
        let vaa = guardians.add_signatures(&unsigned_vaa(), &[5, 2, 2]).unwrap();

        let tags: Vec<u8> = vaa.signatures.iter().map(|s| s.guardian_index).collect();
        assert_eq!(tags, vec![2, 5]);
        assert!(vaa.verify_signatures(&guardians.public_keys()).unwrap());
    }

    #[test]
    fn test_add_signatures_appends() {
        let guardians = MockGuardians::generate(0, 3, 5)
            .unwrap()
            .with_signer_indexing(SignerIndexing::Roster);
        let first = guardians.add_signatures(&unsigned_vaa(), &[0]).unwrap();
        let second = guardians
            .add_signatures(&first.serialize().unwrap(), &[1, 2])
            .unwrap();

        assert_eq!(second.signatures.len(), 3);
        assert_eq!(second.signatures[0], first.signatures[0]);
        assert!(second.verify_signatures(&guardians.public_keys()).unwrap());
    }

    #[test]
    fn test_add_signatures_empty_selection() {
        let guardians = MockGuardians::generate(0, 2, 1).unwrap();
        assert!(matches!(
            guardians.add_signatures(&unsigned_vaa(), &[]),
            Err(Error::EmptySignerSelection)
        ));
        // Checked before decoding
        assert!(matches!(
            guardians.add_signatures(&[], &[]),
            Err(Error::EmptySignerSelection)
        ));
    }

    #[test]
    fn test_add_signatures_unknown_guardian() {
        let guardians = MockGuardians::generate(0, 2, 1).unwrap();
        assert!(matches!(
            guardians.add_signatures(&unsigned_vaa(), &[0, 4]),
            Err(Error::GuardianNotFound(4))
        ));
    }

    #[test]
    fn test_add_signatures_malformed_vaa() {
        let guardians = MockGuardians::devnet();
        assert!(matches!(
            guardians.add_signatures(&[1, 0, 0], &[0]),
            Err(Error::MalformedVaa { .. })
        ));
    }

    #[test]
    fn test_sign_digest_with_subset() {
        let set = MockGuardians::generate(0, 5, 999).unwrap();
        let digest = [0x42u8; 32];

        let sigs = set.sign_digest_with(&digest, &[0, 2, 4]).unwrap();

        assert_eq!(sigs.len(), 3);
        assert_eq!(sigs[0][0], 0); // index 0
        assert_eq!(sigs[1][0], 2); // index 2
        assert_eq!(sigs[2][0], 4); // index 4

        let entry = GuardianSignature::from_bytes(&sigs[1]);
        assert!(eth_validate_sig(&entry.signature, &set.public_keys()[2], &digest).unwrap());

        assert!(matches!(
            set.sign_digest_with(&digest, &[9]),
            Err(Error::GuardianNotFound(9))
        ));
    }
}
