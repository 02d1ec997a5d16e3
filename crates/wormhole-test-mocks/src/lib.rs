//! Mock Wormhole guardians and emitters for tests.
//!
//! Provides a guardian set that signs VAAs with deterministic secp256k1 keys,
//! an emitter that publishes sequentially numbered unsigned VAAs, and the VAA
//! codec tying the two together.
//!
//! # Example
//!
//! ```rust
//! use wormhole_test_mocks::{ChainId, MockEmitter, MockGuardians, UniversalAddress};
//!
//! let guardians = MockGuardians::generate(0, 2, 42).unwrap();
//! let mut emitter = MockEmitter::new(
//!     UniversalAddress::from_20([0xAB; 20]),
//!     ChainId::ETHEREUM,
//!     Some(5),
//! );
//!
//! let unsigned = emitter.publish_message(7, &[0x01, 0x02], 1).unwrap();
//! let vaa = guardians.add_signatures(&unsigned, &[0, 1]).unwrap();
//!
//! assert_eq!(vaa.sequence, 6);
//! assert!(vaa.verify_signatures(&guardians.public_keys()).unwrap());
//! ```

mod emitter;
mod error;
mod guardian;
pub mod keys;
mod types;
mod vaa;

pub use emitter::*;
pub use error::*;
pub use guardian::*;
pub use keys::{eth_private_to_public, eth_sign_with_private, eth_validate_sig, Signature};
pub use types::*;
pub use vaa::*;

pub use libsecp256k1::{PublicKey, SecretKey};
