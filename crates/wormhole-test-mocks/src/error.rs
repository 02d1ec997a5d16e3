//! Error type shared by the mocks and the VAA codec.

use thiserror::Error;

/// Errors raised by guardian signing, emitter publishing and VAA decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// `add_signatures` was called without any guardian index.
    #[error("guardian index selection is empty")]
    EmptySignerSelection,

    /// A digest passed to a key helper was not 32 bytes long.
    #[error("digest must be 32 bytes, got {len}")]
    InvalidDigestLength { len: usize },

    /// A requested guardian index has no member in the guardian set.
    #[error("no guardian with index {0}")]
    GuardianNotFound(u8),

    /// Signature entries carry a one-byte guardian index.
    #[error("guardian set holds at most 256 guardians, got {0}")]
    TooManyGuardians(usize),

    /// A raw secret key was not 32 bytes long.
    #[error("secret key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// A secret key or address was not valid hex.
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    /// Secret key, signature or recovery id rejected by secp256k1.
    #[error("secp256k1: {0:?}")]
    Secp256k1(libsecp256k1::Error),

    /// `wormhole_raw_vaas` could not parse the input (truncated header,
    /// signatures or body).
    #[error("malformed VAA ({len} bytes)")]
    MalformedVaa { len: usize },

    /// The leading version byte is not 1.
    #[error("unsupported VAA version {0}")]
    UnsupportedVersion(u8),

    /// The header stores the signature count in a single byte.
    #[error("VAA can carry at most 255 signatures, got {0}")]
    TooManySignatures(usize),

    /// The emitter's sequence is already `u64::MAX` and cannot advance.
    #[error("emitter sequence overflow at {0}")]
    SequenceOverflow(u64),

    /// A chain name that is neither well known nor a decimal id.
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    /// A universal address did not decode to 32 bytes.
    #[error("universal address must be 32 bytes, got {0}")]
    InvalidAddress(usize),
}

impl From<libsecp256k1::Error> for Error {
    fn from(err: libsecp256k1::Error) -> Self {
        Self::Secp256k1(err)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
