//! Chain ids and universal addresses as they appear in a VAA body.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Wormhole chain id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(pub u16);

impl ChainId {
    pub const SOLANA: Self = Self(1);
    pub const ETHEREUM: Self = Self(2);
    pub const TERRA: Self = Self(3);
    pub const BSC: Self = Self(4);
    pub const POLYGON: Self = Self(5);
    pub const AVALANCHE: Self = Self(6);
    pub const OASIS: Self = Self(7);
    pub const ALGORAND: Self = Self(8);
    pub const AURORA: Self = Self(9);
    pub const FANTOM: Self = Self(10);
    pub const KARURA: Self = Self(11);
    pub const ACALA: Self = Self(12);
    pub const KLAYTN: Self = Self(13);
    pub const CELO: Self = Self(14);
    pub const NEAR: Self = Self(15);
    pub const MOONBEAM: Self = Self(16);
    pub const TERRA2: Self = Self(18);
    pub const INJECTIVE: Self = Self(19);
    pub const SUI: Self = Self(21);
    pub const APTOS: Self = Self(22);
    pub const ARBITRUM: Self = Self(23);
    pub const OPTIMISM: Self = Self(24);
    pub const BASE: Self = Self(30);
    pub const WORMCHAIN: Self = Self(3104);

    const NAMES: &'static [(&'static str, ChainId)] = &[
        ("solana", Self::SOLANA),
        ("ethereum", Self::ETHEREUM),
        ("terra", Self::TERRA),
        ("bsc", Self::BSC),
        ("polygon", Self::POLYGON),
        ("avalanche", Self::AVALANCHE),
        ("oasis", Self::OASIS),
        ("algorand", Self::ALGORAND),
        ("aurora", Self::AURORA),
        ("fantom", Self::FANTOM),
        ("karura", Self::KARURA),
        ("acala", Self::ACALA),
        ("klaytn", Self::KLAYTN),
        ("celo", Self::CELO),
        ("near", Self::NEAR),
        ("moonbeam", Self::MOONBEAM),
        ("terra2", Self::TERRA2),
        ("injective", Self::INJECTIVE),
        ("sui", Self::SUI),
        ("aptos", Self::APTOS),
        ("arbitrum", Self::ARBITRUM),
        ("optimism", Self::OPTIMISM),
        ("base", Self::BASE),
        ("wormchain", Self::WORMCHAIN),
    ];

    /// Lowercase name of a well-known chain.
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(_, id)| id == self)
            .map(|(name, _)| *name)
    }
}

impl From<u16> for ChainId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u16 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Accepts a chain name (case-insensitive) or a decimal chain id.
impl FromStr for ChainId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u16>() {
            return Ok(Self(id));
        }
        let lower = s.to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, id)| *id)
            .ok_or_else(|| Error::UnknownChain(s.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A 32-byte, chain-agnostic emitter address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniversalAddress(pub [u8; 32]);

impl UniversalAddress {
    /// Left-pad a 20-byte EVM address to 32 bytes.
    pub fn from_20(address: [u8; 20]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(&address);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for UniversalAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 20]> for UniversalAddress {
    fn from(address: [u8; 20]) -> Self {
        Self::from_20(address)
    }
}

/// Parses 32 bytes of hex, `0x` prefix optional.
impl FromStr for UniversalAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidAddress(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for UniversalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_from_str() {
        assert_eq!("Solana".parse::<ChainId>().unwrap(), ChainId::SOLANA);
        assert_eq!("ETHEREUM".parse::<ChainId>().unwrap(), ChainId::ETHEREUM);
        assert_eq!("30".parse::<ChainId>().unwrap(), ChainId::BASE);
        assert!(matches!(
            "Narnia".parse::<ChainId>(),
            Err(Error::UnknownChain(name)) if name == "Narnia"
        ));
    }

    #[test]
    fn test_chain_display() {
        assert_eq!(ChainId::SOLANA.to_string(), "solana(1)");
        assert_eq!(ChainId(9999).to_string(), "9999");
    }

    #[test]
    fn test_address_from_20() {
        let addr = UniversalAddress::from_20([0xAB; 20]);
        assert_eq!(&addr.0[..12], &[0u8; 12]);
        assert_eq!(&addr.0[12..], &[0xAB; 20]);
    }

    #[test]
    fn test_address_from_str() {
        let hex_str = format!("0x{}", "ab".repeat(32));
        let addr: UniversalAddress = hex_str.parse().unwrap();
        assert_eq!(addr, UniversalAddress([0xAB; 32]));
        assert_eq!(addr.to_string(), hex_str);

        assert!(matches!(
            "abcd".parse::<UniversalAddress>(),
            Err(Error::InvalidAddress(2))
        ));
    }
}
