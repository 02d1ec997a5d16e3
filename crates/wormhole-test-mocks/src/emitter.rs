//! Mock emitter publishing sequentially numbered, unsigned VAAs.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ChainId, UniversalAddress};
use crate::vaa::Vaa;

/// One message source with its own sequence counter.
#[derive(Clone, Debug)]
pub struct MockEmitter {
    chain: ChainId,
    address: UniversalAddress,
    sequence: u64,
}

impl MockEmitter {
    /// `start_sequence` defaults to 0. The first advancing publish uses
    /// `start_sequence + 1`.
    pub fn new(address: UniversalAddress, chain: ChainId, start_sequence: Option<u64>) -> Self {
        Self {
            chain,
            address,
            sequence: start_sequence.unwrap_or_default(),
        }
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn address(&self) -> &UniversalAddress {
        &self.address
    }

    /// Sequence of the most recently published message (or the start value).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Publish with timestamp 0, advancing the sequence.
    pub fn publish_message(
        &mut self,
        nonce: u32,
        payload: &[u8],
        consistency_level: u8,
    ) -> Result<Vec<u8>> {
        self.publish_message_with(nonce, payload, consistency_level, None, true)
    }

    /// Build and serialize an unsigned VAA.
    ///
    /// With `uptick_sequence` false the current sequence is reused, which
    /// produces a duplicate of the previous message's sequence.
    pub fn publish_message_with(
        &mut self,
        nonce: u32,
        payload: &[u8],
        consistency_level: u8,
        timestamp: Option<u32>,
        uptick_sequence: bool,
    ) -> Result<Vec<u8>> {
        self.publish_vaa_with(nonce, payload, consistency_level, timestamp, uptick_sequence)?
            .serialize()
    }

    /// Same as [`MockEmitter::publish_message_with`] without serializing.
    ///
    /// Fails with [`Error::SequenceOverflow`] when advancing past `u64::MAX`;
    /// the sequence is left unchanged.
    pub fn publish_vaa_with(
        &mut self,
        nonce: u32,
        payload: &[u8],
        consistency_level: u8,
        timestamp: Option<u32>,
        uptick_sequence: bool,
    ) -> Result<Vaa> {
        if uptick_sequence {
            self.sequence = self
                .sequence
                .checked_add(1)
                .ok_or(Error::SequenceOverflow(self.sequence))?;
        }

        debug!(
            chain = %self.chain,
            emitter = %self.address,
            sequence = self.sequence,
            nonce,
            payload_len = payload.len(),
            "publishing message"
        );

        Ok(
            Vaa::new(self.chain, self.address, self.sequence, payload.to_vec())
                .with_guardian_set_index(0)
                .with_nonce(nonce)
                .with_timestamp(timestamp.unwrap_or_default())
                .with_consistency_level(consistency_level),
        )
    }
}
