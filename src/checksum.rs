//! The incremental IEEE CRC32 fingerprint folded over the canonical anchor
//! stream (genesis hash, then one 8-byte big-endian word per anchor value).

use crc::crc32;

/// An in-progress or finished CRC32 checksum over the canonical stream.
///
/// `Checksum` is a plain value: cloning it is cloning a `u32`, and `extend`
/// never mutates in place, so a checksum from any prefix of the stream can
/// be kept around and reused to cheaply project further extensions without
/// restarting from the genesis hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Checksum(u32);

impl Checksum {
    /// Seed the checksum with the 32-byte genesis hash. This is `C_0`: the
    /// checksum over an anchor list with zero anchors folded in.
    #[must_use]
    pub fn genesis(genesis: &[u8; 32]) -> Self {
        Self(crc32::checksum_ieee(genesis))
    }

    /// Fold one more anchor value into the checksum, encoded as 8
    /// big-endian bytes. The anchor's kind is deliberately not part of the
    /// input: only the value participates in the digest.
    #[must_use]
    pub fn extend(self, value: u64) -> Self {
        Self(crc32::update(self.0, &crc32::IEEE_TABLE, &value.to_be_bytes()))
    }

    /// The 32-bit checksum value computed so far.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}
