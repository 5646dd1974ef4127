//! The `(hash, next)` identifier a peer advertises during handshake, and its
//! canonical wire encoding.

use parity_util_mem::MallocSizeOf;
use rlp::{DecoderError, Rlp, RlpStream};
use rlp_derive::{RlpDecodable, RlpEncodable};

use crate::error::DecodeError;

/// The 32-bit checksum half of a [`ForkId`].
///
/// Encoded on the wire as a fixed 4-byte big-endian string, never as RLP's
/// usual variable-length minimal integer — the three fixed test vectors
/// pin this down (`0x00000000` encodes as four zero bytes, not the empty
/// string).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, MallocSizeOf)]
pub struct ForkHash(pub u32);

impl rlp::Encodable for ForkHash {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.encoder().encode_value(&self.0.to_be_bytes());
    }
}

impl rlp::Decodable for ForkHash {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        rlp.decoder().decode_value(|b| {
            if b.len() != 4 {
                return Err(DecoderError::RlpInvalidLength);
            }
            let mut blob = [0; 4];
            blob.copy_from_slice(b);
            Ok(Self(u32::from_be_bytes(blob)))
        })
    }
}

/// A fork identifier: the `(hash, next)` pair a peer advertises during
/// handshake so the two sides can decide compatibility before any heavier
/// protocol exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, MallocSizeOf, RlpEncodable, RlpDecodable)]
pub struct ForkId {
    /// CRC32 checksum over the genesis hash and every anchor the sender has
    /// already crossed.
    pub hash: ForkHash,
    /// The earliest anchor the sender knows about but has not yet crossed,
    /// or `0` if it knows of none.
    pub next: u64,
}

/// Encode a [`ForkId`] using the canonical wire scheme (§6): a two-element
/// list, a 4-byte big-endian checksum followed by the minimal big-endian
/// encoding of `next`.
#[must_use]
pub fn encode(id: &ForkId) -> Vec<u8> {
    rlp::encode(id)
}

/// Decode a [`ForkId`] from its canonical wire encoding.
///
/// # Errors
/// Returns [`DecodeError`] if the bytes are the wrong length, use a
/// non-minimal integer encoding, or carry trailing bytes. The caller, not
/// this crate, decides how to treat a decode failure for peer-scoring
/// purposes.
pub fn decode(bytes: &[u8]) -> Result<ForkId, DecodeError> {
    let rlp = Rlp::new(bytes);
    let id: ForkId = rlp.as_val()?;
    // `rlp.as_raw()` on the root item is just the input slice handed to
    // `Rlp::new`, so it always matches `bytes.len()` regardless of trailing
    // garbage. The list header itself knows how many bytes the encoding
    // actually occupies; compare against that instead.
    let info = rlp.payload_info()?;
    if info.header_len + info.value_len != bytes.len() {
        return Err(DecodeError::TrailingBytes);
    }
    Ok(id)
}
