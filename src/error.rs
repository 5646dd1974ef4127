//! Error taxonomy for the fork identifier subsystem.

use std::fmt;

/// A chain configuration could not be turned into a canonical anchor table.
///
/// Fatal for the subsystem: surfaced once, at construction, and never
/// recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A fork entry was labeled with a kind tag this crate does not recognize.
    ///
    /// Only reachable through [`crate::AnchorKind::parse`], i.e. when anchors
    /// are loaded from an external, string-tagged chain-spec source rather
    /// than constructed directly with [`crate::AnchorKind`] values.
    UnknownAnchorKind(String),
    /// The same value was declared as an anchor under both `Height` and
    /// `Timestamp`. This usually means the chain spec copy-pasted a block
    /// number into the timestamp-fork table (or vice versa).
    DuplicateAcrossPartitions(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownAnchorKind(tag) => {
                write!(f, "unrecognized fork anchor kind '{tag}'")
            }
            ConfigError::DuplicateAcrossPartitions(value) => write!(
                f,
                "anchor value {value} is declared as both a height and a timestamp fork"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The wire-encoded identifier could not be decoded.
///
/// Per the error taxonomy this is distinct from a validator outcome: the
/// caller is expected to treat a decode failure as
/// [`crate::RejectReason::LocalIncompatibleOrStale`] for peer-scoring
/// purposes, but that is a policy decision for the caller, not this crate.
#[derive(Debug)]
pub enum DecodeError {
    /// The RLP item itself was malformed (wrong length, non-minimal
    /// integer, bad list structure).
    Rlp(rlp::DecoderError),
    /// The RLP item decoded fine but did not consume every byte of input.
    TrailingBytes,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Rlp(e) => write!(f, "malformed fork identifier: {e}"),
            DecodeError::TrailingBytes => {
                write!(f, "malformed fork identifier: trailing bytes after encoding")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Rlp(e) => Some(e),
            DecodeError::TrailingBytes => None,
        }
    }
}

impl From<rlp::DecoderError> for DecodeError {
    fn from(e: rlp::DecoderError) -> Self {
        DecodeError::Rlp(e)
    }
}
