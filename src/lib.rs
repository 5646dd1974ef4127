//! Fork identifier: a compact, stateless mechanism for two peers to decide
//! whether their chain configurations are compatible before a heavier
//! protocol handshake, generalizing EIP-2124
//! (<https://eips.ethereum.org/EIPS/eip-2124>) to chains with both
//! height-gated and timestamp-gated forks.
//!
//! A chain's fork history is reduced to an [`AnchorTable`]: a canonical,
//! deduplicated sequence of [`Anchor`]s. Folding the genesis hash and every
//! anchor value through an incremental [`Checksum`] produces the `hash` half
//! of a [`ForkId`]; the `next` half names the earliest anchor not yet
//! crossed. A [`ForkFilter`] compares a remote's announced `ForkId` against
//! the local [`AnchorTable`] and a sampled [`ChainHead`] to decide whether to
//! proceed, flag the remote as stale, or flag the local node as incompatible
//! or stale.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::too_many_lines)]

mod anchor;
mod checksum;
mod error;
mod identifier;
mod validator;

pub use anchor::{Anchor, AnchorKind, AnchorTable, ChainHead};
pub use checksum::Checksum;
pub use error::{ConfigError, DecodeError};
pub use identifier::{decode, encode, ForkHash, ForkId};
pub use validator::{ForkFilter, RejectReason};
