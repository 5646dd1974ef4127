//! The compatibility decision: given a remote peer's announced [`ForkId`],
//! decide whether to proceed with handshake, flag the remote as stale, or
//! flag the local node as incompatible or stale.

use crate::anchor::{AnchorKind, AnchorTable, ChainHead};
use crate::identifier::{ForkHash, ForkId};

/// Why a remote's announced [`ForkId`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The remote is on an old software version and needs an update; local
    /// is fine.
    RemoteStale,
    /// The remote claims a future or divergent history the local node does
    /// not recognize, or is running ahead with knowledge the local node
    /// should already have. Disconnect and log.
    LocalIncompatibleOrStale,
}

/// A stateless compatibility checker over an [`AnchorTable`] and a
/// head-oracle closure.
///
/// `ForkFilter` owns no mutable state: it borrows the anchor table and
/// samples the head oracle exactly once per call, so concurrent calls need
/// no synchronization. `F` is `Fn`, not `FnMut`, precisely so that callers
/// may invoke [`Self::validate`] from multiple threads at once.
pub struct ForkFilter<'a, F>
where
    F: Fn() -> ChainHead,
{
    table: &'a AnchorTable,
    head: F,
}

impl<'a, F> ForkFilter<'a, F>
where
    F: Fn() -> ChainHead,
{
    /// Build a validator over the given anchor table and head oracle.
    pub fn new(table: &'a AnchorTable, head: F) -> Self {
        Self { table, head }
    }

    /// The split point `k*`: the number of anchors in the canonical
    /// sequence that have already passed relative to `head`. Anchors
    /// `0..k*` are passed, `k*..n` are future.
    fn split(&self, head: ChainHead) -> usize {
        self.table
            .sequence()
            .iter()
            .position(|anchor| anchor.value > head.of(anchor.kind))
            .unwrap_or_else(|| self.table.len())
    }

    /// The local fork identifier for the current head.
    #[must_use]
    pub fn current(&self) -> ForkId {
        let head = (self.head)();
        let split = self.split(head);
        let next = self
            .table
            .sequence()
            .get(split)
            .map_or(0, |anchor| anchor.value);
        ForkId {
            hash: ForkHash(self.table.prefix_checksum(split)),
            next,
        }
    }

    /// Decide whether a remote's announced [`ForkId`] is compatible with
    /// the local chain head.
    ///
    /// # Errors
    /// Returns a [`RejectReason`] if the remote should be disconnected.
    pub fn validate(&self, remote: ForkId) -> Result<(), RejectReason> {
        let head = (self.head)();
        let split = self.split(head);
        let sequence = self.table.sequence();
        let local_hash = self.table.prefix_checksum(split);

        if remote.hash.0 == local_hash {
            if remote.next == 0 {
                return Ok(());
            }
            if let Some(next_anchor) = sequence.get(split) {
                if remote.next == next_anchor.value {
                    return Ok(());
                }
            }
            let beyond = match sequence.get(split) {
                Some(next_anchor) => remote.next > head.of(next_anchor.kind),
                None => remote.next > head.dominant(),
            };
            return if beyond {
                Ok(())
            } else {
                log::trace!(
                    target: "forkid",
                    "remote announced fork {:#x}/{} already past locally; rejecting",
                    remote.hash.0, remote.next
                );
                Err(RejectReason::LocalIncompatibleOrStale)
            };
        }

        // Remote is behind: its checksum matches an earlier local epoch.
        // The fork it should be waiting for next is fixed by that epoch; if
        // its announced `next` is anything else (including 0, i.e. no
        // knowledge of it at all), its software is stale.
        if let Some(j) = (0..split).find(|&j| self.table.prefix_checksum(j) == remote.hash.0) {
            // sequence[j] exists because j < split <= len().
            let waiting_for = sequence[j].value;
            return if remote.next == waiting_for {
                Ok(())
            } else {
                log::trace!(
                    target: "forkid",
                    "remote stale: announced next {} but locally the fork after its epoch is {}",
                    remote.next, waiting_for
                );
                Err(RejectReason::RemoteStale)
            };
        }

        // Remote is ahead: its checksum matches a local future epoch.
        if ((split + 1)..=sequence.len())
            .any(|j| self.table.prefix_checksum(j) == remote.hash.0)
        {
            return Ok(());
        }

        log::trace!(
            target: "forkid",
            "remote fork hash {:#x} matches no local epoch; rejecting",
            remote.hash.0
        );
        Err(RejectReason::LocalIncompatibleOrStale)
    }
}
