//! The canonical, deduplicated, partition-ordered anchor sequence derived
//! from a chain configuration.

use std::collections::BTreeSet;
use std::str::FromStr;

use parity_util_mem::MallocSizeOf;

use crate::checksum::Checksum;
use crate::error::ConfigError;

/// Which axis an anchor is measured on.
///
/// All `Height` anchors precede all `Timestamp` anchors in the canonical
/// sequence, reflecting the historical upgrade from height-gated to
/// time-gated forks. This is a partition, not a merge: heights and
/// timestamps are never compared against one another directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, MallocSizeOf)]
pub enum AnchorKind {
    /// Activates once the chain head's block height reaches the anchor value.
    Height,
    /// Activates once the chain head's wall-clock timestamp reaches the
    /// anchor value.
    Timestamp,
}

impl AnchorKind {
    /// Parse a kind tag as loaded from an external, string-labeled chain
    /// configuration (e.g. a JSON chain spec). Returns
    /// [`ConfigError::UnknownAnchorKind`] for anything other than the two
    /// recognized tags.
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        match tag {
            "height" | "block" => Ok(AnchorKind::Height),
            "timestamp" | "time" => Ok(AnchorKind::Timestamp),
            other => Err(ConfigError::UnknownAnchorKind(other.to_owned())),
        }
    }
}

impl FromStr for AnchorKind {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::parse(tag)
    }
}

/// A single fork anchor: the height or timestamp at which a set of
/// consensus rule changes activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, MallocSizeOf)]
pub struct Anchor {
    /// The axis this anchor is measured on.
    pub kind: AnchorKind,
    /// The height or timestamp value. Never zero: a zero-valued anchor means
    /// "always active since genesis" and is filtered out during
    /// construction.
    pub value: u64,
}

/// A sampled chain head: the two coordinates an anchor may be compared
/// against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainHead {
    /// Current block height.
    pub height: u64,
    /// Current wall-clock timestamp.
    pub timestamp: u64,
}

impl ChainHead {
    /// The head coordinate relevant to the given anchor kind.
    #[must_use]
    pub const fn of(self, kind: AnchorKind) -> u64 {
        match kind {
            AnchorKind::Height => self.height,
            AnchorKind::Timestamp => self.timestamp,
        }
    }

    /// The larger of the two head coordinates. Used when a remote announces
    /// a future fork beyond anything locally known: since heights and
    /// timestamps are both monotonically increasing with real time, and
    /// timestamp-gated eras strictly follow height-gated ones, the larger
    /// coordinate is the conservative stand-in for "how far locally" absent
    /// a specific anchor kind to compare against.
    #[must_use]
    pub const fn dominant(self) -> u64 {
        if self.timestamp > self.height {
            self.timestamp
        } else {
            self.height
        }
    }
}

/// The canonical, immutable anchor sequence for a chain, plus the genesis
/// hash and the prefix checksums derived from it.
///
/// Constructed once per chain configuration via [`AnchorTable::new`] and
/// shared freely thereafter: it owns no interior mutability and is `Send +
/// Sync` because every field is plain owned data.
#[derive(Clone, Debug, PartialEq, MallocSizeOf)]
pub struct AnchorTable {
    genesis: [u8; 32],
    sequence: Vec<Anchor>,
    // prefixes[k] is the checksum folding in sequence[0..k]; prefixes[0] is
    // the genesis-only checksum and prefixes[n] folds in every anchor.
    #[ignore_malloc_size_of = "checksum values only, cheap to recompute"]
    prefixes: Vec<u32>,
}

impl AnchorTable {
    /// Build the canonical anchor table from a genesis hash and an
    /// unordered, possibly-duplicated set of `(kind, value)` anchors.
    ///
    /// Filters zero-valued entries, deduplicates `(kind, value)` pairs
    /// (keeping the first occurrence, so a fork renamed mid-spec but
    /// pointing at the same anchor does not produce two entries), sorts
    /// each partition ascending, and concatenates heights before
    /// timestamps.
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateAcrossPartitions`] if the same value
    /// is declared as both a height and a timestamp anchor.
    pub fn new(
        genesis: [u8; 32],
        anchors: impl IntoIterator<Item = (AnchorKind, u64)>,
    ) -> Result<Self, ConfigError> {
        let mut heights = BTreeSet::new();
        let mut timestamps = BTreeSet::new();
        for (kind, value) in anchors {
            if value == 0 {
                continue;
            }
            match kind {
                AnchorKind::Height => heights.insert(value),
                AnchorKind::Timestamp => timestamps.insert(value),
            };
        }

        if let Some(&overlap) = heights.intersection(&timestamps).next() {
            return Err(ConfigError::DuplicateAcrossPartitions(overlap));
        }

        let sequence: Vec<Anchor> = heights
            .into_iter()
            .map(|value| Anchor {
                kind: AnchorKind::Height,
                value,
            })
            .chain(timestamps.into_iter().map(|value| Anchor {
                kind: AnchorKind::Timestamp,
                value,
            }))
            .collect();

        let mut prefixes = Vec::with_capacity(sequence.len() + 1);
        let mut running = Checksum::genesis(&genesis);
        prefixes.push(running.value());
        for anchor in &sequence {
            running = running.extend(anchor.value);
            prefixes.push(running.value());
        }

        Ok(Self {
            genesis,
            sequence,
            prefixes,
        })
    }

    /// Build the table from anchors labeled with a string kind tag (e.g. as
    /// loaded from a JSON chain spec), resolving each tag via
    /// [`AnchorKind::parse`].
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownAnchorKind`] for any unrecognized tag,
    /// or [`ConfigError::DuplicateAcrossPartitions`] as in [`Self::new`].
    pub fn from_tagged<'a>(
        genesis: [u8; 32],
        anchors: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Result<Self, ConfigError> {
        let parsed = anchors
            .into_iter()
            .map(|(tag, value)| AnchorKind::parse(tag).map(|kind| (kind, value)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(genesis, parsed)
    }

    /// The chain's genesis hash.
    #[must_use]
    pub const fn genesis(&self) -> &[u8; 32] {
        &self.genesis
    }

    /// The canonical anchor sequence: all `Height` anchors ascending,
    /// followed by all `Timestamp` anchors ascending.
    #[must_use]
    pub fn sequence(&self) -> &[Anchor] {
        &self.sequence
    }

    /// Number of anchors in the canonical sequence (not counting genesis).
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// True if the chain has no forks beyond genesis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The checksum folding in `sequence[0..k]`, i.e. the genesis hash plus
    /// the first `k` anchors. `k == 0` is the genesis-only checksum; `k ==
    /// len()` folds in every anchor.
    pub(crate) fn prefix_checksum(&self, k: usize) -> u32 {
        self.prefixes[k]
    }
}
