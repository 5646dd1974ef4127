//! End-to-end scenarios driving the anchor table, checksum engine and
//! validator together, mirroring the scenario vectors used to pin down this
//! design (a real chain's fork history, height-gated and timestamp-gated).

use forkid::{encode, decode, Anchor, AnchorKind, AnchorTable, ChainHead, ForkFilter, ForkHash, ForkId, RejectReason};

const GENESIS: [u8; 32] = [
    0xd4, 0xe5, 0x67, 0x40, 0xf8, 0x76, 0xae, 0xf8, 0xc0, 0x10, 0xb8, 0x6a, 0x40, 0xd5, 0xf5, 0x67,
    0x45, 0xa1, 0x18, 0xd0, 0x90, 0x6a, 0x34, 0xe6, 0x9a, 0xec, 0x8c, 0x0d, 0xb1, 0xcb, 0x8f, 0xa3,
];

// The full height partition through Gray Glacier, plus the Shanghai
// timestamp anchor: exercises the partition boundary between the two
// anchor kinds.
fn full_chain() -> AnchorTable {
    let heights = [
        1_150_000u64,
        1_920_000,
        2_463_000,
        2_675_000,
        4_370_000,
        7_280_000,
        9_069_000,
        9_200_000,
        12_244_000,
        12_965_000,
        13_773_000,
        15_050_000,
    ]
    .map(|v| (AnchorKind::Height, v));
    let timestamps = [(AnchorKind::Timestamp, 1_681_338_455u64)];
    AnchorTable::new(GENESIS, heights.into_iter().chain(timestamps)).unwrap()
}

fn head(height: u64, timestamp: u64) -> ChainHead {
    ChainHead { height, timestamp }
}

#[test]
fn gray_glacier_local_accepts_unsynced_gray_glacier_remote() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(15_050_000, 0));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xf0af_d0e3),
            next: 0
        }),
        Ok(())
    );
}

#[test]
fn gray_glacier_local_accepts_remote_aware_of_shanghai() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(15_050_000, 0));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xf0af_d0e3),
            next: 1_681_338_455
        }),
        Ok(())
    );
}

#[test]
fn shanghai_local_accepts_gray_glacier_remote_in_sync_on_next() {
    // Crossing from a height-gated split point to a timestamp-gated one:
    // the local head has crossed Shanghai, the remote has not, but the
    // remote's `next` matches the timestamp anchor exactly.
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(20_000_000, 1_681_338_455));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xf0af_d0e3),
            next: 1_681_338_455
        }),
        Ok(())
    );
}

#[test]
fn shanghai_local_accepts_own_epoch_with_uncertain_future() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(20_000_000, 1_681_338_455));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xdce9_6c2d),
            next: u64::MAX
        }),
        Ok(())
    );
}

#[test]
fn shanghai_local_rejects_stale_remote_with_no_future_knowledge() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(20_000_000, 1_681_338_455));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xf0af_d0e3),
            next: 0
        }),
        Err(RejectReason::RemoteStale)
    );
}

#[test]
fn shanghai_local_rejects_unknown_remote_epoch() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(20_000_000, 1_681_338_455));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0x1234_5678),
            next: 0
        }),
        Err(RejectReason::LocalIncompatibleOrStale)
    );
}

#[test]
fn arrow_glacier_local_accepts_gray_glacier_remote_ahead() {
    // Local is one height anchor behind the remote's epoch; the remote's
    // checksum is found scanning forward from the local split point, not
    // by exact match, since local has not crossed Gray Glacier yet.
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(13_773_000, 0));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xf0af_d0e3),
            next: 0
        }),
        Ok(())
    );
}

#[test]
fn far_future_local_head_rejects_mismatched_timestamp_remote() {
    let table = full_chain();
    let filter = ForkFilter::new(&table, || head(88_888_888, 8_888_888_888));
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(0xdce9_6c2d),
            next: 8_888_888_888
        }),
        Err(RejectReason::LocalIncompatibleOrStale)
    );
}

#[test]
fn current_identifier_tracks_the_timestamp_partition() {
    let table = full_chain();
    let at_gray_glacier = ForkFilter::new(&table, || head(15_050_000, 0)).current();
    assert_eq!(at_gray_glacier.hash, ForkHash(0xf0af_d0e3));
    assert_eq!(at_gray_glacier.next, 1_681_338_455);

    let at_shanghai = ForkFilter::new(&table, || head(20_000_000, 1_681_338_455)).current();
    assert_eq!(at_shanghai.hash, ForkHash(0xdce9_6c2d));
    assert_eq!(at_shanghai.next, 0);
}

#[test]
fn wire_round_trip_for_a_real_identifier() {
    let table = full_chain();
    let id = ForkFilter::new(&table, || head(15_050_000, 0)).current();
    let bytes = encode(&id);
    assert_eq!(decode(&bytes).unwrap(), id);
}

#[test]
fn empty_chain_has_no_forks_and_always_validates() {
    let table = AnchorTable::new(GENESIS, std::iter::empty::<(AnchorKind, u64)>()).unwrap();
    assert!(table.is_empty());
    let filter = ForkFilter::new(&table, || head(123, 456));
    assert_eq!(filter.current().next, 0);
    assert_eq!(
        filter.validate(ForkId {
            hash: ForkHash(filter.current().hash.0),
            next: u64::MAX
        }),
        Ok(())
    );
}

// A second, independently fixed anchor schedule for the same genesis hash,
// exercising the identifier computation itself (as opposed to validation)
// at the very first few anchors: unsynced-at-genesis and sitting exactly on
// the first anchor.
fn early_chain() -> AnchorTable {
    AnchorTable::new(
        GENESIS,
        [1001u64, 5503, 5507, 5519, 5521, 5527, 13_524_557, 27_200_177]
            .map(|v| (AnchorKind::Height, v)),
    )
    .unwrap()
}

#[test]
fn identifier_at_genesis_is_unsynced() {
    let table = early_chain();
    let id = ForkFilter::new(&table, || head(0, 0)).current();
    assert_eq!(id.hash, ForkHash(0x61ae_fa70));
    assert_eq!(id.next, 1001);
}

#[test]
fn identifier_at_last_frontier_block_is_still_unsynced() {
    let table = early_chain();
    let id = ForkFilter::new(&table, || head(1000, 0)).current();
    assert_eq!(id.hash, ForkHash(0x61ae_fa70));
    assert_eq!(id.next, 1001);
}

#[test]
fn identifier_at_first_homestead_block_crosses_the_anchor() {
    let table = early_chain();
    let id = ForkFilter::new(&table, || head(1001, 0)).current();
    assert_eq!(id.hash, ForkHash(0x7cc3_0c12));
    assert_eq!(id.next, 5503);
}

#[test]
fn anchor_accessor_exposes_the_canonical_sequence() {
    let table = full_chain();
    let first: &Anchor = &table.sequence()[0];
    assert_eq!(first.kind, AnchorKind::Height);
    assert_eq!(first.value, 1_150_000);
    assert_eq!(table.genesis(), &GENESIS);
}
