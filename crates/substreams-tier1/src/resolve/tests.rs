use super::*;

///
/// FakeChain
///
/// Fixed chain view; `None` makes the lookup fail.
///

#[derive(Clone, Copy, Default)]
struct FakeChain {
    final_block: Option<u64>,
    head: Option<u64>,
}

impl FakeChain {
    const fn with_final(final_block: u64) -> Self {
        Self {
            final_block: Some(final_block),
            head: None,
        }
    }

    const fn with_head(head: u64) -> Self {
        Self {
            final_block: None,
            head: Some(head),
        }
    }
}

impl BlockSource for FakeChain {
    fn recent_final_block(&self) -> Result<u64, BlockSourceError> {
        self.final_block
            .ok_or_else(|| BlockSourceError::new("live not available"))
    }

    fn head_block(&self) -> Result<u64, BlockSourceError> {
        self.head
            .ok_or_else(|| BlockSourceError::new("head not available"))
    }
}

fn config(state_bundle_size: u64, first_streamable_block: u64) -> Tier1Config {
    Tier1Config {
        state_bundle_size,
        first_streamable_block,
    }
}

//
// resolve_start_block
//

#[test]
fn zero_start_resolves_to_first_streamable_block() {
    let got = resolve_start_block(0, 0, 5, &FakeChain::default());

    assert_eq!(got, Ok(5));
}

#[test]
fn positive_start_is_kept() {
    assert_eq!(resolve_start_block(10, 0, 5, &FakeChain::default()), Ok(10));
    assert_eq!(resolve_start_block(5, 0, 5, &FakeChain::default()), Ok(5));
}

#[test]
fn positive_start_below_first_streamable_is_rejected() {
    let got = resolve_start_block(3, 0, 5, &FakeChain::default());

    assert_eq!(
        got,
        Err(ResolveError::StartBeforeFirstStreamable {
            start_block: 3,
            first_streamable_block: 5,
        })
    );
}

#[test]
fn negative_start_counts_back_from_head() {
    assert_eq!(resolve_start_block(-10, 0, 0, &FakeChain::with_head(100)), Ok(90));
    assert_eq!(resolve_start_block(-200, 0, 0, &FakeChain::with_head(100)), Ok(0));
}

#[test]
fn negative_start_before_first_streamable_skips_head_lookup() {
    // head lookup would fail; 12 - 10 lands before block 5
    let got = resolve_start_block(-10, 12, 5, &FakeChain::default());

    assert_eq!(got, Ok(5));
}

#[test]
fn negative_start_reports_head_failure() {
    let got = resolve_start_block(-10, 0, 0, &FakeChain::default());

    assert_eq!(
        got,
        Err(ResolveError::HeadBlock(BlockSourceError::new(
            "head not available"
        )))
    );
}

//
// state_required_at
//

#[test]
fn state_required_at_picks_lowest_store_below_start() {
    assert_eq!(state_required_at(1020, &[1010, 900, 1500]), Some(900));
    assert_eq!(state_required_at(1020, &[1020, 1500]), None);
    assert_eq!(state_required_at(1020, &[]), None);
}

//
// compute_linear_handoff_block
//

#[test]
fn production_handoff_follows_final_block() {
    // (final block, stop, expected handoff)
    let cases = [
        (Some(100), 0, 100),
        (Some(100), 150, 100),
        (Some(100), 50, 50),
        (Some(105), 0, 100),
        (None, 50, 50),
    ];

    for (final_block, stop, expected) in cases {
        let chain = FakeChain {
            final_block,
            head: None,
        };
        let got = compute_linear_handoff_block(true, 10, stop, None, 10, &chain);

        assert_eq!(got, Ok(expected), "final={final_block:?} stop={stop}");
    }
}

#[test]
fn production_handoff_without_final_block_needs_stop() {
    let got = compute_linear_handoff_block(true, 10, 0, None, 10, &FakeChain::default());

    assert_eq!(
        got,
        Err(ResolveError::FinalBlockUnavailable(BlockSourceError::new(
            "live not available"
        )))
    );
}

#[test]
fn production_start_above_final_boundary_hands_off_at_start() {
    let got = compute_linear_handoff_block(true, 103, 0, None, 10, &FakeChain::with_final(105));

    assert_eq!(got, Ok(103));
}

#[test]
fn production_state_keeps_handoff_on_final_boundary() {
    let got =
        compute_linear_handoff_block(true, 103, 0, Some(50), 10, &FakeChain::with_final(105));

    assert_eq!(got, Ok(100));
}

#[test]
fn development_without_state_hands_off_at_start() {
    let got = compute_linear_handoff_block(false, 1020, 0, None, 100, &FakeChain::default());

    assert_eq!(got, Ok(1020));
}

#[test]
fn development_store_inside_segment_hands_off_at_store_init() {
    let got =
        compute_linear_handoff_block(false, 1020, 0, Some(1010), 100, &FakeChain::with_final(2000));

    assert_eq!(got, Ok(1010));
}

#[test]
fn development_hands_off_at_previous_boundary() {
    let got =
        compute_linear_handoff_block(false, 1020, 0, Some(900), 100, &FakeChain::with_final(2000));
    assert_eq!(got, Ok(1000));

    let got = compute_linear_handoff_block(false, 1020, 0, Some(900), 100, &FakeChain::default());
    assert_eq!(got, Ok(1000));
}

#[test]
fn development_handoff_never_passes_final_block() {
    let got =
        compute_linear_handoff_block(false, 1020, 0, Some(500), 100, &FakeChain::with_final(950));

    assert_eq!(got, Ok(900));
}

#[test]
fn zero_segment_size_is_rejected() {
    for production_mode in [true, false] {
        let got =
            compute_linear_handoff_block(production_mode, 10, 0, None, 0, &FakeChain::with_final(5));

        assert_eq!(got, Err(ResolveError::ZeroSegmentSize));
    }
}

//
// build_request_details
//

#[test]
fn details_gate_is_later_of_start_and_handoff() {
    let request = Request {
        start_block_num: 103,
        stop_block_num: 0,
        production_mode: true,
    };

    let details =
        build_request_details(&config(10, 0), &request, &[50], &FakeChain::with_final(105))
            .expect("request should resolve");

    assert_eq!(
        details,
        RequestDetails {
            production_mode: true,
            resolved_start_block: 103,
            linear_handoff_block: 100,
            linear_gate_block: 103,
            stop_block: 0,
        }
    );
}

#[test]
fn details_ignore_stores_starting_at_or_after_start() {
    let request = Request {
        start_block_num: 1020,
        stop_block_num: 0,
        production_mode: false,
    };

    let details =
        build_request_details(&config(100, 0), &request, &[1020, 3000], &FakeChain::default())
            .expect("request should resolve");

    assert_eq!(details.linear_handoff_block, 1020);
    assert_eq!(details.linear_gate_block, 1020);
}

#[test]
fn details_reject_start_at_or_after_stop() {
    let request = Request {
        start_block_num: 200,
        stop_block_num: 200,
        production_mode: true,
    };

    let got = build_request_details(&config(10, 0), &request, &[], &FakeChain::with_final(500));

    assert_eq!(
        got,
        Err(ResolveError::StartNotBeforeStop {
            resolved_start_block: 200,
            stop_block: 200,
        })
    );
}
