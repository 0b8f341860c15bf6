#![allow(dead_code)]

use logo_vision::Frame;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A random binary mask up to `max_side` x `max_side`, with roughly
/// `density` percent of its pixels set.
pub fn arb_mask(max_side: u32, density: u32) -> impl Strategy<Value = Frame> {
    (1..=max_side, 1..=max_side).prop_flat_map(move |(width, height)| {
        let len = (width * height) as usize;
        proptest::collection::vec(0u32..100, len).prop_map(move |samples| {
            let data = samples
                .into_iter()
                .map(|s| if s < density { Frame::MASK_SET } else { 0 })
                .collect();
            Frame::new(width, height, Frame::MASK_CHANNELS, data).unwrap()
        })
    })
}

/// A random 3-channel frame up to `max_side` x `max_side`.
pub fn arb_color_frame(max_side: u32) -> impl Strategy<Value = Frame> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(width, height)| {
        let len = (width * height * 3) as usize;
        proptest::collection::vec(any::<u8>(), len).prop_map(move |data| {
            Frame::new(width, height, Frame::COLOR_CHANNELS, data).unwrap()
        })
    })
}
