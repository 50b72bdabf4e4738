// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use anz_core::{AnomalyzerConfig, KsSignificance, Method};
use anz_online::{Anomalyzer, AppendPolicy};
use libfuzzer_sys::fuzz_target;

fn build_methods(mask: u8) -> Vec<String> {
    Method::ALL
        .iter()
        .enumerate()
        .filter(|(idx, _)| mask & (1 << idx) != 0)
        .map(|(_, method)| method.as_str().to_string())
        .collect()
}

fn build_bounds(seed: u8, upper_seed: i16, lower_seed: i16) -> (Option<f64>, Option<f64>) {
    let upper = f64::from(upper_seed) / 8.0;
    let lower = f64::from(lower_seed) / 8.0;
    match seed % 4 {
        0 => (None, None),
        1 => (Some(upper), None),
        2 => (Some(upper.max(lower) + 1.0), Some(upper.min(lower))),
        _ => (Some(upper), Some(lower)),
    }
}

fn build_policy(seed: u8) -> AppendPolicy {
    match seed % 3 {
        0 => AppendPolicy::Unbounded,
        1 => AppendPolicy::Fixed,
        _ => AppendPolicy::Capped,
    }
}

fn build_observation(base: f64, mode_seed: u8, raw_seed: i16) -> f64 {
    match mode_seed % 8 {
        0 => base,
        1 => f64::from(raw_seed) / 8.0,
        2 => 0.0,
        3 => f64::from(raw_seed),
        4 => f64::NAN,
        5 => f64::INFINITY,
        6 => f64::NEG_INFINITY,
        _ => f64::MIN_POSITIVE,
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);

    let (upper_bound, lower_bound) =
        build_bounds(cursor.next_u8(), cursor.next_i16(), cursor.next_i16());
    let config = AnomalyzerConfig {
        upper_bound,
        lower_bound,
        active_size: common::bounded(cursor.next_u8(), 0, 8),
        reference_size: if cursor.next_u8() & 1 == 0 {
            None
        } else {
            Some(common::bounded(cursor.next_u8(), 0, 40))
        },
        seasons: common::bounded(cursor.next_u8(), 0, 6),
        perm_count: common::bounded(cursor.next_u8(), 0, 32),
        sensitivity: f64::from(cursor.next_u8()) / 255.0,
        capacity: common::bounded(cursor.next_u8(), 0, 64),
        methods: build_methods(cursor.next_u8()),
        delay: cursor.next_u8() & 1 == 1,
        ks_significance: if cursor.next_u8() & 1 == 0 {
            KsSignificance::Bootstrap
        } else {
            KsSignificance::Asymptotic
        },
        dominant_weight: 0.5 + f64::from(cursor.next_u8() % 8),
        seed: Some(cursor.next_u64()),
    };

    let initial_len = common::bounded(cursor.next_u8(), 0, 48).saturating_mul(8);
    let initial: Vec<f64> = common::decode_f64_chunks(&cursor.take_padded(initial_len), 48)
        .into_iter()
        .map(|value| if value.is_finite() { value } else { 0.0 })
        .collect();

    let Ok(mut anomalyzer) = Anomalyzer::new(&config, initial) else {
        return;
    };

    let steps = common::bounded(cursor.next_u8(), 1, 64);
    for _ in 0..steps {
        let op_seed = cursor.next_u8();
        let base = f64::from(cursor.next_i16()) / 4.0;
        let x = build_observation(base, cursor.next_u8(), cursor.next_i16());

        if op_seed % 13 == 0 {
            let before = anomalyzer.data().to_vec();
            if anomalyzer.update(&[x, base]).is_err() {
                assert_eq!(anomalyzer.data(), before.as_slice());
            }
            continue;
        }

        let before_len = anomalyzer.len();
        let policy = build_policy(op_seed);
        match anomalyzer.push_with(x, policy) {
            Ok(probability) => {
                assert!((0.0..=1.0).contains(&probability));
                if policy == AppendPolicy::Fixed {
                    assert_eq!(anomalyzer.len(), before_len);
                }
                if let (AppendPolicy::Capped, Some(capacity)) =
                    (policy, anomalyzer.config().capacity())
                {
                    assert!(anomalyzer.len() <= capacity);
                }
            }
            Err(_) => assert_eq!(anomalyzer.len(), before_len),
        }

        let evaluation = anomalyzer.eval_by_test();
        assert!(!evaluation.probability.is_nan());
    }
});
