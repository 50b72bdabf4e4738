// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use anz_algorithms::score_method;
use anz_core::stats::weighted_mean;
use anz_core::{
    EnsembleMember, Evaluation, Method, MethodScore, Score, ShortCircuit, ValidatedConfig,
};
use rand::Rng;
use std::borrow::Cow;
use tracing::debug;

/// Weight of every member without a score-dependent rule.
pub const BASE_WEIGHT: f64 = 0.5;
/// Magnitude and fence scores above this dominate the ensemble; below it they
/// are silenced.
pub const DOMINANCE_THRESHOLD: f64 = 0.8;
pub use anz_core::RANK_MEMBER;

/// Weight of a method's member given its score.
pub fn member_weight(method: Method, score: f64, dominant_weight: f64) -> f64 {
    if !method.has_dynamic_weight() {
        return BASE_WEIGHT;
    }
    if score > DOMINANCE_THRESHOLD {
        dominant_weight
    } else {
        0.0
    }
}

/// Scores every configured method on `series` and combines the valid scores.
pub fn evaluate<R: Rng + ?Sized>(
    series: &[f64],
    config: &ValidatedConfig,
    rng: &mut R,
) -> Evaluation {
    let mut evaluation = Evaluation::new(
        series.len(),
        config.reference_size(),
        config.active_size(),
    );

    let required = config.full_history_len();
    if config.delay() && series.len() < required {
        debug!(
            available = series.len(),
            required,
            "delay mode: buffer not yet full, scoring 0"
        );
        evaluation.short_circuit = Some(ShortCircuit::Delay {
            required,
            available: series.len(),
        });
        return evaluation;
    }

    if config.has_method(Method::Magnitude) {
        let score = score_method(Method::Magnitude, series, config, rng);
        debug!(method = %Method::Magnitude, ?score, "method scored");
        evaluation.scores.push(MethodScore {
            method: Method::Magnitude,
            score,
        });
        if let Score::Valid(magnitude) = score {
            if magnitude < config.sensitivity() {
                debug!(
                    magnitude,
                    sensitivity = config.sensitivity(),
                    "magnitude below sensitivity, scoring 0"
                );
                evaluation.short_circuit = Some(ShortCircuit::BelowSensitivity {
                    magnitude,
                    sensitivity: config.sensitivity(),
                });
                return evaluation;
            }
        }
    }

    for &method in config.methods() {
        if method == Method::Magnitude {
            continue;
        }
        let score = score_method(method, series, config, rng);
        debug!(method = %method, ?score, "method scored");
        evaluation.scores.push(MethodScore { method, score });
    }

    evaluation.members = ensemble_members(&evaluation.scores, config.dominant_weight());
    let (values, weights): (Vec<f64>, Vec<f64>) = evaluation
        .members
        .iter()
        .map(|member| (member.score, member.weight))
        .unzip();
    evaluation.probability = weighted_mean(&values, &weights).clamp(0.0, 1.0);

    debug!(
        probability = evaluation.probability,
        members = evaluation.members.len(),
        n = series.len(),
        "ensemble evaluated"
    );
    evaluation
}

/// Builds weighted members from per-method scores, skipping not-applicable
/// ones and collapsing high-rank and low-rank into [`RANK_MEMBER`] when both
/// were scored.
pub fn ensemble_members(scores: &[MethodScore], dominant_weight: f64) -> Vec<EnsembleMember> {
    let is_rank = |method: Method| matches!(method, Method::HighRank | Method::LowRank);
    let collapse_ranks = scores.iter().any(|entry| entry.method == Method::HighRank)
        && scores.iter().any(|entry| entry.method == Method::LowRank);

    let mut members = Vec::with_capacity(scores.len());
    let mut rank_emitted = false;
    for entry in scores {
        if collapse_ranks && is_rank(entry.method) {
            if rank_emitted {
                continue;
            }
            rank_emitted = true;
            let combined = scores
                .iter()
                .filter(|other| is_rank(other.method))
                .filter_map(|other| other.score.value())
                .reduce(f64::max);
            if let Some(score) = combined {
                members.push(EnsembleMember {
                    name: Cow::Borrowed(RANK_MEMBER),
                    score,
                    weight: BASE_WEIGHT,
                });
            }
            continue;
        }

        if let Score::Valid(score) = entry.score {
            members.push(EnsembleMember {
                name: Cow::Borrowed(entry.method.as_str()),
                score,
                weight: member_weight(entry.method, score, dominant_weight),
            });
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::{BASE_WEIGHT, RANK_MEMBER, ensemble_members, evaluate, member_weight};
    use anz_core::{
        AnomalyzerConfig, Method, MethodScore, NotApplicable, Score, ShortCircuit,
        ValidatedConfig,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scenario_config() -> ValidatedConfig {
        AnomalyzerConfig {
            upper_bound: Some(5.0),
            lower_bound: Some(0.0),
            active_size: 1,
            seasons: 4,
            sensitivity: 0.1,
            ..AnomalyzerConfig::default()
        }
        .with_methods(["cdf", "fence", "highrank", "lowrank", "magnitude"])
        .validate()
        .expect("scenario config should validate")
    }

    fn valid(method: Method, value: f64) -> MethodScore {
        MethodScore {
            method,
            score: Score::Valid(value),
        }
    }

    #[test]
    fn dynamic_weights_follow_dominance_threshold() {
        assert_eq!(member_weight(Method::Magnitude, 0.81, 1.0), 1.0);
        assert_eq!(member_weight(Method::Magnitude, 0.8, 1.0), 0.0);
        assert_eq!(member_weight(Method::Fence, 0.95, 3.0), 3.0);
        assert_eq!(member_weight(Method::Fence, 0.1, 3.0), 0.0);
        assert_eq!(member_weight(Method::Cdf, 0.0, 3.0), BASE_WEIGHT);
        assert_eq!(member_weight(Method::Ks, 1.0, 3.0), BASE_WEIGHT);
    }

    #[test]
    fn high_and_low_rank_collapse_to_max() {
        let members = ensemble_members(
            &[
                valid(Method::Cdf, 0.4),
                valid(Method::HighRank, 0.2),
                valid(Method::LowRank, 0.7),
            ],
            1.0,
        );
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].name, RANK_MEMBER);
        assert_eq!(members[1].score, 0.7);
        assert_eq!(members[1].weight, BASE_WEIGHT);
    }

    #[test]
    fn single_rank_method_keeps_its_name() {
        let members = ensemble_members(&[valid(Method::HighRank, 0.3)], 1.0);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "highrank");
    }

    #[test]
    fn not_applicable_scores_contribute_nothing() {
        let na = Score::NotApplicable(NotApplicable::InsufficientData {
            required: 2,
            available: 1,
        });
        let members = ensemble_members(
            &[
                MethodScore {
                    method: Method::Cdf,
                    score: na,
                },
                MethodScore {
                    method: Method::HighRank,
                    score: na,
                },
                valid(Method::LowRank, 0.6),
            ],
            1.0,
        );
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, RANK_MEMBER);
        assert_eq!(members[0].score, 0.6);
    }

    #[test]
    fn scenario_push_scores_above_half() {
        let series = [0.1, 2.05, 1.5, 2.5, 2.6, 2.55, 8.0];
        let mut rng = StdRng::seed_from_u64(2024);
        let evaluation = evaluate(&series, &scenario_config(), &mut rng);

        assert!(evaluation.probability > 0.5, "{evaluation:?}");
        assert!(evaluation.short_circuit.is_none());
        assert_eq!(evaluation.weight("magnitude"), Some(1.0));
        assert_eq!(evaluation.weight("fence"), Some(1.0));
        assert_eq!(evaluation.weight("cdf"), Some(BASE_WEIGHT));
        assert_eq!(evaluation.weight(RANK_MEMBER), Some(BASE_WEIGHT));
        assert_eq!(evaluation.weight("highrank"), None);
        assert_eq!(evaluation.method_weight(Method::HighRank), Some(BASE_WEIGHT));
        assert_eq!(evaluation.method_weight(Method::LowRank), Some(BASE_WEIGHT));
    }

    #[test]
    fn all_zero_weights_score_zero() {
        // Fence near the midpoint and magnitude at 0.5 both get weight 0.
        let config = AnomalyzerConfig {
            upper_bound: Some(10.0),
            lower_bound: Some(0.0),
            ..AnomalyzerConfig::default()
        }
        .with_methods(["magnitude", "fence"])
        .validate()
        .expect("config should validate");
        let mut rng = StdRng::seed_from_u64(1);
        let evaluation = evaluate(&[4.0, 4.0, 4.0, 4.0, 6.0], &config, &mut rng);
        assert_eq!(evaluation.members.len(), 2);
        assert!(evaluation.members.iter().all(|member| member.weight == 0.0));
        assert_eq!(evaluation.probability, 0.0);
    }

    #[test]
    fn magnitude_below_sensitivity_short_circuits() {
        let mut rng = StdRng::seed_from_u64(1);
        let evaluation = evaluate(
            &[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.05],
            &scenario_config(),
            &mut rng,
        );
        assert_eq!(evaluation.probability, 0.0);
        assert!(matches!(
            evaluation.short_circuit,
            Some(ShortCircuit::BelowSensitivity { .. })
        ));
        assert_eq!(evaluation.scores.len(), 1);
    }

    #[test]
    fn delay_mode_waits_for_full_history() {
        let config = AnomalyzerConfig {
            delay: true,
            ..AnomalyzerConfig::default()
        }
        .with_methods(["magnitude"])
        .validate()
        .expect("config should validate");
        let mut rng = StdRng::seed_from_u64(1);

        let early = evaluate(&[1.0, 1.0, 1.0, 9.0], &config, &mut rng);
        assert_eq!(early.probability, 0.0);
        assert_eq!(
            early.short_circuit,
            Some(ShortCircuit::Delay {
                required: 5,
                available: 4,
            })
        );
        assert!(early.scores.is_empty());

        let full = evaluate(&[1.0, 1.0, 1.0, 1.0, 9.0], &config, &mut rng);
        assert!(full.short_circuit.is_none());
        assert_eq!(full.probability, 1.0);
    }

    #[test]
    fn not_applicable_magnitude_does_not_short_circuit() {
        let config = AnomalyzerConfig::default()
            .with_methods(["magnitude", "cdf"])
            .validate()
            .expect("config should validate");
        let mut rng = StdRng::seed_from_u64(1);
        let evaluation = evaluate(&[1.0], &config, &mut rng);
        assert!(evaluation.short_circuit.is_none());
        assert_eq!(evaluation.not_applicable().count(), 2);
        assert_eq!(evaluation.probability, 0.0);
    }
}
