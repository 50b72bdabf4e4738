// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]
#![allow(dead_code)]

use anz_core::AnzError;
use anz_online::{Anomalyzer, AppendPolicy};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoakProfile {
    PrSmoke,
    Nightly1h,
}

impl SoakProfile {
    pub fn target_runtime_seconds(self) -> u64 {
        match self {
            Self::PrSmoke => 120,
            Self::Nightly1h => 3_600,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrSmoke => "pr_smoke",
            Self::Nightly1h => "nightly_1h",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    pub steps: usize,
    pub spike_every: usize,
    pub alert_threshold: f64,
    pub policy: AppendPolicy,
    pub sleep_per_step_ms: u64,
}

impl HarnessConfig {
    pub fn for_profile(profile: SoakProfile) -> Self {
        match profile {
            SoakProfile::PrSmoke => Self {
                steps: 2_000,
                spike_every: 97,
                alert_threshold: 0.5,
                policy: AppendPolicy::Capped,
                sleep_per_step_ms: 0,
            },
            SoakProfile::Nightly1h => Self {
                steps: 50_000,
                spike_every: 211,
                alert_threshold: 0.5,
                policy: AppendPolicy::Capped,
                sleep_per_step_ms: 0,
            },
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::for_profile(SoakProfile::PrSmoke)
    }
}

pub fn profile_from_env() -> SoakProfile {
    match std::env::var("ANZ_SOAK_PROFILE")
        .ok()
        .as_deref()
        .unwrap_or("pr_smoke")
    {
        "nightly_1h" => SoakProfile::Nightly1h,
        _ => SoakProfile::PrSmoke,
    }
}

/// Deterministic metric stream: a slow sawtooth around 10 with periodic spikes.
pub fn signal(step: usize, spike_every: usize) -> f64 {
    if spike_every > 0 && step > 0 && step.is_multiple_of(spike_every) {
        return 50.0;
    }
    10.0 + (step % 7) as f64 * 0.1
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct HarnessMetrics {
    pub elapsed_ms: u128,
    pub pushes_per_sec: f64,
    pub max_buffer_len: usize,
    pub alert_count: usize,
    pub alert_flip_count: usize,
    pub max_probability: f64,
    pub max_rss_kib: Option<u64>,
}

pub fn run_soak(
    anomalyzer: &mut Anomalyzer,
    config: &HarnessConfig,
) -> Result<HarnessMetrics, AnzError> {
    if config.steps == 0 {
        return Err(AnzError::invalid_input(
            "soak harness requires config.steps >= 1",
        ));
    }

    let started_at = Instant::now();
    let mut max_buffer_len = anomalyzer.len();
    let mut alert_count = 0usize;
    let mut alert_flip_count = 0usize;
    let mut last_alert: Option<bool> = None;
    let mut max_probability = 0.0f64;
    let mut max_rss_kib: Option<u64> = None;

    for step in 0..config.steps {
        let probability = anomalyzer.push_with(signal(step, config.spike_every), config.policy)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(AnzError::invalid_input(format!(
                "probability escaped [0, 1] at step {step}: {probability}"
            )));
        }

        let alert = probability > config.alert_threshold;
        if alert {
            alert_count += 1;
        }
        if last_alert.is_some_and(|previous| previous != alert) {
            alert_flip_count += 1;
        }
        last_alert = Some(alert);
        max_probability = max_probability.max(probability);
        max_buffer_len = max_buffer_len.max(anomalyzer.len());

        if (step + 1).is_multiple_of(100) {
            if let Some(rss_kib) = current_rss_kib() {
                max_rss_kib = Some(max_rss_kib.map_or(rss_kib, |seen| seen.max(rss_kib)));
            }
        }

        if config.sleep_per_step_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.sleep_per_step_ms));
        }
    }

    let elapsed = started_at.elapsed();
    Ok(HarnessMetrics {
        elapsed_ms: elapsed.as_millis(),
        pushes_per_sec: config.steps as f64 / elapsed.as_secs_f64().max(1e-9),
        max_buffer_len,
        alert_count,
        alert_flip_count,
        max_probability,
        max_rss_kib,
    })
}

pub fn emit_metrics_json_if_requested(
    scenario: &str,
    profile: SoakProfile,
    metrics: &HarnessMetrics,
) -> Result<(), AnzError> {
    let Some(path) = std::env::var("ANZ_SOAK_METRICS_OUT").ok() else {
        return Ok(());
    };

    let max_rss_kib = metrics
        .max_rss_kib
        .map(|value| value.to_string())
        .unwrap_or_else(|| "null".to_string());

    let payload = format!(
        "{{\n  \"scenario\": \"{scenario}\",\n  \"profile\": \"{}\",\n  \"target_runtime_seconds\": {},\n  \"pushes_per_sec\": {},\n  \"max_buffer_len\": {},\n  \"alert_count\": {},\n  \"alert_flip_count\": {},\n  \"max_rss_kib\": {}\n}}\n",
        profile.as_str(),
        profile.target_runtime_seconds(),
        metrics.pushes_per_sec,
        metrics.max_buffer_len,
        metrics.alert_count,
        metrics.alert_flip_count,
        max_rss_kib,
    );

    std::fs::write(path, payload).map_err(|err| {
        AnzError::invalid_input(format!("failed writing soak metrics artifact: {err}"))
    })
}

#[cfg(target_os = "linux")]
fn current_rss_kib() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|raw| raw.parse::<u64>().ok())
}

#[cfg(not(target_os = "linux"))]
fn current_rss_kib() -> Option<u64> {
    None
}
