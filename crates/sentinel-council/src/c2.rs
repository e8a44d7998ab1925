//! Command-and-control beacon detection.
//!
//! C2 implants typically call home at a near-fixed interval, often with
//! small random jitter to evade naive periodicity detection. We measure
//! the coefficient of variation (CV = stddev / mean) of inter-request
//! intervals: a low CV means the timing is suspiciously regular for
//! human-driven or bursty legitimate traffic.

use crate::signal::BehaviorSignal;

const MIN_SAMPLES: usize = 5;
const TIGHT_CV_THRESHOLD: f64 = 0.2;
const LOOSE_CV_THRESHOLD: f64 = 0.4;
const PAYLOAD_SIZE_CV_THRESHOLD: f64 = 0.15;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / m
}

pub struct C2Analyzer;

impl C2Analyzer {
    /// `interval_seconds` are consecutive gaps between requests to the
    /// same destination; `payload_sizes` are the corresponding request
    /// body sizes, used as a secondary signal when timing alone is
    /// ambiguous (constant-size beacons with irregular timing still read
    /// as automated traffic).
    pub fn analyze(&self, interval_seconds: &[f64], payload_sizes: &[f64]) -> BehaviorSignal {
        if interval_seconds.len() < MIN_SAMPLES {
            return BehaviorSignal::benign("c2_beacon");
        }

        let timing_cv = coefficient_of_variation(interval_seconds);

        if timing_cv <= TIGHT_CV_THRESHOLD {
            return BehaviorSignal::new(
                "c2_beacon",
                0.95,
                format!("interval CV {timing_cv:.3} indicates tightly periodic beaconing"),
            );
        }
        if timing_cv <= LOOSE_CV_THRESHOLD {
            return BehaviorSignal::new(
                "c2_beacon",
                0.75,
                format!("interval CV {timing_cv:.3} indicates jittered periodic beaconing"),
            );
        }

        if payload_sizes.len() >= MIN_SAMPLES {
            let size_cv = coefficient_of_variation(payload_sizes);
            if size_cv <= PAYLOAD_SIZE_CV_THRESHOLD {
                return BehaviorSignal::new(
                    "c2_beacon",
                    0.85,
                    format!("irregular timing but near-constant payload size (CV {size_cv:.3})"),
                );
            }
        }

        BehaviorSignal::benign("c2_beacon")
    }
}

impl Default for C2Analyzer {
    fn default() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_periodicity_flags_highest_confidence() {
        let analyzer = C2Analyzer;
        let intervals = vec![60.0, 60.5, 59.8, 60.2, 60.1, 59.9];
        let signal = analyzer.analyze(&intervals, &[]);
        assert!(signal.confidence >= 0.95);
    }

    #[test]
    fn human_driven_traffic_is_benign() {
        let analyzer = C2Analyzer;
        let intervals = vec![3.0, 45.0, 120.0, 8.0, 200.0, 15.0];
        let signal = analyzer.analyze(&intervals, &[]);
        assert!(signal.confidence < 0.75);
    }

    #[test]
    fn constant_payload_size_flags_despite_irregular_timing() {
        let analyzer = C2Analyzer;
        let intervals = vec![3.0, 45.0, 120.0, 8.0, 200.0, 15.0];
        let sizes = vec![512.0, 511.0, 513.0, 512.0, 512.0, 510.0];
        let signal = analyzer.analyze(&intervals, &sizes);
        assert_eq!(signal.confidence, 0.85);
    }

    #[test]
    fn too_few_samples_is_benign() {
        let analyzer = C2Analyzer;
        let signal = analyzer.analyze(&[60.0, 61.0], &[]);
        assert_eq!(signal.confidence, 0.0);
    }
}
