//! Browser/client fingerprinting detection.
//!
//! Each fingerprinting technique contributes a base score; combining
//! several techniques is disproportionately more identifying than any one
//! alone (that's the entire point of fingerprinting), so the combined
//! score is amplified by a multiplier that grows with how many distinct
//! techniques were observed together.

use crate::signal::BehaviorSignal;

const AGGRESSIVE_THRESHOLD: f64 = 0.75;

/// High-entropy techniques: any two of these together are already enough
/// to uniquely identify most clients.
const HIGH_ENTROPY_TECHNIQUES: &[&str] = &["canvas", "webgl", "audio_context"];

fn base_score(technique: &str) -> f64 {
    match technique {
        "canvas" => 0.35,
        "webgl" => 0.35,
        "audio_context" => 0.30,
        "font_enumeration" => 0.20,
        "battery_status" => 0.15,
        "webrtc_local_ip" => 0.25,
        "hardware_concurrency" => 0.10,
        _ => 0.05,
    }
}

fn combination_multiplier(techniques: &[&str]) -> f64 {
    let high_entropy_count = techniques.iter().filter(|t| HIGH_ENTROPY_TECHNIQUES.contains(t)).count();
    if high_entropy_count >= 2 {
        1.5
    } else if techniques.len() >= 4 {
        1.3
    } else if techniques.len() >= 2 {
        1.2
    } else {
        1.0
    }
}

pub struct FingerprintingDetector;

impl FingerprintingDetector {
    pub fn analyze(&self, techniques: &[&str]) -> BehaviorSignal {
        if techniques.is_empty() {
            return BehaviorSignal::benign("fingerprinting");
        }

        let base: f64 = techniques.iter().map(|t| base_score(t)).sum();
        let multiplier = combination_multiplier(techniques);
        let score = (base * multiplier).min(1.0);

        if score < 0.3 {
            return BehaviorSignal::benign("fingerprinting");
        }

        let label = if score >= AGGRESSIVE_THRESHOLD { "aggressive" } else { "moderate" };
        BehaviorSignal::new(
            "fingerprinting",
            score,
            format!("{label} fingerprinting via [{}] (x{multiplier:.1})", techniques.join(", ")),
        )
    }
}

impl Default for FingerprintingDetector {
    fn default() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_techniques_is_benign() {
        let detector = FingerprintingDetector;
        assert_eq!(detector.analyze(&[]).confidence, 0.0);
    }

    #[test]
    fn single_low_entropy_technique_stays_below_threshold() {
        let detector = FingerprintingDetector;
        let signal = detector.analyze(&["hardware_concurrency"]);
        assert!(signal.confidence < 0.3);
    }

    #[test]
    fn two_high_entropy_techniques_trigger_aggressive_multiplier() {
        let detector = FingerprintingDetector;
        let signal = detector.analyze(&["canvas", "webgl"]);
        assert!(signal.confidence >= AGGRESSIVE_THRESHOLD, "got {}", signal.confidence);
    }

    #[test]
    fn many_low_entropy_techniques_still_amplify() {
        let detector = FingerprintingDetector;
        let signal = detector.analyze(&["font_enumeration", "battery_status", "hardware_concurrency", "webrtc_local_ip"]);
        assert!(signal.confidence > 0.3);
    }
}
