//! Domain Generation Algorithm (DGA) detection.
//!
//! Malware families that use DGA for command-and-control rendezvous
//! produce domain labels that look nothing like natural-language words:
//! high character entropy, a heavy consonant skew, and bigrams that rarely
//! occur in real languages. No single signal is reliable alone (short
//! real words can be consonant-heavy; random-looking subdomains are
//! common and benign); this analyzer combines all three before flagging.

use sentinel_firewall::perplexity::calculate_entropy;

use crate::signal::BehaviorSignal;

const ENTROPY_THRESHOLD: f64 = 3.5;
const CONSONANT_RATIO_THRESHOLD: f64 = 0.65;
const BIGRAM_RARITY_THRESHOLD: f64 = 0.6;

const ENTROPY_WEIGHT: f64 = 0.4;
const CONSONANT_WEIGHT: f64 = 0.3;
const BIGRAM_WEIGHT: f64 = 0.3;

/// Common English bigrams; a label built mostly from bigrams outside this
/// set reads as generated rather than typed.
const COMMON_BIGRAMS: &[&str] = &[
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or", "te", "of", "ed",
    "is", "it", "al", "ar", "st", "to", "nt", "ng", "se", "ha", "as", "ou", "io", "le", "ve", "co",
];

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn consonant_ratio(label: &str) -> f64 {
    let alpha: Vec<char> = label.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if alpha.is_empty() {
        return 0.0;
    }
    let consonants = alpha.iter().filter(|c| !is_vowel(**c)).count();
    consonants as f64 / alpha.len() as f64
}

fn bigram_rarity(label: &str) -> f64 {
    let lower = label.to_ascii_lowercase();
    let chars: Vec<char> = lower.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if chars.len() < 2 {
        return 0.0;
    }
    let mut rare = 0;
    let total = chars.len() - 1;
    for window in chars.windows(2) {
        let bigram: String = window.iter().collect();
        if !COMMON_BIGRAMS.contains(&bigram.as_str()) {
            rare += 1;
        }
    }
    rare as f64 / total as f64
}

/// Extracts the registrable label (second-level domain) from a fully
/// qualified domain name, e.g. `evil.example.com` -> `example`.
fn primary_label(domain: &str) -> &str {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2]
    } else {
        domain
    }
}

pub struct DgaAnalyzer;

impl DgaAnalyzer {
    pub fn analyze(&self, domain: &str) -> BehaviorSignal {
        let label = primary_label(domain);
        if label.len() < 4 {
            return BehaviorSignal::benign("dga");
        }

        let entropy = calculate_entropy(label);
        let entropy_score = (entropy / ENTROPY_THRESHOLD).min(1.5) / 1.5;
        let consonant_score = (consonant_ratio(label) / CONSONANT_RATIO_THRESHOLD).min(1.5) / 1.5;
        let bigram_score = (bigram_rarity(label) / BIGRAM_RARITY_THRESHOLD).min(1.5) / 1.5;

        let composite = entropy_score * ENTROPY_WEIGHT
            + consonant_score * CONSONANT_WEIGHT
            + bigram_score * BIGRAM_WEIGHT;

        if composite < 0.5 {
            BehaviorSignal::benign("dga")
        } else {
            BehaviorSignal::new(
                "dga",
                composite,
                format!("label '{label}' scores {composite:.2} on entropy/consonant/bigram heuristics"),
            )
        }
    }
}

impl Default for DgaAnalyzer {
    fn default() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_word_domain_is_benign() {
        let analyzer = DgaAnalyzer;
        let signal = analyzer.analyze("mail.example.com");
        assert!(signal.confidence < 0.5);
    }

    #[test]
    fn random_looking_label_flags_high() {
        let analyzer = DgaAnalyzer;
        let signal = analyzer.analyze("xqzvpbfjktr.net");
        assert!(signal.confidence > 0.5, "expected high confidence, got {}", signal.confidence);
    }

    #[test]
    fn short_labels_are_ignored() {
        let analyzer = DgaAnalyzer;
        let signal = analyzer.analyze("a.io");
        assert_eq!(signal.confidence, 0.0);
    }

    #[test]
    fn primary_label_extracts_second_level_domain() {
        assert_eq!(primary_label("evil.example.com"), "example");
        assert_eq!(primary_label("localhost"), "localhost");
    }
}
