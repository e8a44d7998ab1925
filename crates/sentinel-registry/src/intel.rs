//! Threat-intel ingestion: turns a pulse of externally-sourced indicators
//! into [`Ioc`] rows, and synthesizes a YARA rule stub for file-hash
//! indicators so the firewall's content scanner has something to match
//! against without hand-authoring rules per feed.
//!
//! Mirrors the original feed client's indicator-type mapping: each
//! indicator carries a loosely-typed `type` string from the upstream feed,
//! mapped onto the fixed internal [`IocType`] set.

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Ioc, IocType};
use crate::policy::PolicyStore;

/// One indicator as reported by an upstream feed, before normalization.
#[derive(Debug, Clone)]
pub struct RawIndicator {
    pub indicator_type: String,
    pub value: String,
}

/// A batch of indicators published together, e.g. one OTX-style pulse.
#[derive(Debug, Clone)]
pub struct Pulse {
    pub source: String,
    pub indicators: Vec<RawIndicator>,
}

fn map_indicator_type(raw: &str) -> Option<IocType> {
    match raw.to_ascii_lowercase().as_str() {
        "domain" | "hostname" => Some(IocType::Domain),
        "ipv4" | "ipv6" | "ip" => Some(IocType::IpAddress),
        "url" | "uri" => Some(IocType::Url),
        "filehash-sha256" | "sha256" => Some(IocType::FileHashSha256),
        "filehash-md5" | "md5" => Some(IocType::FileHashMd5),
        "email" => Some(IocType::Email),
        _ => None,
    }
}

/// Ingests a pulse into the policy store's IOC table. Indicators with an
/// unrecognized type are skipped rather than failing the whole pulse;
/// returns the count actually stored.
pub fn ingest_pulse(store: &PolicyStore, pulse: &Pulse, confidence: f64) -> Result<usize> {
    let mut stored = 0;
    let now = Utc::now();
    for indicator in &pulse.indicators {
        let Some(ioc_type) = map_indicator_type(&indicator.indicator_type) else {
            tracing::debug!(kind = %indicator.indicator_type, "skipping unrecognized indicator type");
            continue;
        };
        let ioc = Ioc {
            id: Uuid::new_v4().to_string(),
            ioc_type,
            value: indicator.value.clone(),
            source: pulse.source.clone(),
            confidence,
            first_seen: now,
            last_seen: now,
        };
        store.store_ioc(&ioc)?;
        stored += 1;
    }
    Ok(stored)
}

/// Produces a minimal YARA rule matching a single file-hash IOC. This is a
/// starting point for an analyst to refine, not a production rule; only
/// hash-equality conditions are generated.
pub fn synthesize_yara_rule(ioc: &Ioc) -> Option<String> {
    let condition = match ioc.ioc_type {
        IocType::FileHashSha256 => format!("hash.sha256(0, filesize) == \"{}\"", ioc.value.to_lowercase()),
        IocType::FileHashMd5 => format!("hash.md5(0, filesize) == \"{}\"", ioc.value.to_lowercase()),
        _ => return None,
    };
    let rule_name = format!("intel_{}", ioc.id.replace('-', "_"));
    Some(format!(
        "rule {rule_name} {{\n    meta:\n        source = \"{}\"\n    condition:\n        {condition}\n}}",
        ioc.source
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_type_mapped_to_none() {
        assert!(map_indicator_type("yara").is_none());
        assert_eq!(map_indicator_type("IPv4"), Some(IocType::IpAddress));
    }

    #[test]
    fn ingest_pulse_skips_unknown_types() {
        let store = PolicyStore::temporary().unwrap();
        let pulse = Pulse {
            source: "otx".into(),
            indicators: vec![
                RawIndicator { indicator_type: "domain".into(), value: "evil.example".into() },
                RawIndicator { indicator_type: "yara".into(), value: "n/a".into() },
            ],
        };
        let stored = ingest_pulse(&store, &pulse, 0.75).unwrap();
        assert_eq!(stored, 1);
        assert!(store.find_ioc("evil.example").unwrap().is_some());
    }

    #[test]
    fn yara_synthesis_only_for_file_hashes() {
        let now = Utc::now();
        let domain_ioc = Ioc {
            id: "a".into(),
            ioc_type: IocType::Domain,
            value: "evil.example".into(),
            source: "otx".into(),
            confidence: 0.5,
            first_seen: now,
            last_seen: now,
        };
        assert!(synthesize_yara_rule(&domain_ioc).is_none());

        let hash_ioc = Ioc {
            id: "b".into(),
            ioc_type: IocType::FileHashSha256,
            value: "ABCDEF".into(),
            source: "otx".into(),
            confidence: 0.9,
            first_seen: now,
            last_seen: now,
        };
        let rule = synthesize_yara_rule(&hash_ioc).unwrap();
        assert!(rule.contains("abcdef"));
        assert!(rule.starts_with("rule intel_b"));
    }
}
