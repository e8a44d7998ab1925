//! Quarantine ID grammar: `YYYYMMDD_HHMMSS_XXXXXX` (21 characters).
//!
//! The timestamp component keeps IDs sortable by quarantine time without a
//! secondary index; the hex suffix disambiguates files quarantined in the
//! same second. Example: `20251030_143052_a3f5c2`.

use chrono::Utc;
use rand::Rng;

use crate::error::{Result, VaultError};

pub fn generate_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::thread_rng().gen();
    format!("{timestamp}_{:06x}", random & 0xFF_FFFF)
}

/// Validates character-by-character rather than only by regex, matching the
/// position-by-position check this grammar is ported from: digits 0-7,
/// `_` at 8, digits 9-14, `_` at 15, hex digits 16-20, length 21.
pub fn validate_id(id: &str) -> Result<()> {
    let bytes = id.as_bytes();
    if bytes.len() != 21 {
        return Err(VaultError::InvalidId(id.to_string()));
    }

    for (i, &b) in bytes.iter().enumerate() {
        let ok = match i {
            0..=7 => b.is_ascii_digit(),
            8 => b == b'_',
            9..=14 => b.is_ascii_digit(),
            15 => b == b'_',
            _ => b.is_ascii_hexdigit() && !b.is_ascii_uppercase(),
        };
        if !ok {
            return Err(VaultError::InvalidId(id.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_validate() {
        for _ in 0..20 {
            let id = generate_id();
            assert!(validate_id(&id).is_ok(), "generated id {id} failed validation");
        }
    }

    #[test]
    fn accepts_a_literal_spec_id() {
        assert!(validate_id("20251030_143052_a3f5c2").is_ok());
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(validate_id("not-an-id").is_err());
        assert!(validate_id("2025103_143052_a3f5c2").is_err());
        assert!(validate_id("20251030-143052-a3f5c2").is_err());
        assert!(validate_id("20260101000000-ABCDEF01").is_err());
        assert!(validate_id("../../etc/passwd_______").is_err());
        assert!(validate_id("20251030_143052_A3F5C2").is_err());
    }
}
