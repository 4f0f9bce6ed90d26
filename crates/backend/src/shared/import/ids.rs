//! Identifier assignment: ULID tokens (26 chars, Crockford base32,
//! millisecond timestamp prefix followed by 80 random bits).

use ulid::Ulid;

use super::decoder::DecodedRow;
use super::entity::{ImportEntity, KeyPolicy};
use super::error::ImportError;

pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Token must parse and re-encode to itself (case-insensitive)
pub fn is_well_formed(value: &str) -> bool {
    match Ulid::from_string(value) {
        Ok(parsed) => parsed.to_string().eq_ignore_ascii_case(value),
        Err(_) => false,
    }
}

/// Fills blank keys with fresh identifiers and checks the shape of the
/// supplied ones. Returns positions (in `rows`) of the rows that received a
/// new identifier.
pub fn assign_missing<E: ImportEntity>(
    rows: &mut [DecodedRow<E>],
) -> Result<Vec<usize>, ImportError> {
    if E::KEY_POLICY != KeyPolicy::Generated {
        return Ok(Vec::new());
    }

    let mut assigned = Vec::new();
    for (pos, row) in rows.iter_mut().enumerate() {
        let line = row.line;
        let Some(key) = row.record.key_slot() else {
            continue;
        };

        let trimmed = key.trim();
        if trimmed.is_empty() {
            *key = new_id();
            assigned.push(pos);
            continue;
        }

        if !is_well_formed(trimmed) {
            tracing::warn!(
                entity = E::LABEL,
                row = line,
                value = %trimmed,
                "Rejected malformed identifier"
            );
            return Err(ImportError::MalformedIdentifier {
                row: line,
                value: trimmed.to_string(),
            });
        }
        if trimmed.len() != key.len() {
            *key = trimmed.to_string();
        }
    }
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 26);
        assert!(is_well_formed(&id));
    }

    #[test]
    fn test_new_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_sort_by_creation_time() {
        let first = new_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_id();
        assert!(first < second);
    }

    #[test]
    fn test_malformed_ids() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not-a-ulid"));
        assert!(!is_well_formed("01ARZ3NDEKTSV4RRFFQ69G5FA")); // 25 chars
        assert!(!is_well_formed("81ARZ3NDEKTSV4RRFFQ69G5FAV")); // overflow
        assert!(is_well_formed("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(is_well_formed("01arz3ndektsv4rrffq69g5fav"));
    }
}
