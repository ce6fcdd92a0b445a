//! Identifier allocation
//!
//! One allocator per run. Relative identifiers start at 1000 (values below
//! are reserved for well-known principals) and are handed out in creation
//! order, strictly increasing, never reused. Cloud object identifiers are
//! 128-bit values drawn from the run RNG so that a fixed seed reproduces
//! them exactly.

use rand::rngs::StdRng;
use rand::Rng;
use uuid::Builder;

/// First relative identifier available to generated principals.
pub const FIRST_GENERATED_RID: u64 = 1000;

/// Issues unique RIDs for one generation run.
#[derive(Debug)]
pub struct IdAllocator {
    next_rid: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next_rid: FIRST_GENERATED_RID,
        }
    }

    /// Next relative identifier, strictly increasing. Counter exhaustion is
    /// unreachable in practice and treated as fatal.
    pub fn next_rid(&mut self) -> u64 {
        let rid = self.next_rid;
        self.next_rid = self
            .next_rid
            .checked_add(1)
            .unwrap_or_else(|| panic!("relative identifier counter overflow"));
        rid
    }

    /// How many RIDs have been issued so far.
    pub fn issued(&self) -> u64 {
        self.next_rid - FIRST_GENERATED_RID
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose a SID string from the domain base SID and a relative identifier.
pub fn sid(base_sid: &str, rid: u64) -> String {
    format!("{}-{}", base_sid, rid)
}

/// Object identifier of a builtin (domain-local well-known) group, which is
/// qualified by domain name rather than by the domain SID.
pub fn builtin_sid(domain: &str, rid: u64) -> String {
    format!("{}-S-1-5-32-{}", domain, rid)
}

/// A fresh opaque 128-bit object identifier, uppercase UUID format.
///
/// Built from RNG bytes rather than OS entropy so identical seeds produce
/// identical identifiers.
pub fn new_object_id(rng: &mut StdRng) -> String {
    let bytes: [u8; 16] = rng.gen();
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rids_start_at_1000_and_increase() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_rid(), 1000);
        assert_eq!(ids.next_rid(), 1001);
        assert_eq!(ids.next_rid(), 1002);
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_sid_composition() {
        let base = "S-1-5-21-883232822-274137685-4173207997";
        assert_eq!(
            sid(base, 1000),
            "S-1-5-21-883232822-274137685-4173207997-1000"
        );
        assert_eq!(
            builtin_sid("TESTLAB.LOCAL", 544),
            "TESTLAB.LOCAL-S-1-5-32-544"
        );
    }

    #[test]
    fn test_object_ids_are_seed_deterministic() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let ids_a: Vec<String> = (0..5).map(|_| new_object_id(&mut a)).collect();
        let ids_b: Vec<String> = (0..5).map(|_| new_object_id(&mut b)).collect();
        assert_eq!(ids_a, ids_b);

        // format check
        for id in &ids_a {
            assert_eq!(id.len(), 36);
            assert_eq!(id, &id.to_uppercase());
        }
        // distinct within a run
        let unique: std::collections::HashSet<&String> = ids_a.iter().collect();
        assert_eq!(unique.len(), ids_a.len());
    }
}
