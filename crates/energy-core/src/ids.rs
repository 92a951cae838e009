//! Identifier generation for records created on this side of the wire.
//!
//! Callers pass a generator into every constructor that needs fresh ids,
//! so tests can use a deterministic sequence.

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator: Send {
    /// Next id, optionally namespaced with `prefix` (e.g. `"doc"`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = Uuid::new_v4();
        if prefix.is_empty() {
            id.to_string()
        } else {
            format!("{prefix}-{id}")
        }
    }
}

/// Monotonic counter, for tests and offline demos.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(seed: u64) -> Self {
        Self { next: seed }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let n = self.next;
        self.next = self.next.saturating_add(1);
        if prefix.is_empty() {
            n.to_string()
        } else {
            format!("{prefix}-{n}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_deterministic() {
        let mut a = SequentialIds::starting_at(100);
        let mut b = SequentialIds::starting_at(100);
        assert_eq!(a.next_id("doc"), "doc-100");
        assert_eq!(a.next_id(""), "101");
        assert_eq!(b.next_id("doc"), "doc-100");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut g = UuidIds;
        let a = g.next_id("");
        let b = g.next_id("");
        assert_ne!(a, b);
        assert!(g.next_id("evt").starts_with("evt-"));
    }
}
