//! Process-wide identity tags.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity shared by every error that comes from the same origin.
///
/// Tags are handed out by a single process-wide registry, start at 1, and
/// are never reused. An error without a tag is represented as
/// `Option<Tag>::None`.
///
/// # Examples
///
/// ```
/// use provenance_error::Tag;
///
/// let first = Tag::allocate();
/// let second = Tag::allocate();
/// assert_ne!(first, second);
/// assert!(second.get() > first.get());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{}", _0)]
pub struct Tag(NonZeroU64);

impl Tag {
    /// Allocate a fresh tag from the process-wide registry.
    pub fn allocate() -> Self {
        REGISTRY.allocate()
    }

    /// The raw tag value. Never zero.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Monotonic counter behind [`Tag::allocate`].
///
/// The counter holds the number of tags issued so far; the tag value is that
/// count plus one, so the first tag is 1.
struct TagRegistry {
    issued: AtomicU64,
}

impl TagRegistry {
    const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    fn allocate(&self) -> Tag {
        let issued = self.issued.fetch_add(1, Ordering::Relaxed);
        Tag(NonZeroU64::MIN.saturating_add(issued))
    }
}

static REGISTRY: TagRegistry = TagRegistry::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn fresh_registry_starts_at_one() {
        let registry = TagRegistry::new();
        assert_eq!(registry.allocate().get(), 1);
        assert_eq!(registry.allocate().get(), 2);
    }

    #[test]
    fn tags_increase_within_a_thread() {
        let a = Tag::allocate();
        let b = Tag::allocate();
        assert!(b > a);
    }

    #[test]
    fn concurrent_allocation_is_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..1000).map(|_| Tag::allocate()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for tag in handle.join().unwrap() {
                assert!(seen.insert(tag), "tag {} issued twice", tag);
            }
        }
        assert_eq!(seen.len(), 8000);
    }

    #[test]
    fn display() {
        let registry = TagRegistry::new();
        assert_eq!(registry.allocate().to_string(), "#1");
    }
}
