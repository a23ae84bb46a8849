//! Identity types for LOCKET
//!
//! Actors and channels are transport-level identities; content ids are
//! generated locally at commit time and are the only addressing scheme
//! for stored content.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Actor identity - a remote user of the system, privileged or ordinary
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl ActorId {
    #[inline]
    pub fn new(id: i64) -> Self {
        ActorId(id)
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel identity - the community whose membership gates content access
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(handle: impl Into<String>) -> Self {
        ChannelId(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Handle without the leading `@`, for building join links.
    pub fn bare(&self) -> &str {
        self.0.strip_prefix('@').unwrap_or(&self.0)
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content identity - opaque, unique, generated at commit time
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        ContentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Content({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        ContentId(s.to_string())
    }
}

/// Content id generator
///
/// Ids are a hex unix-seconds prefix plus a process-local monotonic counter
/// seeded from a random offset, so concurrent commits within the same
/// second still produce distinct ids.
pub struct ContentIdGenerator {
    counter: AtomicU64,
}

impl ContentIdGenerator {
    pub fn new() -> Self {
        ContentIdGenerator {
            counter: AtomicU64::new(rand::random::<u16>() as u64),
        }
    }

    /// Generate a fresh, never-reused content id.
    pub fn next(&self) -> ContentId {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        ContentId(format!("{secs:x}{:04x}", seq & 0xFFFF))
    }
}

impl Default for ContentIdGenerator {
    fn default() -> Self {
        ContentIdGenerator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_channel_bare_strips_at() {
        assert_eq!(ChannelId::new("@movies").bare(), "movies");
        assert_eq!(ChannelId::new("movies").bare(), "movies");
    }

    #[test]
    fn test_generator_unique_under_burst() {
        let gen = ContentIdGenerator::new();
        let ids: HashSet<_> = (0..1000).map(|_| gen.next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generator_unique_across_threads() {
        let gen = std::sync::Arc::new(ContentIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = gen.clone();
                std::thread::spawn(move || (0..250).map(|_| gen.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(all.insert(id), "duplicate id under concurrent commits");
            }
        }
        assert_eq!(all.len(), 1000);
    }

    proptest! {
        #[test]
        fn prop_ids_are_url_safe(n in 0u32..64) {
            let gen = ContentIdGenerator::new();
            for _ in 0..=n {
                let id = gen.next();
                prop_assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }
}
