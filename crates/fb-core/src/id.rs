use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for component IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Name of the reserved id that addresses the tree's top-level list.
pub const ROOT_ID: &str = "root";

/// A lightweight, interned identifier for components in the form tree.
/// Internally a 4-byte `Spur` index, so copies and comparisons are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(Spur);

impl ComponentId {
    /// Intern a new string as a ComponentId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ComponentId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The reserved id of the top-level list. Never carried by a node.
    pub fn root() -> Self {
        Self::intern(ROOT_ID)
    }

    pub fn is_root(&self) -> bool {
        *self == Self::root()
    }

    /// Generate a unique ID with a type prefix (e.g. `row_1`, `input_2`).
    ///
    /// Uniqueness is process-wide, not per tree: a tree loaded from elsewhere
    /// may already hold the same name, so mutators re-check before use.
    pub fn with_prefix(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl Serialize for ComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ComponentId::intern(&s))
    }
}

// ─── Id generation ───────────────────────────────────────────────────────

/// Source of fresh ids for synthesized nodes (new rows, palette drops).
pub trait IdGenerator {
    fn next_id(&mut self, prefix: &str) -> ComponentId;
}

/// Process-wide generator backed by [`ComponentId::with_prefix`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoIds;

impl IdGenerator for AutoIds {
    fn next_id(&mut self, prefix: &str) -> ComponentId {
        ComponentId::with_prefix(prefix)
    }
}

/// Deterministic per-instance counter: `row_1`, `row_2`, `input_3`, ...
///
/// Useful when ids must be reproducible (tests, recorded gestures).
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `n` (the first id ends in `n + 1`).
    pub fn starting_after(n: u64) -> Self {
        Self { next: n }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> ComponentId {
        self.next += 1;
        ComponentId::intern(&format!("{prefix}_{}", self.next))
    }
}
