#![forbid(unsafe_code)]

//! Attempt path accumulation and the registered secret.
//!
//! [`AttemptPath`] is the ordered, duplicate-free walk traced by the current
//! gesture. [`Pattern`] is the validated secret an attempt is compared
//! against.
//!
//! # Invariants
//!
//! 1. The path never contains a duplicate index.
//! 2. Every consecutive pair satisfies [`is_adjacent_or_skip`]; a straight
//!    two-step jump has its midpoint auto-inserted first when still free.
//! 3. Rejected candidates leave the path untouched.
//! 4. Only [`AttemptPath::begin_at`] seeds a walk; extending an empty path
//!    is always rejected.

use std::fmt;

use crate::geometry::{GRID_NODES, is_adjacent_or_skip, skip_midpoint};

// ---------------------------------------------------------------------------
// AttemptPath
// ---------------------------------------------------------------------------

/// The ordered node sequence accumulated by one gesture.
#[derive(Debug, Clone, Default)]
pub struct AttemptPath {
    nodes: Vec<u8>,
}

impl AttemptPath {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(GRID_NODES),
        }
    }

    /// Clear the path and seed it with the gesture's starting node.
    pub fn begin_at(&mut self, index: u8) {
        self.nodes.clear();
        self.nodes.push(index);
    }

    /// Try to extend the path with `candidate`.
    ///
    /// Rejects candidates on an unseeded path (only [`begin_at`](Self::begin_at)
    /// starts a walk), candidates already in the path, and candidates that
    /// are not a legal step from the current tail. For an accepted straight
    /// two-step jump whose midpoint node is still free, the midpoint is
    /// appended first.
    ///
    /// Returns the newly appended indices in order (empty when rejected,
    /// otherwise one or two nodes).
    pub fn try_extend(&mut self, candidate: u8) -> Vec<u8> {
        let mut appended = Vec::with_capacity(2);

        if self.contains(candidate) {
            return appended;
        }

        let Some(&tail) = self.nodes.last() else {
            return appended;
        };

        if !is_adjacent_or_skip(tail, candidate) {
            return appended;
        }

        if let Some(mid) = skip_midpoint(tail, candidate)
            && !self.contains(mid)
        {
            self.nodes.push(mid);
            appended.push(mid);
        }

        self.nodes.push(candidate);
        appended.push(candidate);
        appended
    }

    /// The traced indices in order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.nodes
    }

    /// Number of nodes in the path.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `index` is already part of the path.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: u8) -> bool {
        self.nodes.contains(&index)
    }

    /// The current tail node, if any.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.nodes.last().copied()
    }

    /// Discard all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

// ---------------------------------------------------------------------------
// Pattern (registered secret)
// ---------------------------------------------------------------------------

/// A validated registered secret: ordered node indices, `0..9`, no
/// duplicates, non-empty.
///
/// Owned by the calling application; the engine only ever reads it.
/// Persistence between runs is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    nodes: Vec<u8>,
}

impl Pattern {
    /// Validate and construct a pattern.
    pub fn new(nodes: Vec<u8>) -> Result<Self, PatternError> {
        if nodes.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut seen = [false; GRID_NODES];
        for &index in &nodes {
            if usize::from(index) >= GRID_NODES {
                return Err(PatternError::IndexOutOfRange { index });
            }
            if seen[usize::from(index)] {
                return Err(PatternError::DuplicateNode { index });
            }
            seen[usize::from(index)] = true;
        }
        Ok(Self { nodes })
    }

    /// The secret's indices in order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.nodes
    }

    /// Number of nodes in the secret.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; construction rejects empty patterns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl TryFrom<Vec<u8>> for Pattern {
    type Error = PatternError;

    fn try_from(nodes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nodes = Vec::<u8>::deserialize(deserializer)?;
        Self::new(nodes).map_err(serde::de::Error::custom)
    }
}

/// Validation failures when constructing a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// The sequence was empty.
    Empty,
    /// An index was outside `0..9`.
    IndexOutOfRange { index: u8 },
    /// An index appeared more than once.
    DuplicateNode { index: u8 },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "pattern must contain at least one node"),
            Self::IndexOutOfRange { index } => {
                write!(f, "node index {index} is outside the 3x3 grid")
            }
            Self::DuplicateNode { index } => {
                write!(f, "node index {index} appears more than once")
            }
        }
    }
}

impl std::error::Error for PatternError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
