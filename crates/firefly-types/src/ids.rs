//! Firefly identity.
//!
//! Fireflies are identified by dense integers assigned at spawn: fly `i`
//! owns row `i` of the visibility matrix and slot `i` of the light-state
//! array. The newtype keeps those indices from mixing with tick counters
//! and grid coordinates at compile time.

use serde::{Deserialize, Serialize};

/// Identity of one firefly, stable for the duration of a run.
///
/// The wrapped value is the fly's index into every shared per-fly
/// structure (light-state array, visibility matrix rows, fire-time board).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FlyId(pub usize);

impl FlyId {
    /// Create an identifier from a dense index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the wrapped index.
    pub const fn into_inner(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for FlyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for FlyId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<FlyId> for usize {
    fn from(id: FlyId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_index() {
        assert_eq!(FlyId::new(7).to_string(), "7");
    }

    #[test]
    fn ids_order_by_index() {
        assert!(FlyId::new(3) < FlyId::new(12));
    }
}
