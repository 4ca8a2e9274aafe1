//! The shared light-state array for the uniform-visibility model.
//!
//! One boolean slot per fly. Each slot is written only by its owning
//! actor and read by every other actor and the coordinator; atomics make
//! the single-slot ownership discipline lock-free.

use std::sync::atomic::{AtomicBool, Ordering};

/// N light flags, slot `i` owned for writes by actor `i`.
#[derive(Debug)]
pub struct LightField {
    slots: Vec<AtomicBool>,
}

impl LightField {
    /// Create a field of `size` unlit flies.
    pub fn new(size: usize) -> Self {
        let slots = (0..size).map(|_| AtomicBool::new(false)).collect();
        Self { slots }
    }

    /// Publish fly `fly`'s light state. Writes to foreign or out-of-range
    /// slots are ignored; only the owning actor should call this.
    pub fn set(&self, fly: usize, lit: bool) {
        if let Some(slot) = self.slots.get(fly) {
            slot.store(lit, Ordering::Release);
        }
    }

    /// Read fly `fly`'s current light state; out-of-range reads are unlit.
    pub fn get(&self, fly: usize) -> bool {
        self.slots
            .get(fly)
            .is_some_and(|slot| slot.load(Ordering::Acquire))
    }

    /// Copy all light states, indexed by fly id.
    pub fn snapshot(&self) -> Vec<bool> {
        self.slots
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .collect()
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the field has no slots.
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
