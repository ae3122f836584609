//! Typed parameter pools for request generation.
//!
//! Every parameter slot an operation can reference declares its value domain
//! explicitly: either a finite set of candidate strings or an integer range.
//! Draws are uniform and independent per call; the pool itself is read-only
//! reference data shared across all user streams.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

/// The value domain of a single parameter slot.
#[derive(Debug, Clone)]
pub enum ValueDomain {
    /// Uniform choice among a fixed set of candidates
    OneOf(&'static [&'static str]),
    /// Uniform random integer in an inclusive range
    IntRange(i64, i64),
}

impl ValueDomain {
    pub fn draw(&self, rng: &mut impl Rng) -> String {
        match self {
            ValueDomain::OneOf(candidates) => candidates
                .choose(rng)
                .map(|s| (*s).to_string())
                .unwrap_or_default(),
            ValueDomain::IntRange(lo, hi) => rng.gen_range(*lo..=*hi).to_string(),
        }
    }
}

/// Named parameter slots, keyed by the slot names operations reference.
#[derive(Debug, Clone, Default)]
pub struct ParamPool {
    slots: HashMap<&'static str, ValueDomain>,
}

impl ParamPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, name: &'static str, domain: ValueDomain) -> Self {
        self.slots.insert(name, domain);
        self
    }

    /// Draw a value for a slot, or `None` if the slot is not declared.
    pub fn draw(&self, name: &str, rng: &mut impl Rng) -> Option<String> {
        self.slots.get(name).map(|domain| domain.draw(rng))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }
}
