//! Per-run counters

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters for one lowering run. Built per owning type and summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoweringStats {
    pub types: usize,
    pub fields: usize,
    pub methods: usize,
    pub overloads: usize,
    pub forwarding: usize,
    pub skipped_methods: usize,
    pub collisions: usize,
    pub unsupported: usize,
}

impl AddAssign for LoweringStats {
    fn add_assign(&mut self, other: Self) {
        self.types += other.types;
        self.fields += other.fields;
        self.methods += other.methods;
        self.overloads += other.overloads;
        self.forwarding += other.forwarding;
        self.skipped_methods += other.skipped_methods;
        self.collisions += other.collisions;
        self.unsupported += other.unsupported;
    }
}
