//! Resource algebra: the fixed-arity CPU/memory/ephemeral vector shared by
//! pods, nodes and metrics snapshots.

use std::ops::{Add, Sub};

/// A non-negative CPU/memory/ephemeral-storage vector.
///
/// `milli_cpu` is CPU measured in millicores, `memory_bytes` and
/// `ephemeral_bytes` are measured in bytes. All operations saturate at zero
/// rather than panic or wrap; going negative would indicate a programmer
/// error upstream (overcommitting an already-empty node), and simulating
/// that as zero keeps the invariant checks simple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ResourceVector {
    pub milli_cpu: u64,
    pub memory_bytes: u64,
    pub ephemeral_bytes: u64,
}

impl ResourceVector {
    pub const ZERO: ResourceVector = ResourceVector {
        milli_cpu: 0,
        memory_bytes: 0,
        ephemeral_bytes: 0,
    };

    pub fn new(milli_cpu: u64, memory_bytes: u64) -> Self {
        Self {
            milli_cpu,
            memory_bytes,
            ephemeral_bytes: 0,
        }
    }

    /// Elementwise `self <= other * factor`, i.e. whether `self` fits inside
    /// `other` scaled by `factor` (used for the oversub-aware fit check,
    /// where `factor` is the node's current oversub factor).
    pub fn fits_within_scaled(&self, other: &ResourceVector, factor: f64) -> bool {
        (self.milli_cpu as f64) <= other.milli_cpu as f64 * factor
            && (self.memory_bytes as f64) <= other.memory_bytes as f64 * factor
            && (self.ephemeral_bytes as f64) <= other.ephemeral_bytes as f64 * factor
    }

    pub fn fits_within(&self, other: &ResourceVector) -> bool {
        self.fits_within_scaled(other, 1.0)
    }

    pub fn scale(&self, factor: f64) -> ResourceVector {
        ResourceVector {
            milli_cpu: (self.milli_cpu as f64 * factor).max(0.0) as u64,
            memory_bytes: (self.memory_bytes as f64 * factor).max(0.0) as u64,
            ephemeral_bytes: (self.ephemeral_bytes as f64 * factor).max(0.0) as u64,
        }
    }

    /// Fraction of `self` that `part` occupies along each axis, averaged.
    /// Axes where `self` is zero are skipped rather than treated as 0/0.
    pub fn average_utilization(&self, part: &ResourceVector) -> f64 {
        let mut total = 0.0;
        let mut count = 0u32;
        for (num, den) in [
            (part.milli_cpu, self.milli_cpu),
            (part.memory_bytes, self.memory_bytes),
            (part.ephemeral_bytes, self.ephemeral_bytes),
        ] {
            if den > 0 {
                total += num as f64 / den as f64;
                count += 1;
            }
        }
        if count == 0 { 0.0 } else { total / count as f64 }
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;
    fn add(self, rhs: ResourceVector) -> ResourceVector {
        ResourceVector {
            milli_cpu: self.milli_cpu + rhs.milli_cpu,
            memory_bytes: self.memory_bytes + rhs.memory_bytes,
            ephemeral_bytes: self.ephemeral_bytes + rhs.ephemeral_bytes,
        }
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;
    /// Saturating subtraction per §3: "subtract (saturating at zero)".
    fn sub(self, rhs: ResourceVector) -> ResourceVector {
        ResourceVector {
            milli_cpu: self.milli_cpu.saturating_sub(rhs.milli_cpu),
            memory_bytes: self.memory_bytes.saturating_sub(rhs.memory_bytes),
            ephemeral_bytes: self.ephemeral_bytes.saturating_sub(rhs.ephemeral_bytes),
        }
    }
}
