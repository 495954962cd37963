/*

    Responsible for creating a struct that represents
    ranges from a to b and functionality to check if
    x is in range [a,b] or if two ranges overlap.

    Used for per-axis box tests (one interval per axis)
    and for the admissible parametric range of slab tests.

    See also associated constants of Interval class:
    - EMPTY: (inf, -inf)
    - UNIVERSE: (-inf, inf)

    @author: Bartu
    @date: Sept 2025

*/

use crate::numeric::{Float};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {

    pub const EMPTY: Self = Self {
        min: FloatConst::INF,
        max: FloatConst::NEG_INF,
    };

    pub const UNIVERSE: Self = Self {
        min: FloatConst::NEG_INF,
        max: FloatConst::INF,
    };

    pub fn new(min: Float, max: Float) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn validate(&self) -> bool {
        self.max >= self.min
    }

    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    /// True if `other` lies entirely within self (shared endpoints count).
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Closed-interval overlap, touching endpoints count as overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.max >= other.min && self.min <= other.max
    }

    pub fn expand(&mut self, x: Float) {
        if x < self.min { self.min = x; }
        if x > self.max { self.max = x; }
    }

    /// Shrink to the intersection with [min, max].
    pub fn shrink(&mut self, min: Float, max: Float) {
        if min > self.min { self.min = min; }
        if max < self.max { self.max = max; }
    }

}


pub trait FloatConst: Copy {
    const INF: Self;
    const NEG_INF: Self;
}

impl FloatConst for f32 {
    const INF: Self = f32::INFINITY;
    const NEG_INF: Self = f32::NEG_INFINITY;
}

impl FloatConst for f64 {
    const INF: Self = f64::INFINITY;
    const NEG_INF: Self = f64::NEG_INFINITY;
}
