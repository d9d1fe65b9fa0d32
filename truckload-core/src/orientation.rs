//! Orientation enumerator (component B).
//!
//! Enumerates the distinct axis-permuted orientations of a box's
//! `(width, height, length)` extents, collapsing duplicates that arise
//! when two or three extents are equal.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// One of the six axis permutations assigning `(width, height, length)` to
/// world `(x, y, z)`. Labeled for round-trip identification (spec.md §4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// width->x, height->y, length->z (identity)
    Xy,
    /// width->x, height->z, length->y
    Xz,
    /// width->y, height->z, length->x
    Yz,
    /// width->y, height->x, length->z
    Yx,
    /// width->z, height->x, length->y
    Zx,
    /// width->z, height->y, length->x
    Zy,
}

impl Orientation {
    /// All six labels, in a stable, fixed order.
    pub const ALL: [Orientation; 6] = [
        Orientation::Xy,
        Orientation::Xz,
        Orientation::Yz,
        Orientation::Yx,
        Orientation::Zx,
        Orientation::Zy,
    ];

    /// Applies this orientation to the box's `(width, height, length)`,
    /// returning effective `(x, y, z)` extents.
    #[inline(always)]
    pub fn apply(&self, width: f64, height: f64, length: f64) -> Vec3 {
        match self {
            Orientation::Xy => Vec3::new(width, height, length),
            Orientation::Xz => Vec3::new(width, length, height),
            Orientation::Yz => Vec3::new(height, length, width),
            Orientation::Yx => Vec3::new(height, width, length),
            Orientation::Zx => Vec3::new(length, width, height),
            Orientation::Zy => Vec3::new(length, height, width),
        }
    }

    /// Inverts `apply`: given effective `(x, y, z)` extents produced by this
    /// orientation, recovers the original `(width, height, length)`. Used by
    /// the round-trip property test (spec.md §8, property 9).
    #[inline(always)]
    pub fn invert(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match self {
            Orientation::Xy => (x, y, z),
            Orientation::Xz => (x, z, y),
            Orientation::Yz => (z, x, y),
            Orientation::Yx => (y, x, z),
            Orientation::Zx => (y, z, x),
            Orientation::Zy => (z, y, x),
        }
    }
}

/// Produces the set of distinct orientations for a box with extents
/// `(w, h, l)`. Never empty: at minimum the identity orientation is
/// returned. Duplicate effective extents (arising from equal dimensions)
/// are collapsed by canonicalizing the sorted triple.
pub fn enumerate_orientations(width: f64, height: f64, length: f64) -> Vec<Orientation> {
    let mut seen: Vec<(u64, u64, u64)> = Vec::with_capacity(6);
    let mut res = Vec::with_capacity(6);

    for o in Orientation::ALL {
        let v = o.apply(width, height, length);
        let key = (quantize(v.x), quantize(v.y), quantize(v.z));
        if !seen.contains(&key) {
            seen.push(key);
            res.push(o);
        }
    }

    debug_assert!(!res.is_empty(), "orientation enumeration must never be empty");
    res
}

/// Quantizes a float to a stable integer key for deduplication. Avoids
/// comparing floats for exact equality while still collapsing values that
/// differ only by floating-point noise.
#[inline(always)]
fn quantize(v: f64) -> u64 {
    (v * 1e6).round() as u64
}
