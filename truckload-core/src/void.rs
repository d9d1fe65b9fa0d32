//! Void manager (component C, spec.md §4.C).
//!
//! Maintains an unordered collection of empty axis-aligned cuboids
//! ("voids"). The list is a *cover*, not a partition: voids may overlap
//! each other, and the validator (not this module) has final authority on
//! whether a candidate placement is legal.

use serde::{Deserialize, Serialize};

use crate::geometry::{intersection_volume, Extents, Vec3};
use crate::truckbox::{PlacedBox, TruckDimensions};

/// Disjoint from [`crate::truckbox::BoxId`] per spec.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoidId(pub u64);

/// An empty axis-aligned cuboid inside the truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Void {
    pub id: VoidId,
    /// Lower corner (not center, unlike placed boxes -- matches spec.md §3's
    /// description of `Void`).
    pub lower: Vec3,
    pub extents: Vec3,
}

impl Void {
    pub fn new(id: VoidId, lower: Vec3, extents: Vec3) -> Self {
        Self { id, lower, extents }
    }

    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.extents.x * self.extents.y * self.extents.z
    }

    #[inline(always)]
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.lower.x + self.extents.x / 2.0,
            self.lower.y + self.extents.y / 2.0,
            self.lower.z + self.extents.z / 2.0,
        )
    }
}

impl Extents for Void {
    #[inline(always)]
    fn center(&self) -> Vec3 {
        Void::center(self)
    }

    #[inline(always)]
    fn size(&self) -> Vec3 {
        self.extents
    }
}

/// Monotonically increasing void-id source, private to one `optimize` call.
#[derive(Debug, Default)]
pub struct VoidIdGen(u64);

impl VoidIdGen {
    pub fn next(&mut self) -> VoidId {
        let id = self.0;
        self.0 += 1;
        VoidId(id)
    }
}

/// The single void covering the whole truck interior.
pub fn initial(truck: &TruckDimensions, ids: &mut VoidIdGen) -> Vec<Void> {
    vec![Void::new(
        ids.next(),
        Vec3::new(-truck.width / 2.0, 0.0, -truck.length / 2.0),
        Vec3::new(truck.width, truck.height, truck.length),
    )]
}

/// Splits `occupied_void` around `placed`, producing up to six new voids
/// corresponding to the six slabs of the original void not occupied by the
/// box (+-x, +-y, +-z). Each slab spans the full extent of the original
/// void in the other two axes ("loose" split, spec.md §4.C's mandated
/// strategy: it intentionally allows void overlap in exchange for
/// completeness). Slabs thinner than `epsilon` are discarded.
pub fn place(occupied_void: &Void, placed: &PlacedBox, epsilon: f64, ids: &mut VoidIdGen) -> Vec<Void> {
    let v_min = occupied_void.lower;
    let v_max = Vec3::new(
        v_min.x + occupied_void.extents.x,
        v_min.y + occupied_void.extents.y,
        v_min.z + occupied_void.extents.z,
    );
    let b_min = placed.min_corner();
    let b_max = placed.max_corner();

    let mut res = Vec::with_capacity(6);
    let mut push_if_thick = |lower: Vec3, extents: Vec3| {
        if extents.x > epsilon && extents.y > epsilon && extents.z > epsilon {
            res.push(Void::new(ids.next(), lower, extents));
        }
    };

    // -x slab: from v_min.x to b_min.x
    push_if_thick(
        Vec3::new(v_min.x, v_min.y, v_min.z),
        Vec3::new(b_min.x - v_min.x, occupied_void.extents.y, occupied_void.extents.z),
    );
    // +x slab: from b_max.x to v_max.x
    push_if_thick(
        Vec3::new(b_max.x, v_min.y, v_min.z),
        Vec3::new(v_max.x - b_max.x, occupied_void.extents.y, occupied_void.extents.z),
    );
    // -y slab (below the box)
    push_if_thick(
        Vec3::new(v_min.x, v_min.y, v_min.z),
        Vec3::new(occupied_void.extents.x, b_min.y - v_min.y, occupied_void.extents.z),
    );
    // +y slab (above the box)
    push_if_thick(
        Vec3::new(v_min.x, b_max.y, v_min.z),
        Vec3::new(occupied_void.extents.x, v_max.y - b_max.y, occupied_void.extents.z),
    );
    // -z slab
    push_if_thick(
        Vec3::new(v_min.x, v_min.y, v_min.z),
        Vec3::new(occupied_void.extents.x, occupied_void.extents.y, b_min.z - v_min.z),
    );
    // +z slab
    push_if_thick(
        Vec3::new(v_min.x, v_min.y, b_max.z),
        Vec3::new(occupied_void.extents.x, occupied_void.extents.y, v_max.z - b_max.z),
    );

    res
}

/// Removes voids whose every dimension is below `epsilon`, then removes any
/// void whose overlap volume with any placed box exceeds 80% of the void's
/// own volume. Survivors are sorted primarily by ascending `y` (prefer
/// lower), secondarily by ascending volume (prefer tighter), and the
/// retained count is capped at `max_voids`.
pub fn prune(mut voids: Vec<Void>, placed: &[PlacedBox], epsilon: f64, max_voids: usize) -> Vec<Void> {
    voids.retain(|v| v.extents.x > epsilon || v.extents.y > epsilon || v.extents.z > epsilon);

    voids.retain(|v| {
        let vol = v.volume();
        if vol <= 0.0 {
            return false;
        }
        !placed
            .iter()
            .any(|b| intersection_volume(v, b) > 0.8 * vol)
    });

    voids.sort_by(|a, b| {
        a.center()
            .y
            .partial_cmp(&b.center().y)
            .unwrap()
            .then(a.volume().partial_cmp(&b.volume()).unwrap())
            .then(a.id.0.cmp(&b.id.0))
    });

    voids.truncate(max_voids);
    voids
}
