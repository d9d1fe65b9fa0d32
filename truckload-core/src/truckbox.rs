//! The data model (spec.md §3): boxes, the truck, and their attributes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Extents, Vec3};
use crate::orientation::Orientation;

/// Unique, cheaply-cloneable box identity. Disjoint from [`crate::void::VoidId`]
/// per spec.md §9's "overloaded id" re-architecture note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxId(pub Arc<str>);

impl BoxId {
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for BoxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The truck's interior dimensions. The truck occupies the AABB
/// `[-width/2, +width/2] x [0, height] x [-length/2, +length/2]`: floor at
/// `y = 0`, rear loading door at `+length/2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckDimensions {
    pub width: f64,
    pub height: f64,
    pub length: f64,
}

impl TruckDimensions {
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        Self { width, height, length }
    }

    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.length
    }

    #[inline(always)]
    pub fn back_z(&self) -> f64 {
        self.length / 2.0
    }

    /// The AABB occupied by the truck's interior, as an `Extents` value
    /// usable by the shared geometry primitives.
    pub fn as_aabb(&self) -> crate::geometry::Aabb {
        crate::geometry::Aabb::new(
            Vec3::new(0.0, self.height / 2.0, 0.0),
            Vec3::new(self.width, self.height, self.length),
        )
    }
}

/// A box's required temperature zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureZone {
    Regular,
    Cold,
    Frozen,
}

/// A box's delivery stop. Ordinal: `Stop1` is unloaded first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Destination {
    Stop1,
    Stop2,
    Stop3,
    Stop4,
}

impl Destination {
    /// `rank(destination) = 0..3` with `Stop4 = 0`, `Stop1 = 3` (spec.md §4.F, §4.J).
    #[inline(always)]
    pub fn rank(&self) -> u8 {
        match self {
            Destination::Stop4 => 0,
            Destination::Stop3 => 1,
            Destination::Stop2 => 2,
            Destination::Stop1 => 3,
        }
    }
}

/// The unit of placement. Immutable: `optimize` never mutates a `Box` in
/// place (spec.md §9), it returns new records with `position`/`orientation`
/// filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Box {
    pub id: BoxId,
    /// Pre-rotation extent along x.
    pub width: f64,
    /// Pre-rotation extent along y.
    pub height: f64,
    /// Pre-rotation extent along z.
    pub length: f64,
    pub weight: f64,
    pub temperature_zone: TemperatureZone,
    pub is_fragile: bool,
    pub destination: Destination,
}

impl Box {
    pub fn new(
        id: impl Into<Arc<str>>,
        width: f64,
        height: f64,
        length: f64,
        weight: f64,
        temperature_zone: TemperatureZone,
        is_fragile: bool,
        destination: Destination,
    ) -> Self {
        Self {
            id: BoxId::new(id),
            width,
            height,
            length,
            weight,
            temperature_zone,
            is_fragile,
            destination,
        }
    }

    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.length
    }
}

/// A box that has been given a position and orientation by the packer.
/// Analogous to the teacher's `PlacedJob`, but fully immutable: no
/// `Cell`-wrapped field escapes into this public type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBox {
    pub descr: Box,
    pub position: Vec3,
    pub orientation: Orientation,
}

impl PlacedBox {
    pub fn new(descr: Box, position: Vec3, orientation: Orientation) -> Self {
        Self { descr, position, orientation }
    }

    /// Effective `(x, y, z)` extents under the chosen orientation.
    #[inline(always)]
    pub fn effective_extents(&self) -> Vec3 {
        self.orientation
            .apply(self.descr.width, self.descr.height, self.descr.length)
    }
}

impl Extents for PlacedBox {
    #[inline(always)]
    fn center(&self) -> Vec3 {
        self.position
    }

    #[inline(always)]
    fn size(&self) -> Vec3 {
        self.effective_extents()
    }
}
