//! Validator (component E, spec.md §4.E).
//!
//! Given a candidate placement and the current placed list, decides
//! whether it is legal: bounds, collision, and support checks. Modeled on
//! `coreba::analyze::placement_is_valid`'s structural shape (a simple
//! boolean gate over a small, explicit set of checks).

use crate::geometry::{contains, overlaps, xz_overlap_area, Extents, Vec3};
use crate::orientation::Orientation;
use crate::truckbox::{Box as TruckBox, PlacedBox, TruckDimensions};

/// A fully-formed candidate placement: one box, under one orientation, at
/// one candidate center.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub descr: &'a TruckBox,
    pub orientation: Orientation,
    pub position: Vec3,
}

impl<'a> Candidate<'a> {
    #[inline(always)]
    pub fn effective_extents(&self) -> Vec3 {
        self.orientation
            .apply(self.descr.width, self.descr.height, self.descr.length)
    }

    #[inline(always)]
    pub fn as_placed_box(&self) -> PlacedBox {
        PlacedBox::new(self.descr.clone(), self.position, self.orientation)
    }
}

impl<'a> Extents for Candidate<'a> {
    #[inline(always)]
    fn center(&self) -> Vec3 {
        self.position
    }

    #[inline(always)]
    fn size(&self) -> Vec3 {
        self.effective_extents()
    }
}

/// `true` iff `candidate` is legal given the truck, the epsilon tolerance,
/// and the list of already-placed boxes (spec.md §4.E, 3 checks).
pub fn is_valid(
    candidate: &Candidate,
    truck: &TruckDimensions,
    placed: &[PlacedBox],
    epsilon: f64,
    support_ratio: f64,
) -> bool {
    // 1. Bounds.
    if !contains(&truck.as_aabb(), candidate, epsilon) {
        return false;
    }

    // 2. Collision.
    if placed.iter().any(|b| overlaps(candidate, b, epsilon)) {
        return false;
    }

    // 3. Support.
    has_support(candidate, placed, epsilon, support_ratio)
}

/// `true` iff the candidate either rests on the floor, or has downward
/// support covering at least `support_ratio` of its base area.
pub fn has_support(candidate: &Candidate, placed: &[PlacedBox], epsilon: f64, support_ratio: f64) -> bool {
    let base_y = candidate.min_corner().y;
    if base_y.abs() <= epsilon {
        return true;
    }

    let base_area = {
        let e = candidate.effective_extents();
        e.x * e.z
    };
    if base_area <= 0.0 {
        return true;
    }

    let supported_area: f64 = placed
        .iter()
        .filter(|b| (b.max_corner().y - base_y).abs() <= epsilon)
        .map(|b| xz_overlap_area(candidate, b))
        .sum();

    supported_area >= support_ratio * base_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truckbox::{Destination, TemperatureZone};

    fn descr() -> TruckBox {
        TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1)
    }

    fn truck() -> TruckDimensions {
        TruckDimensions::new(8.0, 28.0, 9.0)
    }

    #[test]
    fn floor_resting_box_is_valid() {
        let b = descr();
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(0.0, 0.5, 0.0) };
        assert!(is_valid(&cand, &truck(), &[], 0.01, 0.3));
    }

    #[test]
    fn box_outside_truck_bounds_is_invalid() {
        let b = descr();
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(100.0, 0.5, 0.0) };
        assert!(!is_valid(&cand, &truck(), &[], 0.01, 0.3));
    }

    #[test]
    fn overlapping_candidate_is_invalid() {
        let b = descr();
        let existing = PlacedBox::new(descr(), Vec3::new(0.0, 0.5, 0.0), Orientation::Xy);
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(0.2, 0.5, 0.0) };
        assert!(!is_valid(&cand, &truck(), &[existing], 0.01, 0.3));
    }

    #[test]
    fn floating_box_without_support_is_invalid() {
        let b = descr();
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(0.0, 5.0, 0.0) };
        assert!(!is_valid(&cand, &truck(), &[], 0.01, 0.3));
    }

    #[test]
    fn box_fully_supported_by_another_is_valid() {
        let base = PlacedBox::new(descr(), Vec3::new(0.0, 0.5, 0.0), Orientation::Xy);
        let b = descr();
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(0.0, 1.5, 0.0) };
        assert!(is_valid(&cand, &truck(), &[base], 0.01, 0.3));
    }

    #[test]
    fn partial_support_below_ratio_is_invalid_for_fragile() {
        let base = PlacedBox::new(descr(), Vec3::new(0.9, 0.5, 0.0), Orientation::Xy);
        let b = descr();
        let cand = Candidate { descr: &b, orientation: Orientation::Xy, position: Vec3::new(0.0, 1.5, 0.0) };
        // Only partial overlap in x -- not enough to satisfy the stricter
        // fragile ratio of 0.7.
        assert!(!is_valid(&cand, &truck(), &[base], 0.01, 0.7));
    }
}
