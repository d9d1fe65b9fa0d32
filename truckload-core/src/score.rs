//! Placement scorer (component F, spec.md §4.F).
//!
//! Returns a scalar to maximize, built from independent additive signals --
//! the same compositional shape as `coreba::analyze::prelude_analysis`'s
//! hardness characterization (several independently computed scalars
//! combined into one heuristic), here with the concrete weights spec.md
//! §4.F specifies.

use crate::config::OptimizerConfig;
use crate::geometry::{overlaps, xz_overlap_area, Extents};
use crate::truckbox::{PlacedBox, TruckDimensions};
use crate::validate::Candidate;

/// Face-contact bonus for touching a truck wall/floor/back. Floor is
/// weighted highest (spec.md §4.F: "floor is the largest").
const WALL_FLOOR_BONUS_FLOOR: f64 = 100.0;
const WALL_FLOOR_BONUS_WALL: f64 = 50.0;
const WALL_FLOOR_BONUS_BACK: f64 = 30.0;

/// Box-to-box contact bonuses: lateral contact is worth more than vertical.
const BOX_CONTACT_LATERAL: f64 = 200.0;
const BOX_CONTACT_VERTICAL: f64 = 60.0;

const ZONE_COMPLIANCE_BONUS: f64 = 500.0;
const ZONE_VIOLATION_PENALTY: f64 = -500.0;

const FRAGILE_LOW_Y_WEIGHT: f64 = 20.0;
const FRAGILE_CRUSH_PENALTY: f64 = -300.0;
const HEAVY_CRUSH_OVERLAP_THRESHOLD: f64 = 0.3;

const LIFO_PENALTY_WEIGHT: f64 = 100.0;

const CORNER_BONUS: f64 = 150.0;
const EDGE_BONUS: f64 = 75.0;

/// Scores one candidate placement (spec.md §4.F's additive contributions).
/// Numerical semantics: pure double-precision arithmetic, no randomness.
pub fn score_candidate(
    candidate: &Candidate,
    truck: &TruckDimensions,
    placed: &[PlacedBox],
    config: &OptimizerConfig,
) -> f64 {
    let eps = config.epsilon;
    let pos = candidate.center();
    let ext = candidate.effective_extents();
    let min_c = candidate.min_corner();
    let max_c = candidate.max_corner();

    let mut s = 0.0;

    // Low placement bonus: reward decreasing center-y.
    s += (truck.height - pos.y) * 2.0;

    // Heavy-low bonus.
    s += (candidate.descr.weight / 100.0) * (truck.height - pos.y);

    // Centered bonus: reward small |x|, |z|.
    s += -(pos.x.abs() + pos.z.abs()) * 1.0;

    // Wall/floor/back contact bonus.
    if (min_c.y - 0.0).abs() <= eps {
        s += WALL_FLOOR_BONUS_FLOOR;
    }
    if (min_c.x - (-truck.width / 2.0)).abs() <= eps || (max_c.x - truck.width / 2.0).abs() <= eps {
        s += WALL_FLOOR_BONUS_WALL;
    }
    if (min_c.z - (-truck.length / 2.0)).abs() <= eps {
        s += WALL_FLOOR_BONUS_WALL;
    }
    if (max_c.z - truck.length / 2.0).abs() <= eps {
        s += WALL_FLOOR_BONUS_BACK;
    }

    // Box-to-box contact bonus: coplanar faces with nonzero projected
    // overlap in the other two axes.
    for b in placed {
        let (b_min, b_max) = (b.min_corner(), b.max_corner());

        // Lateral contact along x.
        if ((min_c.x - b_max.x).abs() <= eps || (max_c.x - b_min.x).abs() <= eps)
            && y_overlap(min_c.y, max_c.y, b_min.y, b_max.y) > 0.0
            && z_overlap(min_c.z, max_c.z, b_min.z, b_max.z) > 0.0
        {
            s += BOX_CONTACT_LATERAL;
        }
        // Lateral contact along z.
        if ((min_c.z - b_max.z).abs() <= eps || (max_c.z - b_min.z).abs() <= eps)
            && y_overlap(min_c.y, max_c.y, b_min.y, b_max.y) > 0.0
            && x_overlap(min_c.x, max_c.x, b_min.x, b_max.x) > 0.0
        {
            s += BOX_CONTACT_LATERAL;
        }
        // Vertical contact along y.
        if ((min_c.y - b_max.y).abs() <= eps || (max_c.y - b_min.y).abs() <= eps)
            && xz_overlap_area(candidate, b) > 0.0
        {
            s += BOX_CONTACT_VERTICAL;
        }
    }

    // Temperature-zone compliance.
    let back_z = truck.back_z();
    let (frozen_dist, cold_dist) = config.zone_offsets;
    let zone_matches = match candidate.descr.temperature_zone {
        crate::truckbox::TemperatureZone::Frozen => pos.z >= back_z - frozen_dist,
        crate::truckbox::TemperatureZone::Cold => {
            pos.z < back_z - frozen_dist && pos.z >= back_z - cold_dist
        }
        crate::truckbox::TemperatureZone::Regular => pos.z < back_z - cold_dist,
    };
    s += if zone_matches { ZONE_COMPLIANCE_BONUS } else { ZONE_VIOLATION_PENALTY };

    // Fragility shaping: low-y bonus for fragile boxes, and a penalty when
    // this (heavy, non-fragile) candidate would sit above an already-placed
    // fragile box with significant horizontal overlap.
    if candidate.descr.is_fragile {
        s += FRAGILE_LOW_Y_WEIGHT * (truck.height - pos.y);
    } else {
        for b in placed {
            if b.descr.is_fragile
                && b.position.y < pos.y
                && xz_overlap_area(candidate, b) >= HEAVY_CRUSH_OVERLAP_THRESHOLD * (ext.x * ext.z)
            {
                s += FRAGILE_CRUSH_PENALTY;
            }
        }
    }

    // LIFO shaping.
    let rank = candidate.descr.destination.rank() as f64;
    let target = rank / 3.0;
    let normalized_z = (pos.z + truck.length / 2.0) / truck.length;
    s -= LIFO_PENALTY_WEIGHT * (target - normalized_z).abs();

    // Structural bonus: corners (floor + >=2 walls) and edges (floor + 1 wall).
    let floor_contact = (min_c.y - 0.0).abs() <= eps;
    let wall_contacts = [
        (min_c.x - (-truck.width / 2.0)).abs() <= eps,
        (max_c.x - truck.width / 2.0).abs() <= eps,
        (min_c.z - (-truck.length / 2.0)).abs() <= eps,
        (max_c.z - truck.length / 2.0).abs() <= eps,
    ]
    .iter()
    .filter(|&&c| c)
    .count();
    if floor_contact && wall_contacts >= 2 {
        s += CORNER_BONUS;
    } else if floor_contact && wall_contacts == 1 {
        s += EDGE_BONUS;
    }

    s
}

#[inline(always)]
fn x_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

#[inline(always)]
fn y_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

#[inline(always)]
fn z_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;
    use crate::truckbox::{Box as TruckBox, Destination, TemperatureZone};

    fn truck() -> TruckDimensions {
        TruckDimensions::new(8.0, 28.0, 9.0)
    }

    #[test]
    fn floor_placement_scores_higher_than_elevated() {
        let cfg = OptimizerConfig::default();
        let b = TruckBox::new("b", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let low = Candidate { descr: &b, orientation: Orientation::Xy, position: crate::geometry::Vec3::new(0.0, 0.5, 0.0) };
        let high = Candidate { descr: &b, orientation: Orientation::Xy, position: crate::geometry::Vec3::new(0.0, 10.5, 0.0) };
        let score_low = score_candidate(&low, &truck(), &[], &cfg);
        let score_high = score_candidate(&high, &truck(), &[], &cfg);
        assert!(score_low > score_high);
    }

    #[test]
    fn zone_match_beats_zone_violation() {
        let cfg = OptimizerConfig::default();
        let frozen_box = TruckBox::new("f", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Frozen, false, Destination::Stop1);
        let back_z = truck().back_z();
        let matching = Candidate { descr: &frozen_box, orientation: Orientation::Xy, position: crate::geometry::Vec3::new(0.0, 0.5, back_z - 1.0) };
        let violating = Candidate { descr: &frozen_box, orientation: Orientation::Xy, position: crate::geometry::Vec3::new(0.0, 0.5, -back_z + 1.0) };
        let s_match = score_candidate(&matching, &truck(), &[], &cfg);
        let s_violate = score_candidate(&violating, &truck(), &[], &cfg);
        assert!(s_match > s_violate);
    }
}
