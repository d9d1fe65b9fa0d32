//! Global scorer (component I, spec.md §4.I).
//!
//! Produces the three summary scores returned alongside a placement:
//! stability, safety, and utilization, each clamped to `[0, 100]`. Grounded
//! on `coreba::analyze::prelude_analysis`'s pattern of reducing a placed
//! collection down to a handful of independent scalar summaries (there,
//! `h_hardness`/`conflict_hardness`/`death_hardness`; here, stability,
//! safety, utilization).

use crate::config::OptimizerConfig;
use crate::geometry::{overlaps, Extents};
use crate::truckbox::{PlacedBox, TruckDimensions};

/// Fraction of the truck's height above which the weighted center of
/// gravity is considered top-heavy (spec.md §4.I).
const COG_HEIGHT_THRESHOLD: f64 = 0.6;
const COG_VERTICAL_PENALTY_SCALE: f64 = 30.0;
const COG_LATERAL_PENALTY_SCALE: f64 = 2.0;
const COG_LONGITUDINAL_PENALTY_SCALE: f64 = 2.0;

/// Fixed deduction when total placed weight exceeds `config.max_weight`.
const OVERWEIGHT_PENALTY: f64 = 20.0;
/// Fraction of truck height above which a fragile box is considered exposed.
const FRAGILE_HEIGHT_THRESHOLD: f64 = 0.7;
const FRAGILE_HEIGHT_PENALTY: f64 = 5.0;
const COLLISION_PENALTY: f64 = 10.0;

#[inline(always)]
fn clamp_0_100(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Mass-weighted centroid of `placed` (spec.md Glossary: "center of
/// gravity"). A left-fold sum, per spec.md §5's determinism requirement.
fn weighted_cog(placed: &[PlacedBox]) -> crate::geometry::Vec3 {
    let total_weight: f64 = placed.iter().map(|b| b.descr.weight).sum();
    if total_weight <= 0.0 {
        return crate::geometry::Vec3::ZERO;
    }
    let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
    for b in placed {
        sx += b.position.x * b.descr.weight;
        sy += b.position.y * b.descr.weight;
        sz += b.position.z * b.descr.weight;
    }
    crate::geometry::Vec3::new(sx / total_weight, sy / total_weight, sz / total_weight)
}

/// Starts at 100; subtracts a penalty proportional to how far the weighted
/// center of gravity exceeds 60% of the truck height, plus penalties
/// proportional to the COG's lateral (x) and longitudinal (z) offset from
/// the truck's central axis (spec.md §4.I). An empty placement has no COG
/// to destabilize, so it scores perfectly.
pub fn stability_score(placed: &[PlacedBox], truck: &TruckDimensions) -> f64 {
    if placed.is_empty() {
        return 100.0;
    }

    let cog = weighted_cog(placed);

    let threshold_y = COG_HEIGHT_THRESHOLD * truck.height;
    let headroom = (truck.height - threshold_y).max(1e-9);
    let vertical_frac = ((cog.y - threshold_y) / headroom).max(0.0);

    let lateral_frac = (cog.x.abs() / (truck.width / 2.0).max(1e-9)).min(1.0);
    let longitudinal_frac = (cog.z.abs() / (truck.length / 2.0).max(1e-9)).min(1.0);

    let penalty = COG_VERTICAL_PENALTY_SCALE * vertical_frac
        + COG_LATERAL_PENALTY_SCALE * lateral_frac
        + COG_LONGITUDINAL_PENALTY_SCALE * longitudinal_frac;

    clamp_0_100(100.0 - penalty)
}

/// Starts at 100; subtracts a fixed amount if total placed weight exceeds
/// `config.max_weight` (should never trigger -- the packer's weight gate
/// already enforces this invariant, this is a defense-in-depth check),
/// subtracts a fixed amount for each fragile box placed above 70% of truck
/// height, and subtracts a small amount per detected collision pair (should
/// also be zero whenever the placement invariants of spec.md §3/§8 hold).
pub fn safety_score(placed: &[PlacedBox], truck: &TruckDimensions, config: &OptimizerConfig) -> f64 {
    if placed.is_empty() {
        return 100.0;
    }

    let mut penalty = 0.0;

    let total_weight: f64 = placed.iter().map(|b| b.descr.weight).sum();
    if total_weight > config.max_weight {
        penalty += OVERWEIGHT_PENALTY;
    }

    let exposed_height = FRAGILE_HEIGHT_THRESHOLD * truck.height;
    let exposed_fragile_count = placed
        .iter()
        .filter(|b| b.descr.is_fragile && b.position.y > exposed_height)
        .count();
    penalty += FRAGILE_HEIGHT_PENALTY * exposed_fragile_count as f64;

    let mut collision_pairs = 0usize;
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            if overlaps(&placed[i], &placed[j], config.epsilon) {
                collision_pairs += 1;
            }
        }
    }
    penalty += COLLISION_PENALTY * collision_pairs as f64;

    clamp_0_100(100.0 - penalty)
}

/// `0.6 * volumeUtilization + 0.4 * weightUtilization`, each a percentage of
/// the truck's interior volume and of `config.max_weight` respectively
/// (spec.md §4.I), each clamped to `[0, 100]` before combining so the
/// result itself stays within range regardless of an overloaded input.
pub fn utilization_score(placed: &[PlacedBox], truck: &TruckDimensions, config: &OptimizerConfig) -> f64 {
    let placed_volume: f64 = placed.iter().map(|b| b.descr.volume()).sum();
    let volume_pct = clamp_0_100(100.0 * placed_volume / truck.volume());

    let total_weight: f64 = placed.iter().map(|b| b.descr.weight).sum();
    let weight_pct = clamp_0_100(100.0 * total_weight / config.max_weight.max(1e-9));

    0.6 * volume_pct + 0.4 * weight_pct
}

/// Computes all three scores together (spec.md §4.I).
pub fn compute(placed: &[PlacedBox], truck: &TruckDimensions, config: &OptimizerConfig) -> crate::result::Scores {
    crate::result::Scores {
        stability: stability_score(placed, truck),
        safety: safety_score(placed, truck, config),
        utilization: utilization_score(placed, truck, config),
    }
}
