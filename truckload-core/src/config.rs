//! `OptimizerConfig` (spec.md §6): every tunable knob, all optional, with
//! the defaults given in the spec's table.
//!
//! Grounded on `tex-packer-core::config`'s serde-derived configuration
//! struct: fields default individually via `#[serde(default = "...")]` so
//! a caller's JSON/TOML config need only override what it cares about.

use serde::{Deserialize, Serialize};

/// Weight capacity default, in the same units as `Box::weight`.
pub const DEFAULT_MAX_WEIGHT: f64 = 34_000.0;
/// Minimum base-coverage fraction for non-fragile support.
pub const DEFAULT_SUPPORT_RATIO: f64 = 0.3;
/// Minimum base-coverage fraction for fragile boxes.
pub const DEFAULT_FRAGILE_SUPPORT_RATIO: f64 = 0.7;
/// Absolute tolerance for all geometry checks.
pub const DEFAULT_EPSILON: f64 = 0.01;
/// Retention cap on voids after pruning.
pub const DEFAULT_MAX_VOIDS: usize = 100;
/// Boxes at or below this count use the MCTS refiner.
pub const DEFAULT_MCTS_THRESHOLD: usize = 15;
/// MCTS iteration budget.
pub const DEFAULT_MCTS_ITERATIONS: u32 = 150;
/// Fixed default MCTS seed, for bit-identical results across runs (spec.md §5).
pub const DEFAULT_MCTS_SEED: u64 = 0x5EED_F00D_CAFE_D00D;
/// Default `(frozen, cold)` zone boundary distances from the rear door.
pub const DEFAULT_ZONE_OFFSETS: (f64, f64) = (4.0, 8.0);

/// All tunables accepted by [`crate::optimize::optimize`]. Every field has a
/// default (spec.md §6's table); a caller overrides only what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    /// Weight capacity used in the safety score.
    pub max_weight: f64,
    /// Minimum base-coverage fraction required for non-fragile support.
    pub support_ratio: f64,
    /// Minimum base-coverage fraction required for fragile-box support.
    pub fragile_support_ratio: f64,
    /// Absolute tolerance for all geometry checks.
    pub epsilon: f64,
    /// Retention cap on the void list after pruning.
    pub max_voids: usize,
    /// Whether the MCTS refiner (§4.H) may run at all.
    pub mcts_enabled: bool,
    /// Boxes at or below this count are eligible for MCTS refinement.
    pub mcts_threshold: usize,
    /// MCTS iteration budget.
    pub mcts_iterations: u32,
    /// Seed for the MCTS refiner's pseudo-random generator.
    pub mcts_seed: u64,
    /// `(frozen, cold)` zone boundary distances measured back from the rear
    /// door (spec.md §4.F): frozen is `[backZ - frozen, backZ]`, cold is
    /// `[backZ - cold, backZ - frozen)`, regular is the remainder.
    pub zone_offsets: (f64, f64),
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_weight: DEFAULT_MAX_WEIGHT,
            support_ratio: DEFAULT_SUPPORT_RATIO,
            fragile_support_ratio: DEFAULT_FRAGILE_SUPPORT_RATIO,
            epsilon: DEFAULT_EPSILON,
            max_voids: DEFAULT_MAX_VOIDS,
            mcts_enabled: true,
            mcts_threshold: DEFAULT_MCTS_THRESHOLD,
            mcts_iterations: DEFAULT_MCTS_ITERATIONS,
            mcts_seed: DEFAULT_MCTS_SEED,
            zone_offsets: DEFAULT_ZONE_OFFSETS,
        }
    }
}

impl OptimizerConfig {
    /// The support ratio to use for a box, dispatching on fragility.
    #[inline(always)]
    pub fn support_ratio_for(&self, is_fragile: bool) -> f64 {
        if is_fragile {
            self.fragile_support_ratio
        } else {
            self.support_ratio
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = OptimizerConfig::default();
        assert_eq!(cfg.max_weight, 34_000.0);
        assert_eq!(cfg.support_ratio, 0.3);
        assert_eq!(cfg.fragile_support_ratio, 0.7);
        assert_eq!(cfg.epsilon, 0.01);
        assert_eq!(cfg.max_voids, 100);
        assert!(cfg.mcts_enabled);
        assert_eq!(cfg.mcts_threshold, 15);
        assert_eq!(cfg.mcts_iterations, 150);
        assert_eq!(cfg.zone_offsets, (4.0, 8.0));
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{"maxWeight": 1000.0}"#;
        let parsed: OptimizerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.max_weight, 1000.0);
        // Every other field falls back to its default.
        assert_eq!(parsed.support_ratio, 0.3);
        assert_eq!(parsed.mcts_iterations, 150);
    }

    #[test]
    fn support_ratio_for_dispatches_on_fragility() {
        let cfg = OptimizerConfig::default();
        assert_eq!(cfg.support_ratio_for(false), 0.3);
        assert_eq!(cfg.support_ratio_for(true), 0.7);
    }
}
