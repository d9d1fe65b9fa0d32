//! Top-level entry point (spec.md §4, §7).
//!
//! `optimize` is the one function external callers need: validate the
//! input, run the greedy packer, optionally refine small loads with MCTS,
//! then compute summary scores and a loading sequence. Modeled on
//! `coreba::algo::mod::idealloc`'s driver shape -- validate, dispatch on a
//! size-based strategy choice, report progress, assemble a result -- but
//! the strategy choice here is "MCTS or not" rather than the teacher's
//! overlap-based case analysis.

use crate::config::OptimizerConfig;
use crate::error::{InvalidInput, OptimizeError};
use crate::mcts::CancellationToken;
use crate::result::{PlacementResult, ProgressObserver};
use crate::truckbox::{Box as TruckBox, TruckDimensions};

/// Validates every box and the truck itself against the boundary
/// preconditions of spec.md §7: finite, positive extents and weight;
/// finite, positive truck dimensions. Collects every violation rather than
/// failing on the first (spec.md §7: "report all violations, not just the
/// first").
pub fn validate_input(boxes: &[TruckBox], truck: &TruckDimensions) -> Result<(), OptimizeError> {
    let mut violations = Vec::new();

    if !truck.width.is_finite() || truck.width <= 0.0 {
        violations.push(InvalidInput::new("truck.width", None, "must be a finite, positive number"));
    }
    if !truck.height.is_finite() || truck.height <= 0.0 {
        violations.push(InvalidInput::new("truck.height", None, "must be a finite, positive number"));
    }
    if !truck.length.is_finite() || truck.length <= 0.0 {
        violations.push(InvalidInput::new("truck.length", None, "must be a finite, positive number"));
    }

    for (i, b) in boxes.iter().enumerate() {
        if !b.width.is_finite() || b.width <= 0.0 {
            violations.push(InvalidInput::new("box.width", Some(i), "must be a finite, positive number"));
        }
        if !b.height.is_finite() || b.height <= 0.0 {
            violations.push(InvalidInput::new("box.height", Some(i), "must be a finite, positive number"));
        }
        if !b.length.is_finite() || b.length <= 0.0 {
            violations.push(InvalidInput::new("box.length", Some(i), "must be a finite, positive number"));
        }
        if !b.weight.is_finite() || b.weight <= 0.0 {
            violations.push(InvalidInput::new("box.weight", Some(i), "must be a finite, positive number"));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(OptimizeError(violations))
    }
}

/// Runs the full pipeline: validate, pack, optionally refine, score,
/// sequence. `cancel` allows a caller to interrupt a running MCTS
/// refinement from another thread; it has no effect on the (always fast)
/// greedy packer.
pub fn optimize(
    boxes: Vec<TruckBox>,
    truck: TruckDimensions,
    config: &OptimizerConfig,
    observer: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<PlacementResult, OptimizeError> {
    validate_input(&boxes, &truck)?;

    tracing::info!(box_count = boxes.len(), "starting placement");

    let (placed, unplaced, mcts_budget_exhausted) = if config.mcts_enabled && boxes.len() <= config.mcts_threshold {
        let sorted = crate::packer::sort_input(boxes);
        crate::mcts::refine(sorted, &truck, config, observer, cancel)
    } else {
        let res = crate::packer::pack(boxes, &truck, config, observer);
        (res.placed, res.unplaced, false)
    };

    if !unplaced.is_empty() {
        tracing::warn!(unplaced_count = unplaced.len(), "some boxes could not be placed");
    }

    let scores = crate::globalscore::compute(&placed, &truck, config);
    let loading_sequence = crate::sequence::loading_sequence(&placed);

    Ok(PlacementResult {
        placed,
        unplaced,
        scores,
        loading_sequence,
        mcts_budget_exhausted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::NullObserver;
    use crate::truckbox::{Destination, TemperatureZone};

    fn truck() -> TruckDimensions {
        TruckDimensions::new(8.0, 28.0, 9.0)
    }

    #[test]
    fn empty_input_optimizes_to_an_empty_result() {
        let result = optimize(Vec::new(), truck(), &OptimizerConfig::default(), &NullObserver, &CancellationToken::new()).unwrap();
        assert!(result.placed.is_empty());
        assert!(result.unplaced.is_empty());
        assert_eq!(result.scores.stability, 100.0);
    }

    #[test]
    fn negative_weight_is_rejected_before_packing() {
        let bad = TruckBox::new("b", 1.0, 1.0, 1.0, -5.0, TemperatureZone::Regular, false, Destination::Stop1);
        let err = optimize(vec![bad], truck(), &OptimizerConfig::default(), &NullObserver, &CancellationToken::new()).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "box.weight");
    }

    #[test]
    fn non_finite_truck_dimension_is_rejected() {
        let truck = TruckDimensions::new(f64::NAN, 28.0, 9.0);
        let err = optimize(Vec::new(), truck, &OptimizerConfig::default(), &NullObserver, &CancellationToken::new()).unwrap_err();
        assert!(err.violations().iter().any(|v| v.field == "truck.width"));
    }

    #[test]
    fn a_single_valid_box_is_placed_and_sequenced() {
        let b = TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let result = optimize(vec![b], truck(), &OptimizerConfig::default(), &NullObserver, &CancellationToken::new()).unwrap();
        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.loading_sequence.len(), 1);
    }

    #[test]
    fn large_load_skips_mcts_and_uses_the_greedy_packer() {
        let cfg = OptimizerConfig { mcts_threshold: 1, ..OptimizerConfig::default() };
        let boxes: Vec<TruckBox> = (0..3)
            .map(|i| TruckBox::new(format!("b{i}"), 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1))
            .collect();
        let result = optimize(boxes, truck(), &cfg, &NullObserver, &CancellationToken::new()).unwrap();
        assert_eq!(result.placed.len(), 3);
        assert!(!result.mcts_budget_exhausted);
    }
}
