//! Void-filling packer (component G, spec.md §4.G).
//!
//! The main greedy loop: sort input boxes, then place each one best-first
//! against the current void list. Modeled on `coreba::algo::mod::idealloc`'s
//! top-level driver shape (classify/sort the input, loop with progress
//! reporting, commit the best candidate) and
//! `coreba::algo::placement::do_best_fit`'s "search neighbors, commit best"
//! inner loop.

use itertools::Itertools;
use rayon::prelude::*;

use crate::candidate::generate_candidates;
use crate::config::OptimizerConfig;
use crate::orientation::enumerate_orientations;
use crate::result::ProgressObserver;
use crate::score::score_candidate;
use crate::truckbox::{Box as TruckBox, PlacedBox, TruckDimensions};
use crate::validate::{is_valid, Candidate};
use crate::void::{initial, place as split_void, prune, Void, VoidIdGen};

/// One scored, valid candidate placement considered during the packer's
/// search over voids x orientations.
struct ScoredCandidate {
    orientation: crate::orientation::Orientation,
    position: crate::geometry::Vec3,
    void_index: usize,
    score: f64,
}

/// Sorts input boxes by `(rank(destination) ascending, weight descending)`
/// -- boxes unloaded last are placed first, and within a destination,
/// heavier boxes go deeper into the packing (spec.md §4.G step 1).
pub fn sort_input(mut boxes: Vec<TruckBox>) -> Vec<TruckBox> {
    boxes.sort_by(|a, b| {
        a.destination
            .rank()
            .cmp(&b.destination.rank())
            .then(b.weight.partial_cmp(&a.weight).unwrap())
            .then(a.id.0.cmp(&b.id.0))
    });
    boxes
}

/// Result of one run of the void-filling packer.
pub struct PackResult {
    pub placed: Vec<PlacedBox>,
    pub unplaced: Vec<TruckBox>,
}

/// Runs the greedy void-filling packer over `boxes` (spec.md §4.G). Boxes
/// are placed in the order established by [`sort_input`]; callers that want
/// a specific ordering (e.g. the MCTS refiner continuing a partial
/// placement) should call [`pack_from`] directly with a pre-sorted queue
/// and existing `placed`/`voids` state.
pub fn pack(
    boxes: Vec<TruckBox>,
    truck: &TruckDimensions,
    config: &OptimizerConfig,
    observer: &dyn ProgressObserver,
) -> PackResult {
    let sorted = sort_input(boxes);
    let mut ids = VoidIdGen::default();
    let voids = initial(truck, &mut ids);
    pack_from(sorted, Vec::new(), voids, truck, config, observer, &mut ids)
}

/// Places each box in `queue`, in order, against `voids`, starting from an
/// existing `placed` list. This is the reusable core of [`pack`], exposed
/// separately so the MCTS refiner (component H) can drive the same search
/// from an arbitrary partial state.
pub fn pack_from(
    queue: Vec<TruckBox>,
    mut placed: Vec<PlacedBox>,
    mut voids: Vec<Void>,
    truck: &TruckDimensions,
    config: &OptimizerConfig,
    observer: &dyn ProgressObserver,
    ids: &mut VoidIdGen,
) -> PackResult {
    let total = queue.len();
    let mut unplaced = Vec::new();
    let mut placed_weight: f64 = placed.iter().map(|b| b.descr.weight).sum();

    for (i, descr) in queue.into_iter().enumerate() {
        // Weight-capacity gate (spec.md §3, §8 property 4): a box that would
        // push cumulative placed weight past `max_weight` is never searched
        // for a slot, it goes straight to `unplaced`.
        if placed_weight + descr.weight > config.max_weight + config.epsilon {
            tracing::debug!(box_id = %descr.id, weight = descr.weight, "unplaced: exceeds remaining weight capacity");
            unplaced.push(descr);
            observer.on_progress((i + 1) as f64 / total.max(1) as f64, placed.len());
            continue;
        }

        // Step 3a: sort voids by (y ascending, volume ascending, z descending).
        voids.sort_by(|a, b| {
            a.center()
                .y
                .partial_cmp(&b.center().y)
                .unwrap()
                .then(a.volume().partial_cmp(&b.volume()).unwrap())
                .then(b.center().z.partial_cmp(&a.center().z).unwrap())
        });

        let orientations = enumerate_orientations(descr.width, descr.height, descr.length);
        let support_ratio = config.support_ratio_for(descr.is_fragile);

        let best = find_best_candidate(&descr, &orientations, &voids, truck, &placed, config, support_ratio);

        match best {
            Some(winner) => {
                let candidate = Candidate {
                    descr: &descr,
                    orientation: winner.orientation,
                    position: winner.position,
                };
                let placed_box = candidate.as_placed_box();

                tracing::debug!(
                    box_id = %descr.id,
                    orientation = ?winner.orientation,
                    score = winner.score,
                    "committed placement"
                );

                let occupied = voids.remove(winner.void_index);
                let mut new_voids = split_void(&occupied, &placed_box, config.epsilon, ids);
                placed_weight += placed_box.descr.weight;
                placed.push(placed_box);
                voids.append(&mut new_voids);
                voids = prune(voids, &placed, config.epsilon, config.max_voids);
            }
            None => {
                tracing::debug!(box_id = %descr.id, "no valid placement found");
                unplaced.push(descr);
            }
        }

        observer.on_progress((i + 1) as f64 / total.max(1) as f64, placed.len());
    }

    PackResult { placed, unplaced }
}

/// Searches every (void, orientation, candidate-position) combination for
/// `descr` and returns the single highest-scoring valid one (spec.md §4.G
/// steps 3b-3d). Candidate scoring is parallelized across voids when there
/// are enough of them to be worth it (spec.md §5); the final reduction is a
/// deterministic, sequential fold over a stably-ordered collection so the
/// result never depends on thread scheduling.
fn find_best_candidate(
    descr: &TruckBox,
    orientations: &[crate::orientation::Orientation],
    voids: &[Void],
    truck: &TruckDimensions,
    placed: &[PlacedBox],
    config: &OptimizerConfig,
    support_ratio: f64,
) -> Option<ScoredCandidate> {
    let per_void_best: Vec<Option<ScoredCandidate>> = if voids.len() > 8 {
        voids
            .par_iter()
            .enumerate()
            .map(|(void_index, void)| {
                best_for_void(descr, orientations, void, void_index, truck, placed, config, support_ratio)
            })
            .collect()
    } else {
        voids
            .iter()
            .enumerate()
            .map(|(void_index, void)| {
                best_for_void(descr, orientations, void, void_index, truck, placed, config, support_ratio)
            })
            .collect()
    };

    // Deterministic left-fold over void index order (spec.md §5).
    per_void_best
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<ScoredCandidate>, cand| match acc {
            Some(best) if best.score >= cand.score => Some(best),
            _ => Some(cand),
        })
}

fn best_for_void(
    descr: &TruckBox,
    orientations: &[crate::orientation::Orientation],
    void: &Void,
    void_index: usize,
    truck: &TruckDimensions,
    placed: &[PlacedBox],
    config: &OptimizerConfig,
    support_ratio: f64,
) -> Option<ScoredCandidate> {
    orientations
        .iter()
        .flat_map(|&orientation| {
            generate_candidates(descr, orientation, void, config.epsilon)
                .into_iter()
                .map(move |position| (orientation, position))
        })
        .filter_map(|(orientation, position)| {
            let candidate = Candidate { descr, orientation, position };
            if is_valid(&candidate, truck, placed, config.epsilon, support_ratio) {
                let score = score_candidate(&candidate, truck, placed, config);
                Some(ScoredCandidate { orientation, position, void_index, score })
            } else {
                None
            }
        })
        .sorted_by(|a, b| b.score.partial_cmp(&a.score).unwrap())
        .next()
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
    fn empty_input_produces_empty_result() {
        let res = pack(Vec::new(), &truck(), &OptimizerConfig::default(), &NullObserver);
        assert!(res.placed.is_empty());
        assert!(res.unplaced.is_empty());
    }

    #[test]
    fn single_small_box_is_placed_on_the_floor() {
        let b = TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let res = pack(vec![b], &truck(), &OptimizerConfig::default(), &NullObserver);
        assert_eq!(res.placed.len(), 1);
        assert!(res.unplaced.is_empty());
        assert!((res.placed[0].position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn box_too_big_for_the_truck_is_unplaced() {
        let b = TruckBox::new("huge", 100.0, 100.0, 100.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let res = pack(vec![b], &truck(), &OptimizerConfig::default(), &NullObserver);
        assert!(res.placed.is_empty());
        assert_eq!(res.unplaced.len(), 1);
    }

    #[test]
    fn two_non_overlapping_boxes_are_both_placed() {
        let b1 = TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let b2 = TruckBox::new("b2", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let res = pack(vec![b1, b2], &truck(), &OptimizerConfig::default(), &NullObserver);
        assert_eq!(res.placed.len(), 2);
        let overlap = crate::geometry::overlaps(&res.placed[0], &res.placed[1], 0.01);
        assert!(!overlap);
    }

    #[test]
    fn box_exceeding_remaining_weight_capacity_is_unplaced() {
        let config = OptimizerConfig { max_weight: 15.0, ..OptimizerConfig::default() };
        let fits = TruckBox::new("fits", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let too_heavy = TruckBox::new("too_heavy", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let res = pack(vec![fits, too_heavy], &truck(), &config, &NullObserver);
        assert_eq!(res.placed.len(), 1);
        assert_eq!(res.placed[0].descr.id.0.as_ref(), "fits");
        assert_eq!(res.unplaced.len(), 1);
        assert_eq!(res.unplaced[0].id.0.as_ref(), "too_heavy");
    }

    #[test]
    fn sort_input_orders_by_rank_then_weight_descending() {
        let heavy_stop1 = TruckBox::new("heavy1", 1.0, 1.0, 1.0, 50.0, TemperatureZone::Regular, false, Destination::Stop1);
        let light_stop1 = TruckBox::new("light1", 1.0, 1.0, 1.0, 5.0, TemperatureZone::Regular, false, Destination::Stop1);
        let stop4 = TruckBox::new("s4", 1.0, 1.0, 1.0, 1.0, TemperatureZone::Regular, false, Destination::Stop4);
        let sorted = sort_input(vec![heavy_stop1, light_stop1, stop4]);
        assert_eq!(sorted[0].id.0.as_ref(), "s4");
        assert_eq!(sorted[1].id.0.as_ref(), "heavy1");
        assert_eq!(sorted[2].id.0.as_ref(), "light1");
    }
}
