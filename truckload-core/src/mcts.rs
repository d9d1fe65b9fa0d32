//! MCTS refiner (component H, spec.md §4.H).
//!
//! Monte Carlo Tree Search over placement sequences, applied only when
//! `|boxes| <= mcts_threshold`. Uses an arena of nodes (`Vec<Node>` with
//! index-based parent/child links) rather than `Rc<RefCell<_>>` -- the
//! same reason the pack's `understory` box-tree crate uses arena indices
//! for its tree: avoiding reference-counted cycles in a mutually-recursive
//! tree structure. Seed management is modeled on
//! `coreba::helpe::T2Control::gen_crit`'s use of `rand`, upgraded to a
//! seedable generator to satisfy spec.md §5's determinism requirement.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::candidate::generate_candidates;
use crate::config::OptimizerConfig;
use crate::geometry::Vec3;
use crate::orientation::{enumerate_orientations, Orientation};
use crate::result::ProgressObserver;
use crate::score::score_candidate;
use crate::truckbox::{Box as TruckBox, PlacedBox, TruckDimensions};
use crate::validate::{is_valid, Candidate};
use crate::void::{place as split_void, prune, Void, VoidIdGen};

const UCB1_EXPLORATION: f64 = std::f64::consts::SQRT_2;
/// Cap on the number of candidate actions considered per node (spec.md §4.H:
/// "truncated to the top ~8").
const MAX_ACTIONS_PER_NODE: usize = 8;

/// A cooperative cancellation flag, checked between rollouts (spec.md §4.H,
/// §5). Cloning shares the same underlying flag.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(std::sync::Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One action: placing the queue's head box at a given orientation/position
/// inside a given void.
#[derive(Clone)]
struct Action {
    void_index: usize,
    orientation: Orientation,
    position: Vec3,
    prior_score: f64,
}

/// A search-tree node. Children are expanded lazily: `children` starts
/// empty and is filled with one entry per untried action the first time
/// the node is visited deeply enough to need them.
struct Node {
    parent: Option<usize>,
    /// Index into the original, truck-global box queue of the box this
    /// node placed (the action taken to reach this node from its parent).
    /// `None` for the root.
    action: Option<Action>,
    placed: Vec<PlacedBox>,
    voids: Vec<Void>,
    remaining: Vec<TruckBox>,
    children: Vec<usize>,
    untried: Option<Vec<Action>>,
    visits: u32,
    total_reward: f64,
}

impl Node {
    #[inline(always)]
    fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    #[inline(always)]
    fn ucb1(&self, parent_visits: u32) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        self.mean_reward()
            + UCB1_EXPLORATION * ((parent_visits as f64).ln() / self.visits as f64).sqrt()
    }
}

/// Runs the MCTS refiner starting from an empty placement and the full,
/// already-sorted `queue`. Returns the best-so-far placement found within
/// the configured iteration budget or until `cancel` is set; either way the
/// result is always a fully-committed, valid placement (spec.md §5: "the
/// best-so-far is always a completed placement, never half-committed").
pub fn refine(
    queue: Vec<TruckBox>,
    truck: &TruckDimensions,
    config: &OptimizerConfig,
    observer: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> (Vec<PlacedBox>, Vec<TruckBox>, bool) {
    let mut ids = VoidIdGen::default();
    let root_voids = crate::void::initial(truck, &mut ids);

    let mut nodes: Vec<Node> = vec![Node {
        parent: None,
        action: None,
        placed: Vec::new(),
        voids: root_voids,
        remaining: queue,
        children: Vec::new(),
        untried: None,
        visits: 0,
        total_reward: 0.0,
    }];

    let mut rng = ChaCha8Rng::seed_from_u64(config.mcts_seed);
    let iterations = config.mcts_iterations;
    // MCTS has no "converged" terminal state short of exhausting its
    // iteration budget, so this is true whenever any work was attempted --
    // it records that the result is the best-found-so-far, not a proven
    // optimum (spec.md §7).
    let mut budget_exhausted = iterations > 0;

    for i in 0..iterations {
        if cancel.is_cancelled() {
            break;
        }
        run_iteration(&mut nodes, 0, truck, config, &mut rng, &mut ids);
        observer.on_progress((i + 1) as f64 / iterations.max(1) as f64, nodes[0].placed.len());
    }

    // Select the root child with the highest (meanReward + 0.1*visits), per
    // spec.md §4.H. If the root has no children (iteration budget was zero
    // or every rollout died immediately), fall back to a plain greedy pack.
    let best_leaf = select_best_leaf(&nodes, 0);
    match best_leaf {
        Some(leaf_idx) => {
            let leaf = &nodes[leaf_idx];
            (leaf.placed.clone(), leaf.remaining.clone(), budget_exhausted)
        }
        None => {
            let fallback = crate::packer::pack_from(
                nodes[0].remaining.clone(),
                Vec::new(),
                nodes[0].voids.clone(),
                truck,
                config,
                observer,
                &mut ids,
            );
            (fallback.placed, fallback.unplaced, budget_exhausted)
        }
    }
}

/// Picks the visited node with an empty remaining queue (a fully-committed
/// placement) and the highest `(meanReward + 0.1*visits)` score, searched
/// across the whole tree rather than one best-child path, since the
/// deepest-explored branch is not always the one that finished the queue
/// (spec.md §4.H: "the best-so-far is always a completed placement, never
/// half-committed"). Returns `None` if no node in the tree ever placed every
/// box, in which case the caller falls back to a plain greedy pack.
fn select_best_leaf(nodes: &[Node], _root: usize) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.remaining.is_empty() && n.visits > 0)
        .max_by(|(_, a), (_, b)| {
            let score_a = a.mean_reward() + 0.1 * a.visits as f64;
            let score_b = b.mean_reward() + 0.1 * b.visits as f64;
            score_a.partial_cmp(&score_b).unwrap()
        })
        .map(|(idx, _)| idx)
}

/// One tree-policy descent + expansion + rollout + backpropagation pass.
fn run_iteration(
    nodes: &mut Vec<Node>,
    root: usize,
    truck: &TruckDimensions,
    config: &OptimizerConfig,
    rng: &mut ChaCha8Rng,
    ids: &mut VoidIdGen,
) {
    // Tree policy: descend via UCB1 until an unexpanded or terminal node.
    let mut path = vec![root];
    let mut current = root;
    loop {
        ensure_actions_computed(nodes, current, truck, config);
        let node = &nodes[current];
        if node.remaining.is_empty() {
            break;
        }
        let untried_remaining = node.untried.as_ref().map(|u| !u.is_empty()).unwrap_or(false);
        if untried_remaining {
            current = expand(nodes, current, truck, config, ids);
            path.push(current);
            break;
        }
        if node.children.is_empty() {
            // No legal actions at all: this is a dead end (should rarely
            // happen since the greedy packer always has a fallback, but a
            // box that fits nowhere terminates the branch here).
            break;
        }
        let parent_visits = node.visits.max(1);
        current = *node
            .children
            .iter()
            .max_by(|&&a, &&b| nodes[a].ucb1(parent_visits).partial_cmp(&nodes[b].ucb1(parent_visits)).unwrap())
            .unwrap();
        path.push(current);
    }

    let reward = rollout(nodes, current, truck, config, rng);

    for &idx in &path {
        nodes[idx].visits += 1;
        nodes[idx].total_reward += reward;
    }
}

/// Lazily computes the (at most 8, cheaply-prescored) candidate actions for
/// the head of `node`'s remaining queue.
fn ensure_actions_computed(nodes: &mut [Node], node_idx: usize, truck: &TruckDimensions, config: &OptimizerConfig) {
    if nodes[node_idx].untried.is_some() || nodes[node_idx].remaining.is_empty() {
        return;
    }

    let node = &nodes[node_idx];
    let descr = node.remaining[0].clone();
    let orientations = enumerate_orientations(descr.width, descr.height, descr.length);
    let support_ratio = config.support_ratio_for(descr.is_fragile);

    let mut actions: Vec<Action> = Vec::new();
    for (void_index, void) in node.voids.iter().enumerate() {
        for &orientation in &orientations {
            for position in generate_candidates(&descr, orientation, void, config.epsilon) {
                let candidate = Candidate { descr: &descr, orientation, position };
                if is_valid(&candidate, truck, &node.placed, config.epsilon, support_ratio) {
                    let score = score_candidate(&candidate, truck, &node.placed, config);
                    actions.push(Action { void_index, orientation, position, prior_score: score });
                }
            }
        }
    }
    actions.sort_by(|a, b| b.prior_score.partial_cmp(&a.prior_score).unwrap());
    actions.truncate(MAX_ACTIONS_PER_NODE);

    nodes[node_idx].untried = Some(actions);
}

/// Expands one untried action of `node_idx` into a new child node.
fn expand(nodes: &mut Vec<Node>, node_idx: usize, _truck: &TruckDimensions, config: &OptimizerConfig, ids: &mut VoidIdGen) -> usize {
    let action = nodes[node_idx].untried.as_mut().unwrap().pop().unwrap();

    let parent_placed = nodes[node_idx].placed.clone();
    let parent_voids = nodes[node_idx].voids.clone();
    let mut remaining = nodes[node_idx].remaining.clone();
    let descr = remaining.remove(0);

    let candidate_box = PlacedBox::new(descr, action.position, action.orientation);

    let mut new_voids = parent_voids.clone();
    let occupied = new_voids.remove(action.void_index);
    let mut split = split_void(&occupied, &candidate_box, config.epsilon, ids);
    let mut new_placed = parent_placed;
    new_placed.push(candidate_box);
    new_voids.append(&mut split);
    let new_voids = prune(new_voids, &new_placed, config.epsilon, config.max_voids);

    let child = Node {
        parent: Some(node_idx),
        action: Some(action),
        placed: new_placed,
        voids: new_voids,
        remaining,
        children: Vec::new(),
        untried: None,
        visits: 0,
        total_reward: 0.0,
    };

    nodes.push(child);
    let child_idx = nodes.len() - 1;
    nodes[node_idx].children.push(child_idx);
    child_idx
}

/// Greedy rollout from `node_idx` to the end of the queue (or a depth cap),
/// then evaluates the resulting configuration.
fn rollout(nodes: &[Node], node_idx: usize, truck: &TruckDimensions, config: &OptimizerConfig, _rng: &mut ChaCha8Rng) -> f64 {
    const DEPTH_CAP: usize = 64;

    let node = &nodes[node_idx];
    let mut ids = VoidIdGen::default();
    // The rollout's own void ids are scratch-only (never compared against
    // the tree's), so starting a fresh generator here is safe: ids only
    // need to be unique within one `pack_from` call.
    let queue: Vec<TruckBox> = node.remaining.iter().take(DEPTH_CAP).cloned().collect();
    let observer = crate::result::NullObserver;
    let result = crate::packer::pack_from(
        queue,
        node.placed.clone(),
        node.voids.clone(),
        truck,
        config,
        &observer,
        &mut ids,
    );

    evaluate_configuration(&result.placed, &result.unplaced, truck, config)
}

/// Reward function (spec.md §4.H): volume utilization bonus, center-of-
/// gravity bonus, zone-compliance bonus, accessibility penalty for
/// deep-centered boxes.
pub fn evaluate_configuration(
    placed: &[PlacedBox],
    unplaced: &[TruckBox],
    truck: &TruckDimensions,
    config: &OptimizerConfig,
) -> f64 {
    if placed.is_empty() {
        return 0.0;
    }

    let placed_volume: f64 = placed.iter().map(|b| b.descr.volume()).sum();
    let volume_bonus = 100.0 * placed_volume / truck.volume();

    let total_weight: f64 = placed.iter().map(|b| b.descr.weight).sum();
    let cog_y = placed.iter().map(|b| b.position.y * b.descr.weight).sum::<f64>() / total_weight.max(1e-9);
    let cog_bonus = -(cog_y - truck.height * 0.4).abs() * 2.0;

    let back_z = truck.back_z();
    let (frozen_dist, cold_dist) = config.zone_offsets;
    let zone_bonus: f64 = placed
        .iter()
        .map(|b| {
            let z = b.position.z;
            let matches = match b.descr.temperature_zone {
                crate::truckbox::TemperatureZone::Frozen => z >= back_z - frozen_dist,
                crate::truckbox::TemperatureZone::Cold => z < back_z - frozen_dist && z >= back_z - cold_dist,
                crate::truckbox::TemperatureZone::Regular => z < back_z - cold_dist,
            };
            if matches { 5.0 } else { -5.0 }
        })
        .sum();

    // Accessibility penalty for deep-centered boxes: boxes far from any
    // wall/door, deep in the stack, hurt unload accessibility.
    let accessibility_penalty: f64 = placed
        .iter()
        .map(|b| {
            let dist_from_back = (back_z - b.position.z).abs();
            let dist_from_floor = b.position.y;
            -(dist_from_back * 0.1 + dist_from_floor * 0.05)
        })
        .sum();

    let unplaced_penalty = unplaced.len() as f64 * 10.0;

    volume_bonus + cog_bonus + zone_bonus + accessibility_penalty - unplaced_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truckbox::{Destination, TemperatureZone};

    fn truck() -> TruckDimensions {
        TruckDimensions::new(8.0, 28.0, 9.0)
    }

    #[test]
    fn refine_places_a_single_box() {
        let b = TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1);
        let cfg = OptimizerConfig { mcts_iterations: 20, ..OptimizerConfig::default() };
        let cancel = CancellationToken::new();
        let (placed, unplaced, _) = refine(vec![b], &truck(), &cfg, &crate::result::NullObserver, &cancel);
        assert_eq!(placed.len(), 1);
        assert!(unplaced.is_empty());
    }

    #[test]
    fn cancellation_returns_a_valid_partial_result() {
        let boxes: Vec<TruckBox> = (0..5)
            .map(|i| TruckBox::new(format!("b{i}"), 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1))
            .collect();
        let cfg = OptimizerConfig { mcts_iterations: 150, ..OptimizerConfig::default() };
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (placed, unplaced, exhausted) = refine(boxes, &truck(), &cfg, &crate::result::NullObserver, &cancel);
        assert_eq!(placed.len() + unplaced.len(), 5);
        assert!(exhausted);
    }

    #[test]
    fn evaluate_configuration_rewards_higher_utilization() {
        let cfg = OptimizerConfig::default();
        let b1 = PlacedBox::new(
            TruckBox::new("b1", 1.0, 1.0, 1.0, 10.0, TemperatureZone::Regular, false, Destination::Stop1),
            Vec3::new(0.0, 0.5, 0.0),
            Orientation::Xy,
        );
        let empty_score = evaluate_configuration(&[], &[], &truck(), &cfg);
        let one_box_score = evaluate_configuration(&[b1], &[], &truck(), &cfg);
        assert!(one_box_score > empty_score);
    }
}
