//! Loading-sequence generator (component J, spec.md §4.J).
//!
//! Derives the order boxes should be loaded in so that unloading at each
//! stop never requires moving a box destined for a later stop (LIFO:
//! loaded-last-unloaded-first). Pure function over an already-placed list;
//! it does not re-run placement.

use crate::truckbox::PlacedBox;

/// Sorts `placed` by `(rank(destination) ascending, isFragile ascending,
/// weight descending)` (spec.md §4.J): boxes for the furthest-out stop
/// (Stop4, rank 0) are loaded first, so they sit deepest and come out last;
/// sturdy boxes are loaded before fragile ones at the same stop, so nothing
/// ends up stacked on a fragile box; heavier boxes precede lighter ones.
/// This is the load-in order; the reverse is the unload order.
pub fn loading_sequence(placed: &[PlacedBox]) -> Vec<PlacedBox> {
    let mut seq: Vec<PlacedBox> = placed.to_vec();
    seq.sort_by(|a, b| {
        a.descr
            .destination
            .rank()
            .cmp(&b.descr.destination.rank())
            .then(a.descr.is_fragile.cmp(&b.descr.is_fragile))
            .then(b.descr.weight.partial_cmp(&a.descr.weight).unwrap())
            .then(a.descr.id.0.cmp(&b.descr.id.0))
    });
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::orientation::Orientation;
    use crate::truckbox::{Box as TruckBox, Destination, TemperatureZone};

    fn box_with(id: &str, dest: Destination, weight: f64, fragile: bool) -> PlacedBox {
        PlacedBox::new(
            TruckBox::new(id, 1.0, 1.0, 1.0, weight, TemperatureZone::Regular, fragile, dest),
            Vec3::new(0.0, 0.5, 0.0),
            Orientation::Xy,
        )
    }

    #[test]
    fn later_stops_are_loaded_first() {
        let stop1 = box_with("s1", Destination::Stop1, 10.0, false);
        let stop4 = box_with("s4", Destination::Stop4, 10.0, false);
        let seq = loading_sequence(&[stop1, stop4]);
        assert_eq!(seq[0].descr.id.0.as_ref(), "s4");
        assert_eq!(seq[1].descr.id.0.as_ref(), "s1");
    }

    #[test]
    fn sturdy_boxes_precede_fragile_at_the_same_stop() {
        let fragile = box_with("frag", Destination::Stop1, 10.0, true);
        let sturdy = box_with("sturdy", Destination::Stop1, 10.0, false);
        let seq = loading_sequence(&[fragile, sturdy]);
        assert_eq!(seq[0].descr.id.0.as_ref(), "sturdy");
        assert_eq!(seq[1].descr.id.0.as_ref(), "frag");
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(loading_sequence(&[]).is_empty());
    }
}
