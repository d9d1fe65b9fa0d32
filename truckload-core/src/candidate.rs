//! Candidate generator (component D, spec.md §4.D).
//!
//! For one box x one void x one orientation, proposes a bounded set of
//! candidate center positions: the box's corner is walked along each
//! axis's slack at up to three evenly-spaced sample offsets, then
//! converted to the box's center.

use crate::geometry::Vec3;
use crate::orientation::Orientation;
use crate::truckbox::Box as TruckBox;
use crate::void::Void;

/// Maximum number of sample offsets tried per axis.
const MAX_SAMPLES_PER_AXIS: usize = 3;

/// Samples for each axis's slack: `[0.0]` if there is no room to move (the
/// box fills the void along that axis), otherwise up to
/// `MAX_SAMPLES_PER_AXIS` evenly spaced offsets from 0 to the slack,
/// inclusive.
fn axis_samples(slack: f64, epsilon: f64) -> Vec<f64> {
    if slack <= epsilon {
        return vec![0.0];
    }
    let n = MAX_SAMPLES_PER_AXIS.min(((slack / epsilon).floor() as usize).max(1).min(MAX_SAMPLES_PER_AXIS));
    if n <= 1 {
        return vec![0.0];
    }
    (0..n)
        .map(|i| slack * (i as f64) / ((n - 1) as f64))
        .collect()
}

/// Candidate center positions for placing a box (under `orientation`) inside
/// `void`. Returns an empty vector if the box does not fit within the void
/// along any axis.
pub fn generate_candidates(
    descr: &TruckBox,
    orientation: Orientation,
    void: &Void,
    epsilon: f64,
) -> Vec<Vec3> {
    let eff = orientation.apply(descr.width, descr.height, descr.length);

    let slack_x = void.extents.x - eff.x;
    let slack_y = void.extents.y - eff.y;
    let slack_z = void.extents.z - eff.z;
    if slack_x < -epsilon || slack_y < -epsilon || slack_z < -epsilon {
        return Vec::new();
    }
    let slack_x = slack_x.max(0.0);
    let slack_y = slack_y.max(0.0);
    let slack_z = slack_z.max(0.0);

    let xs = axis_samples(slack_x, epsilon);
    let ys = axis_samples(slack_y, epsilon);
    let zs = axis_samples(slack_z, epsilon);

    let mut res = Vec::with_capacity(xs.len() * ys.len() * zs.len());
    for &ox in &xs {
        for &oy in &ys {
            for &oz in &zs {
                // Corner offset from the void's lower corner, converted to
                // the box's center.
                res.push(Vec3::new(
                    void.lower.x + ox + eff.x / 2.0,
                    void.lower.y + oy + eff.y / 2.0,
                    void.lower.z + oz + eff.z / 2.0,
                ));
            }
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truckbox::{Destination, TemperatureZone};
    use crate::void::{VoidId, VoidIdGen};

    fn void(lower: Vec3, extents: Vec3) -> Void {
        let mut ids = VoidIdGen::default();
        let _ = ids.next();
        Void::new(VoidId(0), lower, extents)
    }

    #[test]
    fn exact_fit_yields_single_candidate() {
        let descr = TruckBox::new("b", 1.0, 1.0, 1.0, 1.0, TemperatureZone::Regular, false, Destination::Stop1);
        let v = void(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let cands = generate_candidates(&descr, Orientation::Xy, &v, 0.01);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0], Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn oversized_box_yields_no_candidates() {
        let descr = TruckBox::new("b", 5.0, 5.0, 5.0, 1.0, TemperatureZone::Regular, false, Destination::Stop1);
        let v = void(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let cands = generate_candidates(&descr, Orientation::Xy, &v, 0.01);
        assert!(cands.is_empty());
    }

    #[test]
    fn slack_yields_multiple_samples() {
        let descr = TruckBox::new("b", 1.0, 1.0, 1.0, 1.0, TemperatureZone::Regular, false, Destination::Stop1);
        let v = void(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 1.0));
        let cands = generate_candidates(&descr, Orientation::Xy, &v, 0.01);
        assert_eq!(cands.len(), 3);
    }
}
