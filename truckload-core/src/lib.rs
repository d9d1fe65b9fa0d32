//! Truck loading optimizer core: arranges rectangular boxes inside a truck
//! container via a greedy void-filling packer, an optional Monte Carlo tree
//! search refiner for small loads, and a constraint/scoring evaluator
//! covering stability, safety, utilization, LIFO unloadability, temperature
//! zones, and fragile-item protection.
//!
//! [`optimize::optimize`] is the crate's single entry point; everything
//! else is exported for callers who want to drive the pipeline themselves
//! (e.g. running only the packer, or scoring a placement built elsewhere).

pub mod candidate;
pub mod config;
pub mod error;
pub mod geometry;
pub mod globalscore;
pub mod mcts;
pub mod optimize;
pub mod orientation;
pub mod packer;
pub mod result;
pub mod score;
pub mod sequence;
pub mod truckbox;
pub mod validate;
pub mod void;

pub use crate::config::OptimizerConfig;
pub use crate::error::{InvalidInput, OptimizeError};
pub use crate::geometry::{Aabb, Extents, Vec3};
pub use crate::mcts::CancellationToken;
pub use crate::optimize::optimize;
pub use crate::orientation::Orientation;
pub use crate::result::{ChannelObserver, NullObserver, PlacementResult, ProgressObserver, Scores};
pub use crate::truckbox::{Box, BoxId, Destination, PlacedBox, TemperatureZone, TruckDimensions};
