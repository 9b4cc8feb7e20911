//! A planar musculoskeletal arm backend.
//!
//! [`PlanarArm`] implements the [`MuscleSim`](armbox_core::MuscleSim)
//! capability interface with a planar chain of revolute joints, each driven
//! by an antagonistic pair of first-order muscle-like actuators. [`ReachEnv`]
//! wraps the arm in a gym-style reaching task whose observations come from
//! the proprioception extractor.
mod arm;
mod env;
pub use arm::{PlanarArm, PlanarArmConfig};
pub use env::{ReachEnv, ReachEnvConfig};
