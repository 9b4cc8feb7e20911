//! Training, evaluation and trajectory sampling for the planar arm.
//!
//! The crate wires the core components together behind three explicit entry
//! points, each driven by its own configuration struct:
//!
//! * [`train`] - run the training loop on the reaching task and write
//!   checkpoints and TFRecord logs.
//! * [`evaluate`] - load saved policy parameters and report the mean episode
//!   return.
//! * [`sample_trajectories`] - collect random trajectories from the arm and
//!   export them to CSV.
pub mod agent;
pub mod config;
pub mod mlp;
mod ops;
pub use ops::{evaluate, sample_trajectories, train};
