//! Environment.
use super::{Act, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way. For example, it can be used as a
    /// random seed, which is useful for reproducible evaluation episodes.
    /// This method is called by
    /// [`DefaultEvaluator`](crate::DefaultEvaluator).
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// Performs an environment step.
    ///
    /// Any simulator failure propagates unchanged to the caller.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;
}
