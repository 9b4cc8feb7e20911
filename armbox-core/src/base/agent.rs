//! Agent.
use super::{Env, Policy, Step};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Feeds one environment step to the agent.
    ///
    /// The trainer calls this after every environment step so the agent can
    /// accumulate on-policy experience.
    fn observe(&mut self, step: &Step<E>);

    /// Performs an optimization step.
    fn opt(&mut self) {
        let _ = self.opt_with_record();
    }

    /// Performs an optimization step and returns some information.
    fn opt_with_record(&mut self) -> Record;

    /// Save the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files consisting the agent
    /// in the directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
