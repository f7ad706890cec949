//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Samples an action with exploration rate `epsilon`.
    ///
    /// [`Policy::sample`] is the greedy counterpart used in evaluation.
    fn explore(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act>;

    /// The number of transitions consumed by an optimization step.
    fn batch_size(&self) -> usize;

    /// Performs an optimization step and returns some information.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters.
    fn opt(&mut self, buffer: &mut R) -> Result<Record>;

    /// Saves the parameters of the policy network to the given file.
    fn save_policy_network(&self, path: &Path) -> Result<()>;

    /// Saves the parameters of the target network to the given file.
    fn save_target_network(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the policy network from the given file.
    fn load_policy_network(&mut self, path: &Path) -> Result<()>;
}
