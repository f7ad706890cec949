//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// An environment is a small state machine: it is built idle, becomes running
/// with [`Env::reset`], and becomes terminal when [`Env::step`] emits a
/// [`Step`] with `is_terminated == true`. Stepping an idle or terminal
/// environment is an error.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// The returned [`Record`] carries environment-specific values of the step,
    /// which are consumed by recorders and renderers.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// The maximum number of steps in an episode.
    fn max_steps(&self) -> usize;

    /// Releases resources held by the environment.
    fn close(&mut self) {}
}
