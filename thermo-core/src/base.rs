//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step, StepProcessor};

/// An observation of an environment.
///
/// Environments in this library are not vectorized: one observation
/// corresponds to one environment state.
pub trait Obs: Clone + Debug {}

/// An action on an environment.
pub trait Act: Clone + Debug {}

/// An action taken from the finite set `0..N_ACTIONS`, convertible to and
/// from its index.
pub trait DiscreteAct: Act + From<i64> + Into<i64> {
    /// The number of actions.
    const N_ACTIONS: usize;
}
