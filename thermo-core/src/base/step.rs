//! Environment step.
use super::Env;

/// Environment-specific data attached to a [`Step`].
pub trait Info {}

impl Info for () {}

/// Outcome of applying an action: `(a_t, o_t+1, r_t, done_t)` plus [`Info`].
///
/// A [`StepProcessor`] pairs it with the previous observation to make a
/// transition for the replay buffer.
pub struct Step<E: Env> {
    /// The applied action.
    pub act: E::Act,

    /// Observation after the action.
    pub obs: E::Obs,

    /// Reward of the step.
    pub reward: f32,

    /// `true` on the last step of an episode.
    pub is_terminated: bool,

    /// Environment-specific data.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`].
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, is_terminated: bool, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            info,
        }
    }

    #[inline]
    /// Returns `true` if the episode ended at this step.
    pub fn is_done(&self) -> bool {
        self.is_terminated
    }
}

/// Turns [`Step`]s into items of a replay buffer.
///
/// [`Trainer`](crate::Trainer) pushes [`StepProcessor::Output`] into a buffer
/// whose [`ExperienceBufferBase::Item`](crate::ExperienceBufferBase::Item) is
/// the same type.
pub trait StepProcessor<E: Env> {
    /// Configuration.
    type Config: Clone;

    /// Items pushed into the replay buffer.
    type Output;

    /// Builds the processor.
    fn build(config: &Self::Config) -> Self;

    /// Starts an episode from its initial observation.
    fn reset(&mut self, init_obs: E::Obs);

    /// Converts a [`Step`] of the running episode.
    fn process(&mut self, step: Step<E>) -> anyhow::Result<Self::Output>;
}
