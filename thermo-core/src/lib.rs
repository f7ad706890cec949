#![warn(missing_docs)]
//! Core traits, replay buffer and training loop for single-room heating control.
//!
//! The crate follows a small set of abstractions:
//!
//! * [`Env`] - an episodic environment driven by [`Env::reset`] and [`Env::step`]
//! * [`Policy`] and [`Agent`] - action selection and learning
//! * [`StepProcessor`] and [`ReplayBufferBase`] - turning steps into stored transitions
//! * [`Trainer`] - the episodic training loop with epsilon decay and checkpointing
//! * [`Evaluator`] - running a policy without learning
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Configurable, DiscreteAct, Env, ExperienceBufferBase, Info, Obs, Policy,
    ReplayBufferBase, Step, StepProcessor,
};

mod trainer;
pub use trainer::{should_update, EpsilonConfig, Trainer, TrainerConfig, TrainingSession};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
