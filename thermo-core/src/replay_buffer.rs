//! A generic implementation of replay buffer.
mod base;
mod config;
mod step_proc;
mod transition;
pub use base::SimpleReplayBuffer;
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
pub use transition::{Transition, TransitionBatch};
