//! DQN agent.
mod base;
mod config;
mod explorer;
mod learner;
mod model;
pub use base::Dqn;
pub use config::DqnConfig;
pub use explorer::{argmax, EpsilonGreedy};
pub use learner::{compute_loss, learn_step, soft_update};
pub use model::{DqnModel, DqnModelConfig, QNetwork};
