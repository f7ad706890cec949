//! Evaluate [`Policy`].
use crate::{record::Recorder, Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate [`Policy`].
pub trait Evaluator<E: Env> {
    /// Runs episodes with `policy` and returns the score of each episode.
    ///
    /// Every step record is written to `recorder` with the keys `episode`
    /// and `step` added. The caller of this method needs to handle the
    /// internal state of `policy`, like training/evaluation mode.
    fn evaluate<P: Policy<E>>(
        &mut self,
        policy: &mut P,
        recorder: &mut dyn Recorder,
    ) -> Result<Vec<f32>>;
}
