//! A generic implementation of [`StepProcessor`](crate::StepProcessor).
use super::Transition;
use crate::{error::ThermoError, Env, Step, StepProcessor};
use anyhow::Result;
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Produces 1-step [`Transition`]s from [`Step`]s.
///
/// The processor remembers the previous observation, which is paired with
/// the action, reward and next observation carried by the [`Step`].
pub struct SimpleStepProcessor<E: Env> {
    prev_obs: Option<E::Obs>,
    phantom: PhantomData<E>,
}

impl<E: Env> StepProcessor<E> for SimpleStepProcessor<E> {
    type Config = SimpleStepProcessorConfig;
    type Output = Transition<E::Obs, E::Act>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs);
    }

    fn process(&mut self, step: Step<E>) -> Result<Self::Output> {
        let obs = self.prev_obs.replace(step.obs.clone()).ok_or_else(|| {
            ThermoError::InvalidState("prev_obs is not set. Forgot to call reset()?".to_string())
        })?;

        if step.is_done() {
            self.prev_obs = None;
        }

        Ok(Transition::new(
            obs,
            step.act,
            step.reward,
            step.obs,
            step.is_terminated,
        ))
    }
}
