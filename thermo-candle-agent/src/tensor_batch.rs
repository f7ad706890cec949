//! Transition batches as candle tensors.
use anyhow::Result;
use candle_core::{Device, Tensor};
use thermo_core::{error::ThermoError, replay_buffer::TransitionBatch};

/// A batch of transitions converted to tensors.
///
/// For a batch of `n` transitions with observations of dimension `d`:
///
/// * `obs`, `next_obs` - `f32` tensors of shape `[n, d]`
/// * `act` - `u32` tensor of shape `[n, 1]`, indices of the taken actions
/// * `reward`, `is_not_done` - `f32` tensors of shape `[n]`
pub struct TensorBatch {
    /// Observations.
    pub obs: Tensor,

    /// Taken actions.
    pub act: Tensor,

    /// Rewards.
    pub reward: Tensor,

    /// Observations after the actions.
    pub next_obs: Tensor,

    /// `0` for terminal transitions, `1` otherwise.
    pub is_not_done: Tensor,
}

fn stack_obs<O: Into<Vec<f32>>>(obs: Vec<O>, device: &Device) -> Result<Tensor> {
    let n = obs.len();
    let data: Vec<f32> = obs.into_iter().flat_map(Into::<Vec<f32>>::into).collect();
    let dim = if n == 0 { 0 } else { data.len() / n };
    Ok(Tensor::from_vec(data, (n, dim), device)?)
}

impl TensorBatch {
    /// Converts a [`TransitionBatch`].
    pub fn from_transitions<O, A>(batch: TransitionBatch<O, A>, device: &Device) -> Result<Self>
    where
        O: Into<Vec<f32>>,
        A: Into<i64>,
    {
        let n = batch.len();
        let (obs, act, next_obs, reward, is_done) = batch.unpack();
        let act = act
            .into_iter()
            .map(|a| {
                let a: i64 = a.into();
                u32::try_from(a).map_err(|_| ThermoError::InvalidAction(a))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let is_not_done = is_done
            .into_iter()
            .map(|d| if d { 0f32 } else { 1f32 })
            .collect::<Vec<_>>();

        Ok(Self {
            obs: stack_obs(obs, device)?,
            act: Tensor::from_vec(act, (n, 1), device)?,
            reward: Tensor::from_vec(reward, n, device)?,
            next_obs: stack_obs(next_obs, device)?,
            is_not_done: Tensor::from_vec(is_not_done, n, device)?,
        })
    }
}
