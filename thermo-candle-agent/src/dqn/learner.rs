//! Bellman-target loss and target network updates.
use super::QNetwork;
use crate::TensorBatch;
use anyhow::{anyhow, Result};
use candle_core::{Tensor, Var, D};
use candle_nn::loss::mse;
use std::collections::HashMap;

/// Mean squared error between the action values of the taken actions and
/// the Bellman targets `reward + gamma * (1 - done) * max_a' q_tgt(next_obs, a')`.
///
/// The targets are detached from the computation graph.
pub fn compute_loss<Q: QNetwork>(
    policy: &Q,
    target: &Q,
    batch: &TensorBatch,
    gamma: f64,
) -> Result<Tensor> {
    let pred = policy
        .forward(&batch.obs)?
        .gather(&batch.act, D::Minus1)?
        .squeeze(D::Minus1)?;

    let tgt = {
        let q_next = target.forward(&batch.next_obs)?.max(D::Minus1)?;
        let bootstrap = batch.is_not_done.mul(&q_next)?.affine(gamma, 0.0)?;
        batch.reward.add(&bootstrap)?.detach()
    };

    Ok(mse(&pred, &tgt)?)
}

/// Blends the target parameters toward the policy parameters,
/// `target = tau * policy + (1 - tau) * target`.
///
/// All new values are computed before any of them is assigned.
pub fn soft_update<Q: QNetwork>(target: &Q, policy: &Q, tau: f64) -> Result<()> {
    let src: HashMap<String, _> = policy.parameters().into_iter().collect();

    let updates = target
        .parameters()
        .into_iter()
        .map(|(name, dest)| -> Result<(Var, Tensor)> {
            let src = src
                .get(&name)
                .ok_or_else(|| anyhow!("parameter {} is missing in the policy network", name))?;
            let t = (src.as_tensor().affine(tau, 0.0)?
                + dest.as_tensor().affine(1.0 - tau, 0.0)?)?;
            Ok((dest, t))
        })
        .collect::<Result<Vec<_>>>()?;

    for (dest, t) in updates {
        dest.set(&t)?;
    }
    Ok(())
}

/// Performs a gradient step on the policy network and a soft update of the
/// target network, then returns the loss before the step.
pub fn learn_step<Q: QNetwork>(
    policy: &mut Q,
    target: &Q,
    batch: &TensorBatch,
    gamma: f64,
    tau: f64,
) -> Result<f32> {
    let loss = compute_loss(policy, target, batch, gamma)?;
    policy.backward_step(&loss)?;
    soft_update(target, policy, tau)?;
    Ok(loss.to_scalar::<f32>()?)
}
