//! Networks whose parameters live in a [`VarMap`](candle_nn::VarMap) owned elsewhere.
use anyhow::Result;
use candle_nn::VarBuilder;

/// A network built on a [`VarBuilder`].
///
/// The owner of the variables, e.g. [`DqnModel`](crate::dqn::DqnModel),
/// saves, loads and optimizes them.
pub trait SubModel {
    /// Configuration of the network.
    type Config;

    /// Input of the network.
    type Input;

    /// Output of the network.
    type Output;

    /// Creates the variables of the network under `vb`.
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Forward pass.
    fn forward(&self, input: &Self::Input) -> Result<Self::Output>;
}

/// Configuration of a network with a fixed output width.
pub trait OutDim {
    /// The number of output units.
    fn out_dim(&self) -> usize;
}
