//! Simple generic replay buffer.
use super::{SimpleReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::ThermoError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::{vec_deque, VecDeque};

/// A fixed-capacity replay buffer of [`Transition`]s.
///
/// When the buffer is full, pushing a transition evicts the oldest one.
/// Batches are sampled uniformly at random without replacement.
pub struct SimpleReplayBuffer<O, A> {
    capacity: usize,
    data: VecDeque<Transition<O, A>>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, Transition<O, A>> {
        self.data.iter()
    }

    /// Draws `batch_size` distinct transitions uniformly at random.
    ///
    /// Sampled transitions are not removed from the buffer.
    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<Transition<O, A>>> {
        if self.data.len() < batch_size {
            return Err(ThermoError::InsufficientData {
                requested: batch_size,
                available: self.data.len(),
            }
            .into());
        }

        Ok(index::sample(&mut self.rng, self.data.len(), batch_size)
            .into_iter()
            .map(|ix| self.data[ix].clone())
            .collect())
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Item = Transition<O, A>;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(tr);
        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Result<Self> {
        if config.capacity == 0 {
            return Err(ThermoError::InvalidConfiguration(
                "replay buffer capacity must be positive".to_string(),
            )
            .into());
        }

        Ok(Self {
            capacity: config.capacity,
            data: VecDeque::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample(size)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    type Buffer = SimpleReplayBuffer<i32, i64>;

    fn transition(label: i32) -> Transition<i32, i64> {
        Transition::new(label, (label % 2) as i64, label as f32, label + 1, false)
    }

    fn buffer(capacity: usize) -> Buffer {
        let config = SimpleReplayBufferConfig::default().capacity(capacity);
        Buffer::build(&config).unwrap()
    }

    #[test]
    fn test_eviction_keeps_last_pushed() -> Result<()> {
        let mut buf = buffer(5);
        for label in 1..=7 {
            buf.push(transition(label))?;
        }

        assert_eq!(buf.len(), 5);
        let labels: Vec<i32> = buf.iter().map(|tr| tr.obs).collect();
        assert_eq!(labels, vec![3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_len_never_exceeds_capacity() -> Result<()> {
        let mut buf = buffer(10);
        for label in 0..35 {
            buf.push(transition(label))?;
            assert!(buf.len() <= buf.capacity());
        }
        let labels: Vec<i32> = buf.iter().map(|tr| tr.obs).collect();
        assert_eq!(labels, (25..35).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_sample_insufficient_data() -> Result<()> {
        let mut buf = buffer(10);
        for label in 0..3 {
            buf.push(transition(label))?;
        }

        let err = buf.sample(4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ThermoError>(),
            Some(&ThermoError::InsufficientData {
                requested: 4,
                available: 3
            })
        );
        assert!(buf.batch(4).is_err());
        Ok(())
    }

    #[test]
    fn test_sample_without_replacement() -> Result<()> {
        let mut buf = buffer(20);
        for label in 0..20 {
            buf.push(transition(label))?;
        }

        for _ in 0..50 {
            let sample = buf.sample(20)?;
            let labels: HashSet<i32> = sample.iter().map(|tr| tr.obs).collect();
            assert_eq!(labels.len(), 20);
        }
        assert_eq!(buf.len(), 20);
        Ok(())
    }

    #[test]
    fn test_batch_layout() -> Result<()> {
        let mut buf = buffer(8);
        for label in 0..8 {
            buf.push(transition(label))?;
        }

        let batch = buf.batch(5)?;
        assert_eq!(batch.len(), 5);
        let (obs, act, next_obs, reward, is_done) = batch.unpack();
        for i in 0..5 {
            assert_eq!(next_obs[i], obs[i] + 1);
            assert_eq!(act[i], (obs[i] % 2) as i64);
            assert_eq!(reward[i], obs[i] as f32);
            assert!(!is_done[i]);
        }
        Ok(())
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = SimpleReplayBufferConfig::default().capacity(0);
        assert!(Buffer::build(&config).is_err());
    }
}
