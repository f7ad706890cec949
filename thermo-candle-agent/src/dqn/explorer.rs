//! Epsilon-greedy action selection.
use rand::Rng;

/// Index of the largest value, the first one on ties.
///
/// Returns `0` for an empty slice.
pub fn argmax(xs: &[f32]) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if x > xs[best] {
            best = i;
        }
    }
    best
}

/// Epsilon-greedy explorer for DQN.
///
/// Draws `u` uniformly from `[0, 1)`. If `u >= epsilon` the greedy action is
/// taken, otherwise a uniformly random one; `u == epsilon` exploits.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    /// Chooses an action index given action values.
    pub fn choose<R: Rng + ?Sized>(epsilon: f64, q_values: &[f32], rng: &mut R) -> usize {
        if rng.gen::<f64>() >= epsilon {
            argmax(q_values)
        } else {
            rng.gen_range(0..q_values.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::mock::StepRng, rngs::SmallRng, SeedableRng};

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.1, 0.7, 0.3]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[-1.0, 2.0, 2.0]), 1);
    }

    #[test]
    fn test_draw_equal_to_epsilon_exploits() {
        // A zero word gives a uniform draw of exactly 0.0.
        let mut rng = StepRng::new(0, 0);
        assert_eq!(EpsilonGreedy::choose(0.0, &[1.0, 5.0], &mut rng), 1);

        // With epsilon above the draw, the random branch gives index 0 for a zero word.
        let mut rng = StepRng::new(0, 0);
        assert_eq!(EpsilonGreedy::choose(0.5, &[1.0, 5.0], &mut rng), 0);
    }

    #[test]
    fn test_extreme_epsilons() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(EpsilonGreedy::choose(0.0, &[0.2, 0.1], &mut rng), 0);
        }

        let mut counts = [0; 2];
        for _ in 0..1000 {
            counts[EpsilonGreedy::choose(1.0, &[0.2, 0.1], &mut rng)] += 1;
        }
        assert!(counts[0] > 0 && counts[1] > 0);
    }
}
