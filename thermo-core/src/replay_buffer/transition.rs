//! Transitions and batches of transitions.

/// A transition `(o_t, a_t, r_t, o_t+1, is_done_t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O, A> {
    /// Observation before the action.
    pub obs: O,

    /// Action.
    pub act: A,

    /// Reward.
    pub reward: f32,

    /// Observation after the action.
    pub next_obs: O,

    /// Flag denoting if the episode ended with this transition.
    pub is_done: bool,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(obs: O, act: A, reward: f32, next_obs: O, is_done: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_done,
        }
    }
}

/// A batch of transitions in structure-of-arrays layout.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch<O, A> {
    /// Observations.
    pub obs: Vec<O>,

    /// Actions.
    pub act: Vec<A>,

    /// Next observations.
    pub next_obs: Vec<O>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Done flags.
    pub is_done: Vec<bool>,
}

impl<O, A> TransitionBatch<O, A> {
    /// Creates an empty batch with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            next_obs: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            is_done: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<O, A>) {
        self.obs.push(tr.obs);
        self.act.push(tr.act);
        self.next_obs.push(tr.next_obs);
        self.reward.push(tr.reward);
        self.is_done.push(tr.is_done);
    }

    /// Unpack the data `(o_t, a_t, o_t+1, r_t, is_done_t)`.
    #[allow(clippy::type_complexity)]
    pub fn unpack(self) -> (Vec<O>, Vec<A>, Vec<O>, Vec<f32>, Vec<bool>) {
        (self.obs, self.act, self.next_obs, self.reward, self.is_done)
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}

impl<O, A> FromIterator<Transition<O, A>> for TransitionBatch<O, A> {
    fn from_iter<I: IntoIterator<Item = Transition<O, A>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for tr in iter {
            batch.push(tr);
        }
        batch
    }
}
