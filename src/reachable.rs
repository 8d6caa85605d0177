use bit_set::BitSet;
use std::collections::VecDeque;
use tracing::trace;

use crate::prelude::*;

/// Iterates over the positions of all states that can be reached from some origin, in
/// breadth-first order. Successors of a state are explored in alphabet order, so the
/// sequence is deterministic and every reachable state is produced exactly once.
///
/// Transitions leading to states that do not exist are skipped, reporting them is left to
/// the operation that actually needs the target.
#[derive(Debug, Clone)]
pub struct ReachableStateIndices<'a, Ts: TransitionSystem> {
    ts: &'a Ts,
    seen: BitSet,
    queue: VecDeque<usize>,
}

impl<'a, Ts: TransitionSystem> ReachableStateIndices<'a, Ts> {
    /// Starts the exploration in `origin`. If `origin` is not a state of `ts`, nothing is
    /// produced.
    pub fn new(ts: &'a Ts, origin: usize) -> Self {
        let mut seen = BitSet::with_capacity(ts.size());
        let mut queue = VecDeque::new();
        if origin < ts.size() {
            seen.insert(origin);
            queue.push_back(origin);
        }
        Self { ts, seen, queue }
    }

    /// Starts the exploration in the initial state of `ts`.
    pub fn from_initial(ts: &'a Ts) -> Self {
        match ts.initial_index() {
            Some(q) => Self::new(ts, q),
            None => Self {
                ts,
                seen: BitSet::new(),
                queue: VecDeque::new(),
            },
        }
    }
}

impl<Ts: TransitionSystem> Iterator for ReachableStateIndices<'_, Ts> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let q = self.queue.pop_front()?;
        for a in 0..self.ts.alphabet().len() {
            match self.ts.target_index(q, a) {
                Some(Ok(p)) => {
                    if self.seen.insert(p) {
                        self.queue.push_back(p);
                    }
                }
                Some(Err(missing)) => trace!("skipping transition into unknown state {missing}"),
                None => {}
            }
        }
        Some(q)
    }
}

/// Extension of [`TransitionSystem`] with reachability queries.
pub trait Reachable: TransitionSystem + Sized {
    /// Returns an iterator over the positions of the states reachable from the initial
    /// state, in breadth-first discovery order.
    fn reachable_state_indices(&self) -> ReachableStateIndices<'_, Self> {
        ReachableStateIndices::from_initial(self)
    }

    /// Returns the names of all reachable states in breadth-first discovery order.
    fn reachable_states(&self) -> Vec<&StateId> {
        self.reachable_state_indices()
            .filter_map(|q| self.state_id(q))
            .collect()
    }

    /// Returns true if every state can be reached from the initial state.
    fn is_trim(&self) -> bool {
        self.reachable_state_indices().count() == self.size()
    }

    /// Builds a copy of `self` that only consists of the reachable states. The states of the
    /// copy are ordered as they are discovered, so the initial state stays first.
    fn trim(&self) -> Self {
        let reachable: Vec<_> = self.reachable_state_indices().collect();
        if reachable.len() < self.size() {
            trace!(
                "dropping {} unreachable states",
                self.size() - reachable.len()
            );
        }
        self.restricted_to(&reachable)
    }
}

impl<Ts: TransitionSystem> Reachable for Ts {}
