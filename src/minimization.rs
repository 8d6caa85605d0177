use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::math::{OrderedMap, Partition};
use crate::naming::GroupLabels;
use crate::prelude::*;

/// Implementors are machines whose states can be told apart by what they immediately emit.
/// This is what partition refinement needs to know about a machine besides its transitions.
pub trait Refinable: TransitionSystem {
    /// What a state emits without looking at its successors.
    type Signature<'a>: Hash + Eq
    where
        Self: 'a;

    /// Returns the immediate output signature of the state at position `index`.
    fn output_signature(&self, index: usize) -> Self::Signature<'_>;
}

impl Refinable for MealyMachine {
    type Signature<'a> = Vec<&'a Output>;

    /// The outputs of all outgoing transitions, in alphabet order.
    fn output_signature(&self, index: usize) -> Self::Signature<'_> {
        self.row(index)
            .map(|row| row.iter().map(|t| &t.output).collect())
            .unwrap_or_default()
    }
}

impl Refinable for MooreMachine {
    type Signature<'a> = Option<&'a Output>;

    fn output_signature(&self, index: usize) -> Self::Signature<'_> {
        self.state_at(index).map(|(_, s)| &s.output)
    }
}

/// The outcome of [`partition_refinement`], the coarsest stable partition of the states
/// and the labels of the round in which it was reached.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// Groups the states by their position in the machine.
    pub partition: Partition,
    /// Names the groups of `partition`.
    pub labels: GroupLabels,
}

impl Refinement {
    /// Returns the label of the group that contains the state at position `index`.
    pub fn label_of(&self, index: usize) -> Option<StateId> {
        self.partition.group_of(index).map(|g| self.labels.label(g))
    }
}

fn refine<M: Refinable>(ts: &M, current: &Partition) -> Result<Partition> {
    let keys = (0..ts.size())
        .map(|q| {
            let successors = (0..ts.alphabet().len())
                .map(|a| match ts.target_index(q, a) {
                    Some(Ok(p)) => Ok(current.group_of(p).expect("every state is grouped")),
                    Some(Err(missing)) => Err(Error::unknown_state(missing)),
                    None => unreachable!("machines have a transition for every symbol"),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((current.group_of(q), successors))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Partition::from_keys(keys))
}

/// Computes the coarsest partition of the states of `ts` such that states in the same group
/// have the same [`Refinable::output_signature`] and, for every symbol, move into the same
/// group.
///
/// The initial partition groups states by their output signature. In every round, each
/// group is split according to the groups that its states move to. The refinement stops as
/// soon as a round leaves the partition unchanged, which is decided by comparing the
/// complete assignment of states to groups.
pub fn partition_refinement<M: Refinable>(ts: &M) -> Result<Refinement> {
    let mut labels = GroupLabels::default();
    let mut current = Partition::from_keys((0..ts.size()).map(|q| ts.output_signature(q)));
    trace!(
        "initial partition has {} groups: {:?}",
        current.size(),
        current.classes()
    );

    loop {
        let next = refine(ts, &current)?;
        labels.advance();
        trace!(
            "round {} yields {} groups: {:?}",
            labels.round(),
            next.size(),
            next.classes()
        );
        if next == current {
            break;
        }
        current = next;
    }

    debug!(
        "partition refinement stabilized after {} rounds with {} groups",
        labels.round(),
        current.size()
    );
    Ok(Refinement {
        partition: current,
        labels,
    })
}

impl MealyMachine {
    /// Returns the minimal Mealy machine that produces the same outputs as `self` on every
    /// input. Unreachable states are dropped first, then the remaining states are merged
    /// by [`partition_refinement`]. Each merged state takes the transitions of the first
    /// state of its group and is named after the group, the initial state stays first.
    ///
    /// # Example
    /// ```
    /// use mealy_moore::prelude::*;
    ///
    /// let mm = MealyMachine::builder()
    ///     .with_transitions([
    ///         ("p", "a", "q", "0"),
    ///         ("q", "a", "r", "0"),
    ///         ("r", "a", "q", "0"),
    ///     ])
    ///     .build()
    ///     .unwrap();
    /// let minimized = mm.minimize().unwrap();
    /// assert_eq!(minimized.size(), 1);
    /// assert!(minimized.bisimilar(&mm));
    /// ```
    pub fn minimize(&self) -> Result<MealyMachine> {
        let ts = self.trim();
        if ts.is_empty() {
            return Err(Error::EmptyAutomaton);
        }
        let refinement = partition_refinement(&ts)?;

        let mut states = OrderedMap::default();
        for (group, rep) in refinement.partition.representatives().into_iter().enumerate() {
            let row = ts
                .row(rep)
                .expect("representatives are states of the machine")
                .iter()
                .map(|t| {
                    let p = ts
                        .index_of(t.target.as_str())
                        .ok_or_else(|| Error::unknown_state(&t.target))?;
                    Ok(MealyTransition {
                        target: refinement.label_of(p).expect("every state is grouped"),
                        output: t.output.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            states.insert(refinement.labels.label(group), row);
        }

        debug!("minimized mealy machine from {} to {} states", self.size(), states.len());
        Ok(MealyMachine::from_parts(ts.alphabet().clone(), states))
    }
}

impl MooreMachine {
    /// Returns the minimal Moore machine that produces the same outputs as `self` on every
    /// input. Works like [`MealyMachine::minimize`], except that states are initially
    /// grouped by their output and every merged state inherits the output of its group.
    pub fn minimize(&self) -> Result<MooreMachine> {
        let ts = self.trim();
        if ts.is_empty() {
            return Err(Error::EmptyAutomaton);
        }
        let refinement = partition_refinement(&ts)?;

        let mut states = OrderedMap::default();
        for (group, rep) in refinement.partition.representatives().into_iter().enumerate() {
            let (_, state) = ts
                .state_at(rep)
                .expect("representatives are states of the machine");
            let targets = state
                .targets
                .iter()
                .map(|p| {
                    ts.index_of(p.as_str())
                        .and_then(|p| refinement.label_of(p))
                        .ok_or_else(|| Error::unknown_state(p))
                })
                .collect::<Result<Vec<_>>>()?;
            states.insert(
                refinement.labels.label(group),
                MooreState {
                    output: state.output.clone(),
                    targets,
                },
            );
        }

        debug!("minimized moore machine from {} to {} states", self.size(), states.len());
        Ok(MooreMachine::from_parts(ts.alphabet().clone(), states))
    }
}
