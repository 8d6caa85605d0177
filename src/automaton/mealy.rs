use itertools::Itertools;
use std::fmt::{Debug, Display};

use crate::error::{Error, Result};
use crate::math::{OrderedMap, OrderedSet};

use super::{build_transition_table, Alphabet, Output, StateId, Symbol, TransitionSystem};

/// The part of a Mealy transition that is stored with its source state and input symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MealyTransition {
    /// The state that is reached.
    pub target: StateId,
    /// The output that is emitted while taking the transition.
    pub output: Output,
}

impl MealyTransition {
    /// Creates a transition to `target` emitting `output`.
    pub fn new(target: impl Into<StateId>, output: impl Into<Output>) -> Self {
        Self {
            target: target.into(),
            output: output.into(),
        }
    }
}

impl Display for MealyTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.target, self.output)
    }
}

/// A Mealy machine is a transition system where each transition has an output. Running a
/// Mealy machine on a word of length `n` produces `n` outputs, one for each transition
/// that is taken, so in particular the empty word produces no output.
///
/// The machine is complete and deterministic: every state has exactly one outgoing
/// transition per symbol of its [`Alphabet`]. The first state is the initial one.
///
/// # Example
/// ```
/// use mealy_moore::prelude::*;
///
/// let mm = MealyMachine::builder()
///     .with_transitions([
///         ("q0", "0", "q1", "y1"),
///         ("q0", "1", "q0", "y0"),
///         ("q1", "0", "q0", "y0"),
///         ("q1", "1", "q1", "y1"),
///     ])
///     .build()
///     .unwrap();
/// assert_eq!(mm.size(), 2);
/// assert_eq!(mm.initial().unwrap(), "q0");
/// assert_eq!(mm.transition("q1", "0").unwrap().output, "y0");
/// ```
#[derive(Clone)]
pub struct MealyMachine {
    alphabet: Alphabet,
    states: OrderedMap<StateId, Vec<MealyTransition>>,
}

impl MealyMachine {
    /// Returns a [`MealyBuilder`] for assembling a machine transition by transition.
    pub fn builder() -> MealyBuilder {
        MealyBuilder::default()
    }

    /// Assembles a machine from rows which already contain one transition per symbol of
    /// `alphabet`, in alphabet order.
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        states: OrderedMap<StateId, Vec<MealyTransition>>,
    ) -> Self {
        debug_assert!(states.values().all(|row| row.len() == alphabet.len()));
        Self { alphabet, states }
    }

    /// Iterates over the names of all states, starting with the initial one.
    pub fn states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.states.keys()
    }

    /// Returns true if `state` is a state of `self`.
    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Returns the outgoing transitions of `state` together with their symbols, or `None` if
    /// there is no such state.
    pub fn transitions_from(
        &self,
        state: &str,
    ) -> Option<impl Iterator<Item = (&Symbol, &MealyTransition)> + '_> {
        self.states
            .get(state)
            .map(|row| self.alphabet.iter().zip(row.iter()))
    }

    /// Returns the transition taken from `state` on `symbol`.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&MealyTransition> {
        let position = self.alphabet.position(symbol)?;
        self.states.get(state)?.get(position)
    }

    /// Returns the transition taken from the state at position `index` on the symbol at
    /// position `symbol`.
    pub(crate) fn transition_at(&self, index: usize, symbol: usize) -> Option<&MealyTransition> {
        self.states.get_index(index)?.1.get(symbol)
    }

    /// Returns the row of transitions of the state at position `index`, in alphabet order.
    pub(crate) fn row(&self, index: usize) -> Option<&[MealyTransition]> {
        self.states.get_index(index).map(|(_, row)| row.as_slice())
    }

    /// Iterates over all transitions as `(source, symbol, transition)` triples, state by
    /// state and within a state in alphabet order.
    pub fn transitions(&self) -> impl Iterator<Item = (&StateId, &Symbol, &MealyTransition)> + '_ {
        self.states.iter().flat_map(move |(q, row)| {
            self.alphabet
                .iter()
                .zip(row.iter())
                .map(move |(a, t)| (q, a, t))
        })
    }

    /// Returns all outputs that appear on some transition, without duplicates and in order
    /// of their first appearance.
    pub fn output_range(&self) -> Vec<&Output> {
        self.transitions().map(|(_, _, t)| &t.output).unique().collect()
    }
}

impl TransitionSystem for MealyMachine {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn size(&self) -> usize {
        self.states.len()
    }

    fn state_id(&self, index: usize) -> Option<&StateId> {
        self.states.get_index(index).map(|(q, _)| q)
    }

    fn index_of(&self, state: &str) -> Option<usize> {
        self.states.get_index_of(state)
    }

    fn target(&self, index: usize, symbol: usize) -> Option<&StateId> {
        self.transition_at(index, symbol).map(|t| &t.target)
    }

    fn restricted_to(&self, indices: &[usize]) -> Self {
        let states = indices
            .iter()
            .filter_map(|&q| self.states.get_index(q))
            .map(|(q, row)| (q.clone(), row.clone()))
            .collect();
        Self::from_parts(self.alphabet.clone(), states)
    }
}

impl PartialEq for MealyMachine {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.states.iter().eq(other.states.iter())
    }
}
impl Eq for MealyMachine {}

impl Debug for MealyMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for MealyMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = build_transition_table(
            self,
            |q| self.states.get_index(q).map(|(q, _)| q.to_string()).unwrap_or_default(),
            |q, a| {
                self.transition_at(q, a)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string())
            },
        );
        write!(f, "{table}")
    }
}

/// Helper struct for the construction of a [`MealyMachine`]. It collects states, symbols and
/// transitions and checks upon [`MealyBuilder::build`] that they form a complete and
/// deterministic machine.
///
/// States are ordered by their first appearance, where states given through
/// [`MealyBuilder::with_states`] come first, followed by the sources of transitions. The
/// first state becomes the initial state. The same holds for the order of input symbols.
#[derive(Debug, Clone, Default)]
pub struct MealyBuilder {
    states: OrderedSet<StateId>,
    alphabet: Alphabet,
    transitions: Vec<(StateId, Symbol, MealyTransition)>,
}

impl MealyBuilder {
    /// Declares states in the given order.
    pub fn with_states<I, Q>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<StateId>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Declares input symbols in the given order.
    pub fn with_alphabet<I, A>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Symbol>,
    {
        for sym in symbols {
            self.alphabet.insert(sym.into());
        }
        self
    }

    /// Adds transitions given as `(source, symbol, target, output)` tuples.
    pub fn with_transitions<I, Q, A, P, O>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (Q, A, P, O)>,
        Q: Into<StateId>,
        A: Into<Symbol>,
        P: Into<StateId>,
        O: Into<Output>,
    {
        for (q, a, p, o) in transitions {
            let (q, a) = (q.into(), a.into());
            self.states.insert(q.clone());
            self.alphabet.insert(a.clone());
            self.transitions.push((q, a, MealyTransition::new(p, o)));
        }
        self
    }

    /// Builds the machine, failing if there are no states, if a transition leads to an
    /// undeclared state, or if some state does not have exactly one transition per symbol.
    pub fn build(self) -> Result<MealyMachine> {
        if self.states.is_empty() {
            return Err(Error::EmptyAutomaton);
        }

        let mut rows: Vec<Vec<Option<MealyTransition>>> =
            vec![vec![None; self.alphabet.len()]; self.states.len()];
        for (q, a, t) in self.transitions {
            if !self.states.contains(&t.target) {
                return Err(Error::unknown_state(&t.target));
            }
            let source = self
                .states
                .get_index_of(&q)
                .expect("sources are declared when the transition is added");
            let symbol = self
                .alphabet
                .position(a.as_str())
                .expect("symbols are declared when the transition is added");
            if matches!(&rows[source][symbol], Some(existing) if *existing != t) {
                return Err(Error::ConflictingTransition { state: q, symbol: a });
            }
            rows[source][symbol] = Some(t);
        }

        let mut states = OrderedMap::default();
        for (q, row) in self.states.into_iter().zip(rows) {
            let mut complete = Vec::with_capacity(row.len());
            for (position, t) in row.into_iter().enumerate() {
                match t {
                    Some(t) => complete.push(t),
                    None => {
                        return Err(Error::MissingTransition {
                            state: q,
                            symbol: self
                                .alphabet
                                .get(position)
                                .cloned()
                                .expect("position stems from the alphabet"),
                        })
                    }
                }
            }
            states.insert(q, complete);
        }

        Ok(MealyMachine::from_parts(self.alphabet, states))
    }
}
