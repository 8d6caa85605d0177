use itertools::Itertools;
use std::fmt::{Debug, Display};

use crate::error::{Error, Result};
use crate::math::OrderedMap;

use super::{build_transition_table, Alphabet, Output, StateId, Symbol, TransitionSystem};

/// A state of a [`MooreMachine`] together with its output and its successors, which are
/// stored in alphabet order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MooreState {
    /// The output emitted whenever the state is reached.
    pub output: Output,
    /// The successor for each symbol of the alphabet, in alphabet order.
    pub targets: Vec<StateId>,
}

/// A Moore machine is a transition system where each state has an output. Running it on a
/// word of length `n` visits `n + 1` states and thus produces `n + 1` outputs; note in
/// particular that the empty word produces the output of the initial state, which is in
/// contrast to [`super::MealyMachine`]s, where the empty word produces no output.
///
/// As for Mealy machines, every state has exactly one successor per input symbol and the
/// first state is the initial one.
///
/// # Example
/// ```
/// use mealy_moore::prelude::*;
///
/// let mm = MooreMachine::builder()
///     .with_state_outputs([("q0", "y0"), ("q1", "y1")])
///     .with_transitions([
///         ("q0", "a", "q1"),
///         ("q1", "a", "q0"),
///     ])
///     .build()
///     .unwrap();
/// assert_eq!(mm.output_of("q1").unwrap(), "y1");
/// assert_eq!(mm.successor("q0", "a").unwrap(), "q1");
/// ```
#[derive(Clone)]
pub struct MooreMachine {
    alphabet: Alphabet,
    states: OrderedMap<StateId, MooreState>,
}

impl MooreMachine {
    /// Returns a [`MooreBuilder`] for assembling a machine.
    pub fn builder() -> MooreBuilder {
        MooreBuilder::default()
    }

    pub(crate) fn from_parts(alphabet: Alphabet, states: OrderedMap<StateId, MooreState>) -> Self {
        debug_assert!(states.values().all(|s| s.targets.len() == alphabet.len()));
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

    /// Returns the output of `state`.
    pub fn output_of(&self, state: &str) -> Option<&Output> {
        self.states.get(state).map(|s| &s.output)
    }

    /// Returns the state that is reached from `state` on `symbol`.
    pub fn successor(&self, state: &str, symbol: &str) -> Option<&StateId> {
        let position = self.alphabet.position(symbol)?;
        self.states.get(state)?.targets.get(position)
    }

    /// Returns the successors of `state` together with their symbols.
    pub fn transitions_from(
        &self,
        state: &str,
    ) -> Option<impl Iterator<Item = (&Symbol, &StateId)> + '_> {
        self.states
            .get(state)
            .map(|s| self.alphabet.iter().zip(s.targets.iter()))
    }

    pub(crate) fn state_at(&self, index: usize) -> Option<(&StateId, &MooreState)> {
        self.states.get_index(index)
    }

    /// Returns all outputs of states, without duplicates and in order of first appearance.
    pub fn output_range(&self) -> Vec<&Output> {
        self.states.values().map(|s| &s.output).unique().collect()
    }
}

impl TransitionSystem for MooreMachine {
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
        self.states.get_index(index)?.1.targets.get(symbol)
    }

    fn restricted_to(&self, indices: &[usize]) -> Self {
        let states = indices
            .iter()
            .filter_map(|&q| self.states.get_index(q))
            .map(|(q, s)| (q.clone(), s.clone()))
            .collect();
        Self::from_parts(self.alphabet.clone(), states)
    }
}

impl PartialEq for MooreMachine {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.states.iter().eq(other.states.iter())
    }
}
impl Eq for MooreMachine {}

impl Debug for MooreMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for MooreMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = build_transition_table(
            self,
            |q| {
                self.states
                    .get_index(q)
                    .map(|(q, s)| format!("{q} [{}]", s.output))
                    .unwrap_or_default()
            },
            |q, a| {
                self.target(q, a)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            },
        );
        write!(f, "{table}")
    }
}

/// Helper struct for the construction of a [`MooreMachine`]. States are declared together
/// with their output through [`MooreBuilder::with_state_outputs`], in the order in which
/// they should appear; the first one is initial. Transitions may only connect declared
/// states.
#[derive(Debug, Clone, Default)]
pub struct MooreBuilder {
    outputs: OrderedMap<StateId, Output>,
    alphabet: Alphabet,
    transitions: Vec<(StateId, Symbol, StateId)>,
}

impl MooreBuilder {
    /// Declares states with their outputs.
    pub fn with_state_outputs<I, Q, O>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = (Q, O)>,
        Q: Into<StateId>,
        O: Into<Output>,
    {
        self.outputs
            .extend(outputs.into_iter().map(|(q, o)| (q.into(), o.into())));
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

    /// Adds transitions given as `(source, symbol, target)` triples.
    pub fn with_transitions<I, Q, A, P>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (Q, A, P)>,
        Q: Into<StateId>,
        A: Into<Symbol>,
        P: Into<StateId>,
    {
        for (q, a, p) in transitions {
            let a = a.into();
            self.alphabet.insert(a.clone());
            self.transitions.push((q.into(), a, p.into()));
        }
        self
    }

    /// Builds the machine. Fails if there are no states, if a transition touches a state
    /// without output, or if some state does not have exactly one successor per symbol.
    pub fn build(self) -> Result<MooreMachine> {
        if self.outputs.is_empty() {
            return Err(Error::EmptyAutomaton);
        }

        let mut rows: Vec<Vec<Option<StateId>>> =
            vec![vec![None; self.alphabet.len()]; self.outputs.len()];
        for (q, a, p) in self.transitions {
            let Some(source) = self.outputs.get_index_of(&q) else {
                return Err(Error::unknown_state(&q));
            };
            if !self.outputs.contains_key(&p) {
                return Err(Error::unknown_state(&p));
            }
            let symbol = self
                .alphabet
                .position(a.as_str())
                .expect("symbols are declared when the transition is added");
            if matches!(&rows[source][symbol], Some(existing) if *existing != p) {
                return Err(Error::ConflictingTransition { state: q, symbol: a });
            }
            rows[source][symbol] = Some(p);
        }

        let mut states = OrderedMap::default();
        for ((q, output), row) in self.outputs.into_iter().zip(rows) {
            let mut targets = Vec::with_capacity(row.len());
            for (position, p) in row.into_iter().enumerate() {
                let Some(p) = p else {
                    return Err(Error::MissingTransition {
                        state: q,
                        symbol: self
                            .alphabet
                            .get(position)
                            .cloned()
                            .expect("position stems from the alphabet"),
                    });
                };
                targets.push(p);
            }
            states.insert(q, MooreState { output, targets });
        }

        Ok(MooreMachine::from_parts(self.alphabet, states))
    }
}
