//! Conversion between Mealy and Moore machines.
//!
//! Going from Moore to Mealy is a matter of moving every state output onto the transitions
//! that enter the state. The other direction splits every Mealy state into one Moore state
//! per output with which it can be entered, see [`mealy_to_moore`].

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::math::{Bijection, OrderedMap};
use crate::naming::NameGenerator;
use crate::prelude::*;

/// Decides which output the initial state of a Moore machine gets when it is constructed
/// from a Mealy machine. The initial state is entered without taking a transition, so
/// there is no transition whose output it could inherit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartOutput {
    /// Use the lexicographically smallest output among all transitions that enter the
    /// initial state, or [`UNDEFINED_OUTPUT`] if there are none.
    #[default]
    SmallestIncoming,
    /// Use the output of the first transition entering the initial state, scanning states
    /// in order and each state in alphabet order. Falls back to [`UNDEFINED_OUTPUT`].
    FirstIncoming,
    /// Always use the given output.
    Fixed(Output),
}

/// Options that influence the construction of a Moore machine from a Mealy machine.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// How the output of the initial state is chosen.
    pub start_output: StartOutput,
}

impl ConversionOptions {
    /// Uses the given policy for the output of the initial state.
    pub fn with_start_output(mut self, start_output: StartOutput) -> Self {
        self.start_output = start_output;
        self
    }
}

/// Identifies a state of a Moore machine built by [`mealy_to_moore`]: it is the Mealy
/// state `state`, entered with output `output`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MooreOrigin {
    /// The underlying Mealy state.
    pub state: StateId,
    /// The output with which the state is entered.
    pub output: Output,
}

impl MooreOrigin {
    /// Creates the origin of `state` entered with `output`.
    pub fn new(state: impl Into<StateId>, output: impl Into<Output>) -> Self {
        Self {
            state: state.into(),
            output: output.into(),
        }
    }
}

/// The result of [`mealy_to_moore_with_origins`]: the Moore machine together with the
/// [`MooreOrigin`] of each of its states.
#[derive(Debug, Clone)]
pub struct MooreConstruction {
    /// The constructed machine.
    pub machine: MooreMachine,
    /// Associates every state of `machine` with the pair it was created for.
    pub origins: Bijection<StateId, MooreOrigin>,
}

fn start_output(mealy: &MealyMachine, start: &StateId, policy: &StartOutput) -> Output {
    let mut incoming = mealy
        .transitions()
        .filter(|(_, _, t)| t.target == *start)
        .map(|(_, _, t)| &t.output);
    let chosen = match policy {
        StartOutput::Fixed(output) => return output.clone(),
        StartOutput::SmallestIncoming => incoming.min(),
        StartOutput::FirstIncoming => incoming.next(),
    };
    chosen
        .cloned()
        .unwrap_or_else(|| Output::from(UNDEFINED_OUTPUT))
}

/// Builds a Moore machine that produces the same outputs as `mealy` on every input, using
/// the default [`ConversionOptions`]. See [`mealy_to_moore_with_origins`] for details.
///
/// # Example
/// ```
/// use mealy_moore::prelude::*;
///
/// let mealy = MealyMachine::builder()
///     .with_transitions([("s0", "a", "s1", "x"), ("s1", "a", "s1", "y")])
///     .build()
///     .unwrap();
/// let moore = mealy_to_moore(&mealy).unwrap();
/// assert_eq!(moore.states().collect::<Vec<_>>(), vec!["q0", "q1", "q2"]);
/// assert_eq!(moore.output_of("q0").unwrap(), UNDEFINED_OUTPUT);
/// assert_eq!(moore.output_of("q2").unwrap(), "y");
/// ```
pub fn mealy_to_moore(mealy: &MealyMachine) -> Result<MooreMachine> {
    mealy_to_moore_with_origins(mealy, &ConversionOptions::default()).map(|c| c.machine)
}

/// Builds a Moore machine that produces the same outputs as `mealy` on every input.
///
/// Every state of the result corresponds to a pair of a Mealy state and an output with
/// which that state is entered. Starting from the initial pair, whose output is determined
/// by the [`StartOutput`] policy in `options`, pairs are discovered breadth-first: for a
/// pair `(q, y)` and each symbol `a` in alphabet order, the transition of `q` on `a` yields
/// the pair consisting of its target and its output. Pairs are named `q0, q1, ...` in the
/// order in which they are discovered, so only pairs reachable from the initial one are
/// created and the numbering is deterministic.
///
/// Fails with [`Error::EmptyAutomaton`] if `mealy` has no states and with
/// [`Error::UnknownStateReference`] if some transition leads to a state that does not exist.
pub fn mealy_to_moore_with_origins(
    mealy: &MealyMachine,
    options: &ConversionOptions,
) -> Result<MooreConstruction> {
    let Some(start) = mealy.initial() else {
        return Err(Error::EmptyAutomaton);
    };
    let initial = MooreOrigin {
        state: start.clone(),
        output: start_output(mealy, start, &options.start_output),
    };
    trace!("initial moore state is {initial:?}");

    let mut names = NameGenerator::with_prefix("q");
    let mut origins = Bijection::new();
    let mut queue = VecDeque::new();
    origins.insert(names.fresh(), initial.clone());
    queue.push_back(initial);

    let mut states = OrderedMap::default();
    while let Some(origin) = queue.pop_front() {
        let Some(index) = mealy.index_of(origin.state.as_str()) else {
            return Err(Error::unknown_state(&origin.state));
        };
        let row = mealy
            .row(index)
            .expect("index was obtained from the machine itself");

        let mut targets = Vec::with_capacity(row.len());
        for t in row {
            if !mealy.contains(t.target.as_str()) {
                return Err(Error::unknown_state(&t.target));
            }
            let successor = MooreOrigin::new(&t.target, &t.output);
            let name = match origins.get_by_right(&successor) {
                Some(name) => name.clone(),
                None => {
                    let name = names.fresh();
                    trace!("discovered {successor:?} as {name}");
                    origins.insert(name.clone(), successor.clone());
                    queue.push_back(successor);
                    name
                }
            };
            targets.push(name);
        }

        let name = origins
            .get_by_right(&origin)
            .cloned()
            .expect("every queued pair has been named");
        states.insert(
            name,
            MooreState {
                output: origin.output,
                targets,
            },
        );
    }

    debug!(
        "converted mealy machine with {} states into moore machine with {} states",
        mealy.size(),
        states.len()
    );
    Ok(MooreConstruction {
        machine: MooreMachine::from_parts(mealy.alphabet().clone(), states),
        origins,
    })
}

/// Builds a Mealy machine that produces the same outputs as `moore` on every nonempty
/// input by attaching to each transition the output of the state it leads to. The states
/// and their order stay the same.
///
/// Fails with [`Error::EmptyAutomaton`] if there are no states and with
/// [`Error::UnknownStateReference`] if a transition leads to a state that has no output.
///
/// # Example
/// ```
/// use mealy_moore::prelude::*;
///
/// let moore = MooreMachine::builder()
///     .with_state_outputs([("q0", "y0"), ("q1", "y1")])
///     .with_transitions([("q0", "a", "q1"), ("q1", "a", "q1")])
///     .build()
///     .unwrap();
/// let mealy = moore_to_mealy(&moore).unwrap();
/// assert_eq!(mealy.transition("q0", "a").unwrap().output, "y1");
/// ```
pub fn moore_to_mealy(moore: &MooreMachine) -> Result<MealyMachine> {
    if moore.is_empty() {
        return Err(Error::EmptyAutomaton);
    }

    let mut states = OrderedMap::default();
    for index in 0..moore.size() {
        let (q, state) = moore
            .state_at(index)
            .expect("index is smaller than the number of states");
        let row = state
            .targets
            .iter()
            .map(|p| match moore.output_of(p.as_str()) {
                Some(output) => Ok(MealyTransition::new(p, output)),
                None => Err(Error::unknown_state(p)),
            })
            .collect::<Result<Vec<_>>>()?;
        states.insert(q.clone(), row);
    }

    debug!("attached outputs of {} moore states to their incoming transitions", moore.size());
    Ok(MealyMachine::from_parts(moore.alphabet().clone(), states))
}

impl MealyMachine {
    /// Converts `self` into an equivalent [`MooreMachine`], see [`mealy_to_moore`].
    pub fn to_moore(&self) -> Result<MooreMachine> {
        mealy_to_moore(self)
    }
}

impl MooreMachine {
    /// Converts `self` into an equivalent [`MealyMachine`], see [`moore_to_mealy`].
    pub fn to_mealy(&self) -> Result<MealyMachine> {
        moore_to_mealy(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn two_state_mealy() -> MealyMachine {
        MealyMachine::builder()
            .with_transitions([
                ("q0", "0", "q1", "y1"),
                ("q0", "1", "q0", "y0"),
                ("q1", "0", "q0", "y0"),
                ("q1", "1", "q1", "y1"),
            ])
            .build()
            .unwrap()
    }

    fn start_with_mixed_incoming() -> MealyMachine {
        MealyMachine::builder()
            .with_transitions([
                ("s0", "a", "s0", "y1"),
                ("s0", "b", "s1", "y0"),
                ("s1", "a", "s0", "y0"),
                ("s1", "b", "s1", "y1"),
            ])
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn two_state_conversion() {
        let construction =
            mealy_to_moore_with_origins(&two_state_mealy(), &ConversionOptions::default())
                .unwrap();
        let moore = &construction.machine;
        assert_eq!(moore.size(), 2);
        assert_eq!(moore.output_of("q0").unwrap(), "y0");
        assert_eq!(moore.output_of("q1").unwrap(), "y1");
        assert_eq!(moore.successor("q0", "0").unwrap(), "q1");
        assert_eq!(moore.successor("q0", "1").unwrap(), "q0");
        assert_eq!(moore.successor("q1", "0").unwrap(), "q0");
        assert_eq!(moore.successor("q1", "1").unwrap(), "q1");
        assert_eq!(
            construction.origins.get_by_left("q1"),
            Some(&MooreOrigin::new("q1", "y1"))
        );
        assert!(moore.bisimilar(&moore.clone()));
        assert!(moore.to_mealy().unwrap().bisimilar(&two_state_mealy()));
    }

    #[test]
    fn start_without_incoming_transitions_is_undefined() {
        let mealy = MealyMachine::builder()
            .with_transitions([("s0", "a", "s1", "x"), ("s1", "a", "s1", "y")])
            .build()
            .unwrap();
        let moore = mealy.to_moore().unwrap();
        assert_eq!(
            moore.output_range(),
            vec![UNDEFINED_OUTPUT, "x", "y"]
        );
        assert_eq!(moore.successor("q2", "a").unwrap(), "q2");
    }

    #[test]
    fn start_output_policies() {
        let mealy = start_with_mixed_incoming();

        let smallest = mealy.to_moore().unwrap();
        assert_eq!(smallest.size(), 4);
        assert_eq!(smallest.output_of("q0").unwrap(), "y0");
        assert_eq!(smallest.successor("q2", "a").unwrap(), "q0");

        let first = mealy_to_moore_with_origins(
            &mealy,
            &ConversionOptions::default().with_start_output(StartOutput::FirstIncoming),
        )
        .unwrap();
        assert_eq!(first.machine.size(), 4);
        assert_eq!(first.machine.output_of("q0").unwrap(), "y1");
        assert_eq!(first.machine.successor("q0", "a").unwrap(), "q0");

        let fixed = mealy_to_moore_with_origins(
            &mealy,
            &ConversionOptions::default().with_start_output(StartOutput::Fixed("z".into())),
        )
        .unwrap();
        assert_eq!(fixed.machine.size(), 5);
        assert_eq!(fixed.origins.get_by_left("q0"), Some(&MooreOrigin::new("s0", "z")));

        for construction in [first, fixed] {
            assert!(construction.machine.to_mealy().unwrap().bisimilar(&mealy));
        }
        assert!(smallest.to_mealy().unwrap().bisimilar(&mealy));
    }

    #[test]
    fn composite_keys_do_not_collide() {
        // with string concatenation both pairs would be keyed as "a_b_c"
        let mealy = MealyMachine::builder()
            .with_transitions([
                ("a", "0", "a_b", "c"),
                ("a", "1", "a", "b_c"),
                ("a_b", "0", "a", "b_c"),
                ("a_b", "1", "a_b", "c"),
            ])
            .build()
            .unwrap();
        let construction =
            mealy_to_moore_with_origins(&mealy, &ConversionOptions::default()).unwrap();
        assert_eq!(construction.machine.size(), 2);
        assert_eq!(
            construction
                .origins
                .right_values()
                .map(|o| (o.state.as_str(), o.output.as_str()))
                .sorted()
                .collect_vec(),
            vec![("a", "b_c"), ("a_b", "c")]
        );
    }

    #[test]
    fn unknown_targets_are_reported() {
        let mealy = MealyMachine::from_parts(
            ["a"].into_iter().collect(),
            [(StateId::from("s0"), vec![MealyTransition::new("s9", "x")])]
                .into_iter()
                .collect(),
        );
        assert!(matches!(
            mealy.to_moore(),
            Err(Error::UnknownStateReference { state }) if state == "s9"
        ));

        let moore = MooreMachine::from_parts(
            ["a"].into_iter().collect(),
            [(
                StateId::from("s0"),
                MooreState {
                    output: "y".into(),
                    targets: vec!["s9".into()],
                },
            )]
            .into_iter()
            .collect(),
        );
        assert!(matches!(
            moore.to_mealy(),
            Err(Error::UnknownStateReference { state }) if state == "s9"
        ));
    }

    #[test]
    fn empty_machines_are_rejected() {
        let mealy = MealyMachine::from_parts(Alphabet::default(), Default::default());
        assert!(matches!(mealy.to_moore(), Err(Error::EmptyAutomaton)));
        let moore = MooreMachine::from_parts(Alphabet::default(), Default::default());
        assert!(matches!(moore.to_mealy(), Err(Error::EmptyAutomaton)));
    }

    #[test]
    fn moore_to_mealy_keeps_states() {
        let moore = MooreMachine::builder()
            .with_state_outputs([("p", "0"), ("r", "1"), ("s", "1")])
            .with_transitions([
                ("p", "a", "r"),
                ("p", "b", "s"),
                ("r", "a", "p"),
                ("r", "b", "r"),
                ("s", "a", "s"),
                ("s", "b", "p"),
            ])
            .build()
            .unwrap();
        let mealy = moore_to_mealy(&moore).unwrap();
        assert_eq!(mealy.states().collect_vec(), vec!["p", "r", "s"]);
        assert_eq!(
            mealy.transitions_from("s").unwrap().collect_vec(),
            vec![
                (&Symbol::from("a"), &MealyTransition::new("s", "1")),
                (&Symbol::from("b"), &MealyTransition::new("p", "0")),
            ]
        );
    }
}
