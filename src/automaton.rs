use std::{borrow::Borrow, fmt::Debug, fmt::Display};

use owo_colors::OwoColorize;

use crate::math::OrderedSet;

mod mealy;
pub use mealy::{MealyBuilder, MealyMachine, MealyTransition};

mod moore;
pub use moore::{MooreBuilder, MooreMachine, MooreState};

/// Output that is emitted by a state which is never entered through a transition, this is
/// used as the output of the initial state of a Moore machine when nothing leads back to it.
pub const UNDEFINED_OUTPUT: &str = "-";

macro_rules! string_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(String);

        impl $name {
            /// Wraps the given string.
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Returns the underlying string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&$name> for $name {
            fn from(value: &$name) -> Self {
                value.clone()
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_token!(
    /// Opaque name of a state, unique within one machine.
    StateId
);
string_token!(
    /// An input symbol, i.e. the label that selects an outgoing transition.
    Symbol
);
string_token!(
    /// An output symbol, emitted on a transition (Mealy) or by a state (Moore).
    Output
);

/// The ordered collection of input symbols a machine reacts to. The order is fixed once the
/// machine is built and determines the order of transitions in every state as well as the
/// order in which symbols are explored.
#[derive(Clone, Default)]
pub struct Alphabet(OrderedSet<Symbol>);

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}
impl Eq for Alphabet {}

impl Alphabet {
    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there is no symbol at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbols in their fixed order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.0.iter()
    }

    /// Returns the position of `symbol` if it is part of the alphabet.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.0.get_index_of(symbol)
    }

    /// Returns the symbol at the given position.
    pub fn get(&self, position: usize) -> Option<&Symbol> {
        self.0.get_index(position)
    }

    /// Returns true if `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    /// Adds `symbol` at the end, returning false if it was already present.
    pub(crate) fn insert(&mut self, symbol: Symbol) -> bool {
        self.0.insert(symbol)
    }
}

impl Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Common view on Mealy and Moore machines: a finite, ordered collection of states where
/// every state has exactly one successor for each symbol of the [`Alphabet`]. States are
/// addressed by their position, the state at position `0` is the initial one.
pub trait TransitionSystem {
    /// Returns the alphabet of input symbols.
    fn alphabet(&self) -> &Alphabet;

    /// Returns the number of states.
    fn size(&self) -> usize;

    /// Returns the name of the state at position `index`.
    fn state_id(&self, index: usize) -> Option<&StateId>;

    /// Looks up the position of the state named `state`.
    fn index_of(&self, state: &str) -> Option<usize>;

    /// Returns the name of the state that is reached from the state at position `index` on the
    /// symbol at position `symbol`.
    fn target(&self, index: usize, symbol: usize) -> Option<&StateId>;

    /// Builds a new system that only contains the states at the given positions, in the given
    /// order. Transitions into states that are dropped are kept as they are, so callers should
    /// only drop states that cannot be entered from the kept ones.
    fn restricted_to(&self, indices: &[usize]) -> Self
    where
        Self: Sized;

    /// Returns the position of the initial state, which is `None` if there are no states.
    fn initial_index(&self) -> Option<usize> {
        (self.size() > 0).then_some(0)
    }

    /// Returns the name of the initial state.
    fn initial(&self) -> Option<&StateId> {
        self.initial_index().and_then(|q| self.state_id(q))
    }

    /// Returns true if there are no states.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Resolves the target of the transition from `index` on `symbol` to a position. If the
    /// target is not a state of `self`, the name of the missing state is returned as error.
    fn target_index(&self, index: usize, symbol: usize) -> Option<Result<usize, &StateId>> {
        let target = self.target(index, symbol)?;
        Some(self.index_of(target.as_str()).ok_or(target))
    }
}

/// Renders the transition table of `ts` as a rounded [`tabled`] table. The first column
/// holds the state (as given by `state_decorator`), every further column one input symbol,
/// with the cells produced by `cell_decorator`. The initial state is printed in bold.
pub(crate) fn build_transition_table<Ts, SD, CD>(
    ts: &Ts,
    state_decorator: SD,
    cell_decorator: CD,
) -> String
where
    Ts: TransitionSystem,
    SD: Fn(usize) -> String,
    CD: Fn(usize, usize) -> String,
{
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(
        std::iter::once("State".to_string()).chain(ts.alphabet().iter().map(|s| s.to_string())),
    );
    for q in 0..ts.size() {
        let state = state_decorator(q);
        let mut row = vec![if Some(q) == ts.initial_index() {
            state.bold().to_string()
        } else {
            state
        }];
        row.extend((0..ts.alphabet().len()).map(|a| cell_decorator(q, a)));
        builder.push_record(row);
    }

    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}
