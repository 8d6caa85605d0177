use thiserror::Error;

use crate::automaton::{StateId, Symbol};

/// Everything that can go wrong while reading, transforming or writing a machine.
#[derive(Debug, Error)]
pub enum Error {
    /// The textual table is not shaped like a Mealy or Moore table, `line` is one-based.
    #[error("malformed table in line {line}: {reason}")]
    MalformedTable {
        /// The line in which the problem was detected.
        line: usize,
        /// Human readable description of the problem.
        reason: String,
    },
    /// A transition points to a state that was never declared.
    #[error("transition refers to unknown state \"{state}\"")]
    UnknownStateReference {
        /// The state that could not be found.
        state: StateId,
    },
    /// The machine does not have a single state.
    #[error("automaton has no states")]
    EmptyAutomaton,
    /// A state lacks an outgoing transition for some input symbol.
    #[error("state \"{state}\" has no transition on \"{symbol}\"")]
    MissingTransition {
        /// The incomplete state.
        state: StateId,
        /// The symbol without transition.
        symbol: Symbol,
    },
    /// A state has two different outgoing transitions for the same input symbol.
    #[error("state \"{state}\" has more than one transition on \"{symbol}\"")]
    ConflictingTransition {
        /// The nondeterministic state.
        state: StateId,
        /// The symbol with multiple transitions.
        symbol: Symbol,
    },
    /// Reading or writing a file failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    /// The requested operation does not exist.
    #[error("unknown operation \"{0}\", expected one of mealy-to-moore, moore-to-mealy, mealy, moore")]
    UnknownOperation(String),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedTable {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_state(state: &StateId) -> Self {
        Error::UnknownStateReference {
            state: state.clone(),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
