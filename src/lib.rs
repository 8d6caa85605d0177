//! Library for converting between Mealy and Moore machines and for minimizing them.
//!
//! Both kinds of machines are deterministic and complete: every state has exactly one
//! outgoing transition for each input symbol. A Mealy machine emits an output on each
//! transition, whereas a Moore machine emits the output of the state that is entered.
//! States, input symbols and outputs are opaque strings (see [`prelude::StateId`],
//! [`prelude::Symbol`] and [`prelude::Output`]), and states as well as symbols keep the
//! order in which they were declared. The first state is always the initial one.
//!
//! The most important trait is [`TransitionSystem`], which gives uniform access to the
//! states and transitions of both machine kinds. On top of it, [`Reachable`] computes the
//! states that can be reached from the initial state and [`minimization::Refinable`]
//! powers partition refinement.
//!
//! Machines are usually read from and written to `;`-separated tables, see [`table`], and
//! whole files can be transformed with [`pipeline::transform_file`].
//!
//! # Example
//! ```
//! use mealy_moore::prelude::*;
//!
//! let mealy: MealyMachine = ";q0;q1\n0;q1/y1;q0/y0\n1;q0/y0;q1/y1\n".parse().unwrap();
//! let moore = mealy.to_moore().unwrap();
//! assert_eq!(moore.size(), 2);
//! assert!(moore.to_mealy().unwrap().bisimilar(&mealy));
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use mealy_moore::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::{partition_refinement, Refinable, Refinement};
    #[cfg(feature = "random")]
    pub use super::random::{generate_random_mealy, generate_random_moore};
    pub use super::{
        automaton::{
            Alphabet, MealyBuilder, MealyMachine, MealyTransition, MooreBuilder, MooreMachine,
            MooreState, Output, StateId, Symbol, TransitionSystem, UNDEFINED_OUTPUT,
        },
        convert::{
            mealy_to_moore, mealy_to_moore_with_origins, moore_to_mealy, ConversionOptions,
            MooreConstruction, MooreOrigin, StartOutput,
        },
        error::{Error, Result},
        math,
        pipeline::{transform_file, Operation},
        reachable::{Reachable, ReachableStateIndices},
        table::{parse_mealy, parse_moore, write_mealy, write_moore},
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Defines the error type that is shared by all fallible operations.
pub mod error;
pub use error::{Error, Result};

pub mod naming;

/// Defines Mealy and Moore machines along with the [`TransitionSystem`] view on them.
pub mod automaton;
pub use automaton::TransitionSystem;

/// Breadth-first exploration of the states that can be reached from the initial state.
pub mod reachable;
pub use reachable::Reachable;

pub mod convert;

pub mod equivalence;

/// Minimization of Mealy and Moore machines through partition refinement.
#[cfg(feature = "minimize")]
pub mod minimization;

pub mod table;

pub mod pipeline;

/// Random generation of Mealy and Moore machines, mostly useful for testing and benchmarking.
#[cfg(feature = "random")]
pub mod random;
