//! Checks whether two machines of the same kind produce the same outputs on every input.
//!
//! Both checks explore the product of the two machines breadth-first, starting in the pair
//! of initial states. As soon as a pair of states is found which disagrees on some output,
//! the word leading there (extended by the offending symbol) is returned. Since the
//! exploration is breadth-first, this witness is a shortest one.

use std::collections::VecDeque;

use crate::math::Set;
use crate::prelude::*;

/// If some symbol is known to only one of the two systems, that symbol separates them.
fn alphabet_witness<L: TransitionSystem, R: TransitionSystem>(
    left: &L,
    right: &R,
) -> Option<Vec<Symbol>> {
    left.alphabet()
        .iter()
        .find(|a| !right.alphabet().contains(a.as_str()))
        .or_else(|| {
            right
                .alphabet()
                .iter()
                .find(|a| !left.alphabet().contains(a.as_str()))
        })
        .map(|a| vec![a.clone()])
}

/// Explores the product of `left` and `right` and calls `differs` for every pair of states
/// and symbol (given as position in the alphabet of `left` and `right` respectively). The
/// first time `differs` returns true, the word leading to the pair extended with the symbol
/// is returned.
fn explore_product<L, R, F>(left: &L, right: &R, differs: F) -> Option<Vec<Symbol>>
where
    L: TransitionSystem,
    R: TransitionSystem,
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let symbols: Vec<_> = left
        .alphabet()
        .iter()
        .enumerate()
        .filter_map(|(a, sym)| Some((a, right.alphabet().position(sym.as_str())?, sym)))
        .collect();

    let (Some(l0), Some(r0)) = (left.initial_index(), right.initial_index()) else {
        return (left.size() != right.size()).then(Vec::new);
    };

    let mut seen = Set::default();
    let mut queue = VecDeque::new();
    seen.insert((l0, r0));
    queue.push_back((vec![], l0, r0));

    while let Some((word, l, r)) = queue.pop_front() {
        for &(la, ra, sym) in &symbols {
            let mut extended = word.clone();
            extended.push(sym.clone());
            if differs(l, la, r, ra) {
                return Some(extended);
            }
            match (left.target_index(l, la), right.target_index(r, ra)) {
                (Some(Ok(p)), Some(Ok(q))) => {
                    if seen.insert((p, q)) {
                        queue.push_back((extended, p, q));
                    }
                }
                _ => return Some(extended),
            }
        }
    }
    None
}

impl MealyMachine {
    /// Attempts to construct a shortest word on which `self` and `other` produce different
    /// outputs. If the two machines are equivalent, `None` is returned.
    ///
    /// # Example
    /// ```
    /// use mealy_moore::prelude::*;
    ///
    /// let left = MealyMachine::builder()
    ///     .with_transitions([("p", "a", "q", "0"), ("q", "a", "q", "1")])
    ///     .build()
    ///     .unwrap();
    /// let right = MealyMachine::builder()
    ///     .with_transitions([("r", "a", "r", "0")])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(left.witness_inequivalence(&right), Some(vec!["a".into(), "a".into()]));
    /// assert!(left.bisimilar(&left));
    /// ```
    pub fn witness_inequivalence(&self, other: &MealyMachine) -> Option<Vec<Symbol>> {
        alphabet_witness(self, other).or_else(|| {
            explore_product(self, other, |l, la, r, ra| {
                self.transition_at(l, la).map(|t| &t.output)
                    != other.transition_at(r, ra).map(|t| &t.output)
            })
        })
    }

    /// Returns true if `self` and `other` produce the same outputs on every input.
    pub fn bisimilar(&self, other: &MealyMachine) -> bool {
        self.witness_inequivalence(other).is_none()
    }
}

impl MooreMachine {
    /// Attempts to construct a shortest word on which `self` and `other` produce different
    /// outputs. The empty word is returned if the initial states have different outputs.
    /// If the two machines are equivalent, `None` is returned.
    pub fn witness_non_bisimilarity(&self, other: &MooreMachine) -> Option<Vec<Symbol>> {
        let output_at = |m: &MooreMachine, q: usize| m.state_at(q).map(|(_, s)| s.output.clone());
        if let (Some(l0), Some(r0)) = (self.initial_index(), other.initial_index()) {
            if output_at(self, l0) != output_at(other, r0) {
                return Some(vec![]);
            }
        }
        alphabet_witness(self, other).or_else(|| {
            explore_product(self, other, |l, la, r, ra| {
                let left = self.target(l, la).and_then(|p| self.output_of(p.as_str()));
                let right = other.target(r, ra).and_then(|p| other.output_of(p.as_str()));
                left != right
            })
        })
    }

    /// Returns true if `self` and `other` produce the same outputs on every input.
    pub fn bisimilar(&self, other: &MooreMachine) -> bool {
        self.witness_non_bisimilarity(other).is_none()
    }
}
