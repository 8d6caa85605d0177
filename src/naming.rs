//! Deterministic generation of fresh state names.
//!
//! All names are produced from an unbounded counter which is turned into a string by a
//! formatting function, so a generator never runs out of names and two calls never
//! produce the same name.

use crate::automaton::StateId;

/// Formats `n` in bijective base 26 using the letters `A` to `Z`, i.e. `0` becomes `A`,
/// `25` becomes `Z`, `26` becomes `AA` and so on.
///
/// ```
/// use mealy_moore::naming::alphabetic;
/// assert_eq!(alphabetic(0), "A");
/// assert_eq!(alphabetic(25), "Z");
/// assert_eq!(alphabetic(26), "AA");
/// assert_eq!(alphabetic(27), "AB");
/// ```
pub fn alphabetic(n: usize) -> String {
    let mut digits = vec![];
    let mut rest = n + 1;
    while rest > 0 {
        rest -= 1;
        digits.push(b'A' + (rest % 26) as u8);
        rest /= 26;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

/// Hands out the names `{prefix}0`, `{prefix}1`, ... in this order.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    prefix: String,
    next: usize,
}

impl NameGenerator {
    /// Creates a generator whose first name is `{prefix}0`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Returns the number of names that have been handed out so far.
    pub fn issued(&self) -> usize {
        self.next
    }

    /// Produces the next fresh name.
    pub fn fresh(&mut self) -> StateId {
        let name = StateId::from(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        name
    }
}

impl Iterator for NameGenerator {
    type Item = StateId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.fresh())
    }
}

/// Names the groups of successive refinement rounds. Round `r` uses the tag
/// [`alphabetic`]`(r)` as prefix, so labels of round 0 are `A0, A1, ...`, those of round 1
/// are `B0, B1, ...` and so forth.
#[derive(Debug, Clone, Default)]
pub struct GroupLabels {
    round: usize,
}

impl GroupLabels {
    /// Returns the index of the current round.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns the label of group `index` in the current round.
    pub fn label(&self, index: usize) -> StateId {
        StateId::from(format!("{}{}", alphabetic(self.round), index))
    }

    /// Advances to the next round.
    pub fn advance(&mut self) {
        self.round += 1;
    }
}
