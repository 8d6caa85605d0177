//! Reading and writing machines as `;`-separated tables.
//!
//! A Mealy table starts with a header row listing the states (the first cell is left
//! blank), every further row starts with an input symbol followed by one `target/output`
//! cell per state:
//! ```text
//! ;q0;q1
//! 0;q1/y1;q0/y0
//! 1;q0/y0;q1/y1
//! ```
//! A Moore table has two header rows, the first one lists the output of each state, the
//! second one the states themselves. The remaining rows only contain targets:
//! ```text
//! ;y0;y1
//! ;q0;q1
//! 0;q1;q0
//! 1;q0;q1
//! ```
//! The first state of a table is the initial state.

use std::str::FromStr;

use itertools::Itertools;
use tracing::trace;

use crate::error::{Error, Result};
use crate::math::{OrderedMap, OrderedSet};
use crate::prelude::*;

const SEPARATOR: char = ';';

/// A nonempty line of a table, split into trimmed cells.
struct Row<'a> {
    line: usize,
    cells: Vec<&'a str>,
}

fn rows(input: &str) -> impl Iterator<Item = Row<'_>> + '_ {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let mut cells = line.split(SEPARATOR).map(str::trim).collect_vec();
            if cells.len() > 1 && cells.last() == Some(&"") {
                cells.pop();
            }
            Row {
                line: i + 1,
                cells,
            }
        })
}

fn header_states(row: &Row<'_>) -> Result<OrderedSet<StateId>> {
    let mut states = OrderedSet::default();
    for &name in &row.cells[1..] {
        if name.is_empty() {
            return Err(Error::malformed(row.line, "state names must not be empty"));
        }
        if !states.insert(StateId::from(name)) {
            return Err(Error::malformed(
                row.line,
                format!("state \"{name}\" is declared twice"),
            ));
        }
    }
    if states.is_empty() {
        return Err(Error::EmptyAutomaton);
    }
    Ok(states)
}

/// Checks that `row` has one cell per state and declares a fresh input symbol, which is
/// then added to `alphabet`.
fn transition_row(row: &Row<'_>, states: usize, alphabet: &mut Alphabet) -> Result<()> {
    if row.cells.len() != states + 1 {
        return Err(Error::malformed(
            row.line,
            format!(
                "expected {} cells but found {}",
                states + 1,
                row.cells.len()
            ),
        ));
    }
    let symbol = row.cells[0];
    if symbol.is_empty() {
        return Err(Error::malformed(row.line, "input symbol must not be empty"));
    }
    if !alphabet.insert(Symbol::from(symbol)) {
        return Err(Error::malformed(
            row.line,
            format!("input symbol \"{symbol}\" appears twice"),
        ));
    }
    Ok(())
}

fn declared_target(line: usize, target: &str, states: &OrderedSet<StateId>) -> Result<StateId> {
    if target.is_empty() {
        return Err(Error::malformed(line, "transition target must not be empty"));
    }
    states
        .get(target)
        .cloned()
        .ok_or_else(|| Error::unknown_state(&StateId::from(target)))
}

/// Parses a Mealy table, see the [module documentation](self) for the format.
pub fn parse_mealy(input: &str) -> Result<MealyMachine> {
    let mut rows = rows(input);
    let Some(header) = rows.next() else {
        return Err(Error::malformed(1, "missing header row with state names"));
    };
    let states = header_states(&header)?;

    let mut alphabet = Alphabet::default();
    let mut transitions: Vec<Vec<MealyTransition>> = vec![vec![]; states.len()];
    for row in rows {
        transition_row(&row, states.len(), &mut alphabet)?;
        for (column, cell) in row.cells[1..].iter().enumerate() {
            let Some((target, output)) = cell.split_once('/') else {
                return Err(Error::malformed(
                    row.line,
                    format!("cell \"{cell}\" is not of the form target/output"),
                ));
            };
            let target = declared_target(row.line, target.trim(), &states)?;
            transitions[column].push(MealyTransition::new(target, output.trim()));
        }
    }

    trace!(
        "parsed mealy table with {} states and {} symbols",
        states.len(),
        alphabet.len()
    );
    Ok(MealyMachine::from_parts(
        alphabet,
        states.into_iter().zip(transitions).collect(),
    ))
}

/// Parses a Moore table, see the [module documentation](self) for the format. A target
/// cell may carry a `/output` suffix, which is ignored.
pub fn parse_moore(input: &str) -> Result<MooreMachine> {
    let mut rows = rows(input);
    let Some(outputs) = rows.next() else {
        return Err(Error::malformed(1, "missing header row with state outputs"));
    };
    let Some(header) = rows.next() else {
        return Err(Error::malformed(
            outputs.line + 1,
            "missing header row with state names",
        ));
    };
    let states = header_states(&header)?;
    if outputs.cells.len() != header.cells.len() {
        return Err(Error::malformed(
            outputs.line,
            format!(
                "{} outputs given for {} states",
                outputs.cells.len().saturating_sub(1),
                states.len()
            ),
        ));
    }

    let mut alphabet = Alphabet::default();
    let mut targets: Vec<Vec<StateId>> = vec![vec![]; states.len()];
    for row in rows {
        transition_row(&row, states.len(), &mut alphabet)?;
        for (column, cell) in row.cells[1..].iter().enumerate() {
            let target = cell.split_once('/').map_or(*cell, |(target, _)| target);
            targets[column].push(declared_target(row.line, target.trim(), &states)?);
        }
    }

    let machine: OrderedMap<_, _> = states
        .into_iter()
        .zip(outputs.cells[1..].iter().zip(targets))
        .map(|(q, (&output, targets))| {
            (
                q,
                MooreState {
                    output: Output::from(output),
                    targets,
                },
            )
        })
        .collect();
    trace!(
        "parsed moore table with {} states and {} symbols",
        machine.len(),
        alphabet.len()
    );
    Ok(MooreMachine::from_parts(alphabet, machine))
}

/// Writes `mm` as a Mealy table, states in the order of the machine and rows in the
/// order of the alphabet.
pub fn write_mealy(mm: &MealyMachine) -> String {
    let mut out = String::new();
    out.push_str(&header_line(mm.states()));
    for (a, symbol) in mm.alphabet().iter().enumerate() {
        let cells = (0..mm.size()).map(|q| {
            mm.transition_at(q, a)
                .map(|t| t.to_string())
                .unwrap_or_default()
        });
        out.push_str(&symbol_line(symbol, cells));
    }
    out
}

/// Writes `mm` as a Moore table, states in the order of the machine and rows in the
/// order of the alphabet.
pub fn write_moore(mm: &MooreMachine) -> String {
    let mut out = String::new();
    out.push_str(&header_line(
        (0..mm.size()).filter_map(|q| mm.state_at(q).map(|(_, s)| &s.output)),
    ));
    out.push_str(&header_line(mm.states()));
    for (a, symbol) in mm.alphabet().iter().enumerate() {
        let cells = (0..mm.size()).map(|q| {
            mm.target(q, a)
                .map(|p| p.to_string())
                .unwrap_or_default()
        });
        out.push_str(&symbol_line(symbol, cells));
    }
    out
}

fn header_line<T: std::fmt::Display>(cells: impl Iterator<Item = T>) -> String {
    format!("{SEPARATOR}{}\n", cells.map(|c| c.to_string()).join(";"))
}

fn symbol_line(symbol: &Symbol, mut cells: impl Iterator<Item = String>) -> String {
    format!("{symbol}{SEPARATOR}{}\n", cells.join(";"))
}

impl FromStr for MealyMachine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_mealy(s)
    }
}

impl FromStr for MooreMachine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_moore(s)
    }
}

impl MealyMachine {
    /// Renders `self` as a Mealy table, see [`write_mealy`].
    pub fn to_table(&self) -> String {
        write_mealy(self)
    }
}

impl MooreMachine {
    /// Renders `self` as a Moore table, see [`write_moore`].
    pub fn to_table(&self) -> String {
        write_moore(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEALY: &str = ";q0;q1\n0;q1/y1;q0/y0\n1;q0/y0;q1/y1\n";
    const MOORE: &str = ";y0;y1\n;q0;q1\n0;q1;q0\n1;q0;q1\n";

    #[test]
    fn mealy_table() {
        let mm: MealyMachine = MEALY.parse().unwrap();
        assert_eq!(mm.states().collect_vec(), vec!["q0", "q1"]);
        assert_eq!(mm.alphabet().iter().collect_vec(), vec!["0", "1"]);
        assert_eq!(
            mm.transition("q0", "0"),
            Some(&MealyTransition::new("q1", "y1"))
        );
        assert_eq!(mm.to_table(), MEALY);
    }

    #[test]
    fn moore_table() {
        let mm: MooreMachine = MOORE.parse().unwrap();
        assert_eq!(mm.output_of("q1").unwrap(), "y1");
        assert_eq!(mm.successor("q0", "0").unwrap(), "q1");
        assert_eq!(mm.to_table(), MOORE);
    }

    #[test]
    fn lenient_formatting() {
        let mm = parse_mealy("; q0 ; q1 ;\r\n\r\n0;q1/y1;q0/y0;\r\n1; q0/y0 ;q1/y1\r\n").unwrap();
        assert_eq!(mm.to_table(), MEALY);

        let mm = parse_moore(";y0;y1;\n;q0;q1;\n0;q1/y1;q0/y0;\n1;q0;q1;\n").unwrap();
        assert_eq!(mm.to_table(), MOORE);
    }

    #[test]
    fn header_without_transitions() {
        let mm = parse_mealy(";s0\n").unwrap();
        assert_eq!(mm.size(), 1);
        assert!(mm.alphabet().is_empty());
    }

    #[test]
    fn malformed_tables() {
        assert!(matches!(
            parse_mealy(""),
            Err(Error::MalformedTable { line: 1, .. })
        ));
        assert!(matches!(parse_mealy(";\n"), Err(Error::EmptyAutomaton)));
        assert!(matches!(
            parse_mealy(";q0;q1\n0;q1/y1\n"),
            Err(Error::MalformedTable { line: 2, .. })
        ));
        assert!(matches!(
            parse_mealy(";q0\n0;q0\n"),
            Err(Error::MalformedTable { line: 2, .. })
        ));
        assert!(matches!(
            parse_mealy(";q0;q0\n"),
            Err(Error::MalformedTable { line: 1, .. })
        ));
        assert!(matches!(
            parse_mealy(";q0\n0;q0/y\n0;q0/y\n"),
            Err(Error::MalformedTable { line: 3, .. })
        ));
        assert!(matches!(
            parse_mealy(";q0\n0;q7/y\n"),
            Err(Error::UnknownStateReference { state }) if state == "q7"
        ));
        assert!(matches!(
            parse_moore(";y0\n"),
            Err(Error::MalformedTable { line: 2, .. })
        ));
        assert!(matches!(
            parse_moore(";y0;y1\n;q0\n"),
            Err(Error::MalformedTable { line: 1, .. })
        ));
        assert!(matches!(
            parse_moore(";y0\n;q0\na;q1\n"),
            Err(Error::UnknownStateReference { state }) if state == "q1"
        ));
    }
}
