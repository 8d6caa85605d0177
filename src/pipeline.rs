//! End-to-end runs: read a table, drop unreachable states, transform the machine and write
//! the result as a table again.

use std::{fmt::Display, path::Path, str::FromStr};

use tracing::{debug, trace};

use crate::convert::mealy_to_moore_with_origins;
use crate::error::{Error, Result};
use crate::prelude::*;

/// The transformations that can be applied to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reads a Mealy table and writes the equivalent Moore table.
    MealyToMoore,
    /// Reads a Moore table and writes the equivalent Mealy table.
    MooreToMealy,
    /// Reads a Mealy table and writes the minimal equivalent Mealy table.
    #[cfg(feature = "minimize")]
    MinimizeMealy,
    /// Reads a Moore table and writes the minimal equivalent Moore table.
    #[cfg(feature = "minimize")]
    MinimizeMoore,
}

impl Operation {
    /// Returns the name under which the operation is selected.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::MealyToMoore => "mealy-to-moore",
            Operation::MooreToMealy => "moore-to-mealy",
            #[cfg(feature = "minimize")]
            Operation::MinimizeMealy => "mealy",
            #[cfg(feature = "minimize")]
            Operation::MinimizeMoore => "moore",
        }
    }

    /// Applies the operation to the table `input` with default [`ConversionOptions`].
    ///
    /// # Example
    /// ```
    /// use mealy_moore::prelude::*;
    ///
    /// let moore = Operation::MealyToMoore
    ///     .apply(";q0;q1\n0;q1/y1;q0/y0\n1;q0/y0;q1/y1\n")
    ///     .unwrap();
    /// assert_eq!(moore, ";y0;y1\n;q0;q1\n0;q1;q0\n1;q0;q1\n");
    /// ```
    pub fn apply(&self, input: &str) -> Result<String> {
        self.apply_with(input, &ConversionOptions::default())
    }

    /// Parses `input`, restricts the machine to its reachable states, transforms it and
    /// returns the resulting table. `options` only affect [`Operation::MealyToMoore`].
    pub fn apply_with(&self, input: &str, options: &ConversionOptions) -> Result<String> {
        debug!("applying {self}");
        let output = match self {
            Operation::MealyToMoore => {
                let mealy = parse_mealy(input)?.trim();
                trace!("reachable part of input\n{mealy}");
                write_moore(&mealy_to_moore_with_origins(&mealy, options)?.machine)
            }
            Operation::MooreToMealy => {
                let moore = parse_moore(input)?.trim();
                trace!("reachable part of input\n{moore}");
                write_mealy(&moore.to_mealy()?)
            }
            #[cfg(feature = "minimize")]
            Operation::MinimizeMealy => write_mealy(&parse_mealy(input)?.minimize()?),
            #[cfg(feature = "minimize")]
            Operation::MinimizeMoore => write_moore(&parse_moore(input)?.minimize()?),
        };
        Ok(output)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mealy-to-moore" => Ok(Operation::MealyToMoore),
            "moore-to-mealy" => Ok(Operation::MooreToMealy),
            #[cfg(feature = "minimize")]
            "mealy" => Ok(Operation::MinimizeMealy),
            #[cfg(feature = "minimize")]
            "moore" => Ok(Operation::MinimizeMoore),
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }
}

/// Reads the table in `input`, applies `operation` and writes the result to `output`. If
/// reading or transforming fails, `output` is left untouched.
pub fn transform_file(
    operation: Operation,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConversionOptions,
) -> Result<()> {
    let input = input.as_ref();
    debug!("reading table from {}", input.display());
    let table = std::fs::read_to_string(input)?;
    let result = operation.apply_with(&table, options)?;
    std::fs::write(output.as_ref(), result)?;
    debug!("wrote result of {operation} to {}", output.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEALY: &str = ";q0;q1\n0;q1/y1;q0/y0\n1;q0/y0;q1/y1\n";

    #[cfg(feature = "minimize")]
    #[test]
    fn operation_names() {
        for name in ["mealy-to-moore", "moore-to-mealy", "mealy", "moore"] {
            let op: Operation = name.parse().unwrap();
            assert_eq!(op.to_string(), name);
        }
        assert!(matches!(
            "minimize".parse::<Operation>(),
            Err(Error::UnknownOperation(name)) if name == "minimize"
        ));
    }

    #[test_log::test]
    fn unreachable_states_are_dropped() {
        let input = ";q0;q1;q2\n0;q1/y1;q0/y0;q0/y2\n1;q0/y0;q1/y1;q2/y2\n";
        let moore = Operation::MealyToMoore.apply(input).unwrap();
        assert_eq!(moore, ";y0;y1\n;q0;q1\n0;q1;q0\n1;q0;q1\n");

        let mealy = Operation::MooreToMealy
            .apply(";a;b;c\n;s;t;u\nx;t;s;s\n")
            .unwrap();
        assert_eq!(mealy, ";s;t\nx;t/b;s/a\n");
    }

    #[test]
    fn start_output_policy_is_respected() {
        let options =
            ConversionOptions::default().with_start_output(StartOutput::Fixed("init".into()));
        let moore = Operation::MealyToMoore
            .apply_with(";q0\n0;q0/y\n", &options)
            .unwrap();
        assert_eq!(moore, ";init;y\n;q0;q1\n0;q1;q1\n");
    }

    #[cfg(feature = "minimize")]
    #[test]
    fn minimization_operations() {
        assert_eq!(
            Operation::MinimizeMealy
                .apply(";p;q;r\na;q/0;r/0;q/0\n")
                .unwrap(),
            ";B0\na;B0/0\n"
        );
        assert_eq!(
            Operation::MinimizeMoore
                .apply(";0;0\n;p;q\na;q;p\n")
                .unwrap(),
            ";0\n;B0\na;B0\n"
        );
    }

    #[test]
    fn transform_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        let output = dir.path().join("output.csv");
        std::fs::write(&input, MEALY).unwrap();

        transform_file(
            Operation::MealyToMoore,
            &input,
            &output,
            &ConversionOptions::default(),
        )
        .unwrap();
        let moore = std::fs::read_to_string(&output).unwrap();
        assert_eq!(moore, ";y0;y1\n;q0;q1\n0;q1;q0\n1;q0;q1\n");

        std::fs::write(&input, moore).unwrap();
        transform_file(
            Operation::MooreToMealy,
            &input,
            &output,
            &ConversionOptions::default(),
        )
        .unwrap();
        let mealy: MealyMachine = std::fs::read_to_string(&output).unwrap().parse().unwrap();
        assert!(mealy.bisimilar(&MEALY.parse().unwrap()));
    }

    #[test]
    fn failures_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        let output = dir.path().join("output.csv");

        assert!(matches!(
            transform_file(
                Operation::MealyToMoore,
                &input,
                &output,
                &ConversionOptions::default()
            ),
            Err(Error::Io(_))
        ));

        std::fs::write(&input, ";q0\n0;q9/y\n").unwrap();
        assert!(matches!(
            transform_file(
                Operation::MealyToMoore,
                &input,
                &output,
                &ConversionOptions::default()
            ),
            Err(Error::UnknownStateReference { .. })
        ));
        assert!(!output.exists());
    }
}
