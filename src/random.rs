use tracing::debug;

use crate::math::OrderedMap;
use crate::prelude::*;

fn alphabet_of_size(symbols: usize) -> Alphabet {
    (0..symbols).map(|a| format!("a{a}")).map(Symbol::from).collect()
}

fn state_names(size: usize) -> Vec<StateId> {
    (0..size).map(|q| StateId::from(format!("s{q}"))).collect()
}

fn random_output(rng: &mut fastrand::Rng, outputs: usize) -> Output {
    Output::from(format!("y{}", rng.usize(..outputs.max(1))))
}

/// Generates a random [`MealyMachine`] with `size` states over an alphabet of `symbols`
/// symbols. For every state and symbol, the target is drawn uniformly from all states and
/// the output uniformly from `outputs` distinct outputs. States are named `s0, s1, ...`,
/// symbols `a0, a1, ...` and outputs `y0, y1, ...`, the initial state is `s0`. Depending on
/// the drawn transitions, there may be unreachable states.
pub fn generate_random_mealy(symbols: usize, outputs: usize, size: usize) -> MealyMachine {
    generate_random_mealy_with(&mut fastrand::Rng::new(), symbols, outputs, size)
}

/// Works as [`generate_random_mealy`], but draws from the given random number generator,
/// which makes the result reproducible when `rng` is seeded.
pub fn generate_random_mealy_with(
    rng: &mut fastrand::Rng,
    symbols: usize,
    outputs: usize,
    size: usize,
) -> MealyMachine {
    let states = state_names(size);
    let machine: OrderedMap<_, _> = states
        .iter()
        .map(|q| {
            let row = (0..symbols)
                .map(|_| MealyTransition {
                    target: states[rng.usize(..size)].clone(),
                    output: random_output(rng, outputs),
                })
                .collect();
            (q.clone(), row)
        })
        .collect();
    debug!("generated random mealy machine with {size} states over {symbols} symbols");
    MealyMachine::from_parts(alphabet_of_size(symbols), machine)
}

/// Generates a random [`MooreMachine`], see [`generate_random_mealy`] for the naming
/// scheme. Every state gets an output drawn uniformly from `outputs` distinct outputs.
pub fn generate_random_moore(symbols: usize, outputs: usize, size: usize) -> MooreMachine {
    generate_random_moore_with(&mut fastrand::Rng::new(), symbols, outputs, size)
}

/// Works as [`generate_random_moore`], but draws from the given random number generator.
pub fn generate_random_moore_with(
    rng: &mut fastrand::Rng,
    symbols: usize,
    outputs: usize,
    size: usize,
) -> MooreMachine {
    let states = state_names(size);
    let machine: OrderedMap<_, _> = states
        .iter()
        .map(|q| {
            let state = MooreState {
                output: random_output(rng, outputs),
                targets: (0..symbols)
                    .map(|_| states[rng.usize(..size)].clone())
                    .collect(),
            };
            (q.clone(), state)
        })
        .collect();
    debug!("generated random moore machine with {size} states over {symbols} symbols");
    MooreMachine::from_parts(alphabet_of_size(symbols), machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Set;

    const RUNS: u64 = 40;

    fn every_state_reaches_only_known_states<Ts: TransitionSystem>(ts: &Ts) -> bool {
        (0..ts.size()).all(|q| {
            (0..ts.alphabet().len()).all(|a| matches!(ts.target_index(q, a), Some(Ok(_))))
        })
    }

    #[test]
    fn generated_machines_are_complete() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mealy = generate_random_mealy_with(&mut rng, 3, 2, 10);
        assert_eq!(mealy.size(), 10);
        assert_eq!(mealy.alphabet().len(), 3);
        assert_eq!(mealy.initial().unwrap(), "s0");
        assert!(every_state_reaches_only_known_states(&mealy));
        assert!(mealy.output_range().len() <= 2);

        let moore = generate_random_moore(2, 3, 5);
        assert_eq!(moore.size(), 5);
        assert!(every_state_reaches_only_known_states(&moore));

        let mut left = fastrand::Rng::with_seed(3);
        let mut right = fastrand::Rng::with_seed(3);
        assert_eq!(
            generate_random_mealy_with(&mut left, 2, 2, 6),
            generate_random_mealy_with(&mut right, 2, 2, 6)
        );
    }

    #[test]
    fn conversion_round_trip_preserves_behavior() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..RUNS {
            let mealy = generate_random_mealy_with(&mut rng, 2, 3, 8).trim();
            let moore = mealy.to_moore().unwrap();
            assert!(moore.is_trim());
            let back = moore.to_mealy().unwrap();
            assert_eq!(back.witness_inequivalence(&mealy), None);

            let moore = generate_random_moore_with(&mut rng, 3, 2, 8).trim();
            let mealy = moore.to_mealy().unwrap();
            let back = mealy.to_moore().unwrap();
            // the initial output of a moore machine is not observable through a mealy machine
            assert_eq!(
                back.to_mealy().unwrap().witness_inequivalence(&mealy),
                None
            );
        }
    }

    #[test]
    fn mealy_to_moore_states_are_reachable_pairs() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..RUNS {
            let mealy = generate_random_mealy_with(&mut rng, 2, 2, 6).trim();
            let construction =
                mealy_to_moore_with_origins(&mealy, &ConversionOptions::default()).unwrap();
            let pairs: Set<_> = construction.origins.right_values().collect();
            assert_eq!(pairs.len(), construction.machine.size());
            assert!(construction.machine.size() <= mealy.size() * (mealy.output_range().len() + 1));
        }
    }

    #[cfg(feature = "minimize")]
    #[test_log::test]
    fn minimization_preserves_behavior() {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..RUNS {
            let mealy = generate_random_mealy_with(&mut rng, 2, 2, 10);
            let minimized = mealy.minimize().unwrap();
            assert!(minimized.size() <= mealy.reachable_states().len());
            assert!(minimized.is_trim());
            assert_eq!(minimized.witness_inequivalence(&mealy.trim()), None);
            assert_eq!(minimized.minimize().unwrap().size(), minimized.size());

            let moore = generate_random_moore_with(&mut rng, 2, 2, 10);
            let minimized = moore.minimize().unwrap();
            assert!(minimized.size() <= moore.reachable_states().len());
            assert!(minimized.is_trim());
            assert!(minimized.bisimilar(&moore.trim()));
            assert_eq!(minimized.minimize().unwrap().size(), minimized.size());
        }
    }

    #[cfg(feature = "minimize")]
    #[test]
    fn minimal_machines_have_pairwise_distinguishable_states() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..RUNS {
            let minimized = generate_random_mealy_with(&mut rng, 2, 2, 7)
                .minimize()
                .unwrap();
            let rooted_at = |q: usize| {
                minimized.restricted_to(
                    &std::iter::once(q)
                        .chain((0..minimized.size()).filter(|&p| p != q))
                        .collect::<Vec<_>>(),
                )
            };
            for p in 0..minimized.size() {
                for q in (p + 1)..minimized.size() {
                    assert!(!rooted_at(p).bisimilar(&rooted_at(q)));
                }
            }
        }
    }
}
