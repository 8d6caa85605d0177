use mealy_moore::prelude::*;

use tracing::{error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("mealy-moore")
        .about("Converts between Mealy and Moore machines and minimizes them")
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .arg(
            Arg::new("operation")
                .required(true)
                .help("one of mealy-to-moore, moore-to-mealy, mealy (minimize) or moore (minimize)"),
        )
        .arg(
            Arg::new("input")
                .required(true)
                .help("file containing the table of the input machine"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .help("file the resulting table is written to"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::INFO,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn run(matches: &ArgMatches) -> Result<()> {
    let operation: Operation = matches
        .get_one::<String>("operation")
        .map(String::as_str)
        .unwrap_or_default()
        .parse()?;
    let (Some(input), Some(output)) = (
        matches.get_one::<String>("input"),
        matches.get_one::<String>("output"),
    ) else {
        unreachable!("clap enforces required arguments");
    };

    let start = std::time::Instant::now();
    transform_file(operation, input, output, &ConversionOptions::default())?;
    info!(
        "{operation} of {input} into {output} took {}µs",
        start.elapsed().as_micros()
    );
    Ok(())
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    if let Err(e) = run(&matches) {
        error!("{e}");
        std::process::exit(1);
    }
}
