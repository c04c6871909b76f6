use std::env;
use std::fs;
use std::io;

use anyhow::{Context, Error};
use clap::{App, AppSettings, Arg};
use env_logger::{Builder, Target};
use log::{error, info, LevelFilter};

use varisat::dimacs::DimacsParser;

use diagsat::ops;
use diagsat::{
    compute_conflicts_and_diagnoses, parse_literals, DiagnosisConfig, DiagnosisConfigUpdate,
    DiagnosisModel,
};

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let mut builder = Builder::new();
    builder.target(Target::Stdout).filter(None, LevelFilter::Warn);

    if let Ok(ref env_var) = env::var("DIAGSAT_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn main_with_err() -> Result<i32, Error> {
    init_logging();

    let matches = App::new("diagsat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Computes minimal conflicts and minimal diagnoses of a CNF knowledge base")
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("[INPUT] 'The DIMACS CNF input file to use (stdin if omitted)'")
        .arg(
            Arg::with_name("candidates")
                .long("candidates")
                .short("c")
                .value_name("LITERALS")
                .help("Candidate assumption literals, whitespace or comma separated")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("background")
                .long("background")
                .short("b")
                .value_name("LITERALS")
                .help("Background assumption literals, whitespace or comma separated")
                .takes_value(true),
        )
        .arg_from_usage("[config-file] --config=[FILE] 'Read parameters from configuration file'")
        .arg(
            Arg::from_usage("[config-option] -C --config-option")
                .value_name("OPTION>=<VALUE")
                .help("Specify a single config option, e.g. -C max_depth=3")
                .multiple(true)
                .number_of_values(1),
        )
        .arg_from_usage(
            "[max-conflicts] --max-conflicts=[N] 'Maximum number of conflicts to compute (-1: no limit)'",
        )
        .arg_from_usage("[max-depth] --max-depth=[N] 'Maximum expansion depth, 0 for no limit'")
        .arg_from_usage("[solver] --solver=[NAME] 'SAT solver backend to use'")
        .arg_from_usage("--fastdiag 'Compute a single preferred diagnosis instead of enumerating'")
        .get_matches();

    let mut update = DiagnosisConfigUpdate::new();

    if let Some(config_path) = matches.value_of("config-file") {
        let config_contents = fs::read_to_string(config_path)
            .with_context(|| format!("could not read configuration file '{}'", config_path))?;
        update.merge(toml::from_str(&config_contents)?);
    }

    if let Some(options) = matches.values_of("config-option") {
        for option in options {
            update.merge(toml::from_str(option)?);
        }
    }

    if let Some(solver_name) = matches.value_of("solver") {
        update.merge(DiagnosisConfigUpdate {
            solver_name: Some(solver_name.to_owned()),
            ..DiagnosisConfigUpdate::default()
        });
    }
    if let Some(max_conflicts) = matches.value_of("max-conflicts") {
        update.merge(DiagnosisConfigUpdate {
            max_conflicts: Some(
                max_conflicts
                    .parse()
                    .context("--max-conflicts expects an integer")?,
            ),
            ..DiagnosisConfigUpdate::default()
        });
    }
    if let Some(max_depth) = matches.value_of("max-depth") {
        update.merge(DiagnosisConfigUpdate {
            max_depth: Some(max_depth.parse().context("--max-depth expects an integer")?),
            ..DiagnosisConfigUpdate::default()
        });
    }

    let mut config = DiagnosisConfig::default();
    update.apply(&mut config);

    let stdin = io::stdin();

    let formula = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            let file = fs::File::open(path).with_context(|| format!("could not open '{}'", path))?;
            DimacsParser::parse(file)?
        }
        None => {
            info!("Reading from stdin");
            DimacsParser::parse(stdin.lock())?
        }
    };

    let candidates = parse_literals(matches.value_of("candidates").unwrap(), "candidate set")?;
    let background = match matches.value_of("background") {
        Some(text) => parse_literals(text, "background set")?,
        None => vec![],
    };
    let model = DiagnosisModel::new(formula, candidates, background)?;

    let result = if matches.is_present("fastdiag") {
        ops::fastdiag(&model, &config)?
    } else {
        compute_conflicts_and_diagnoses(&model, &config)?
    };

    for message in result.messages.iter() {
        println!("{}", message);
    }

    Ok(0)
}
