use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use enigma_rotor::{historical, ConfigError, EnigmaError, MachineConfig, Session, SessionError};

/// Enigma simulator.
///
/// Reads settings lines and messages from INPUT (default: standard input)
/// and writes the converted messages to OUTPUT (default: standard output).
#[derive(Parser, Debug)]
#[command(name = "enigma", version, about)]
struct Args {
    /// Trace every converted symbol on standard error
    #[arg(long)]
    verbose: bool,

    /// Use the built-in naval rotors; FILES is then [INPUT [OUTPUT]]
    #[arg(long)]
    builtin: bool,

    /// CONFIG [INPUT [OUTPUT]]
    #[arg(value_name = "FILES", num_args = 0..=3)]
    files: Vec<PathBuf>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Usage: enigma [--verbose] (CONFIG | --builtin) [INPUT [OUTPUT]]")]
    Usage,

    #[error("could not open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EnigmaError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(path) => {
            let f = File::open(path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(f)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, CliError> {
    match path {
        Some(path) => {
            let f = File::create(path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(f)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let (config, streams) = if args.builtin {
        if args.files.len() > 2 {
            return Err(CliError::Usage);
        }
        (historical::machine_config()?, &args.files[..])
    } else {
        let (path, rest) = args.files.split_first().ok_or(CliError::Usage)?;
        (MachineConfig::load(path)?, rest)
    };

    let input = open_input(streams.first())?;
    let output = open_output(streams.get(1))?;

    let mut session = Session::new(config.build()?);
    session.run(input, output)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
