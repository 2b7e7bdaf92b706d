use clap::{Parser as ClapParser, Subcommand};
use ls_lang::cli::{self, CheckOptions, CheckResult, CliError, RunOptions};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "lsrun")]
#[command(about = "LS - run the scripts embedded in a markup document")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the LS scripts embedded in a document
    Run {
        /// Markup document (reads from stdin if not provided)
        document: Option<PathBuf>,

        /// Registry manifest mapping script names to builtin callables
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Print the final document markup after all scripts ran
        #[arg(long)]
        print_document: bool,
    },

    /// Validate an LS script's syntax without executing it
    Check {
        /// Script file (reads from stdin if not provided)
        script: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            document,
            registry,
            print_document,
        } => run(document, registry, print_document),
        Commands::Check { script } => check(script),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Read a file, or stdin when no path is given and input is piped.
fn read_input(path: Option<PathBuf>) -> Result<(String, PathBuf), CliError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            let base = path.parent().map(PathBuf::from).unwrap_or_default();
            Ok((text, base))
        }
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok((buffer, PathBuf::from(".")))
        }
        None => Err(CliError::NoInput),
    }
}

fn run(
    document: Option<PathBuf>,
    registry: Option<PathBuf>,
    print_document: bool,
) -> Result<(), CliError> {
    let (markup, base) = read_input(document)?;
    let manifest = registry.map(fs::read_to_string).transpose()?;

    let options = RunOptions {
        markup,
        base,
        manifest,
        print_document,
    };

    if let Some(markup) = cli::execute_run(&options)? {
        println!("{}", markup);
    }
    Ok(())
}

fn check(script: Option<PathBuf>) -> Result<(), CliError> {
    let (source, _) = read_input(script)?;
    let options = CheckOptions { source };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid { statements } => {
            println!("Syntax is valid ({} statement(s))", statements);
        }
    }
    Ok(())
}
