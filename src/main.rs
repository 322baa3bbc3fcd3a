//! taskfile2d2 CLI - Taskfile in, D2 diagram out

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::info;

use taskfile2d2::{taskfile_to_d2, Config, ConvertError, FixSuggestion, IdScheme};

const EXAMPLES: &str = "\
Examples:
  # Write the diagram next to the input, as Taskfile.yml.d2
  taskfile2d2 Taskfile.yml

  # Choose the output file
  taskfile2d2 Taskfile.yml out.d2

  # Standard input to standard output
  taskfile2d2 < Taskfile.yml > out.d2
  curl -s http://example.com/Taskfile.yml | taskfile2d2 > out.d2";

#[derive(Parser)]
#[command(name = "taskfile2d2")]
#[command(about = "Generate a D2 diagram of task relationships from a Taskfile")]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Taskfile to read (standard input when omitted)
    input: Option<PathBuf>,

    /// Diagram file to write (default: <INPUT>.d2, or standard output for standard input)
    output: Option<PathBuf>,

    /// Config file (default: ~/.config/taskfile2d2/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave out the legend
    #[arg(long)]
    no_legend: bool,

    /// Key scheme for generated containers
    #[arg(long, value_enum)]
    ids: Option<IdScheme>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the diagram
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_legend {
        config.legend = false;
    }
    if let Some(ids) = cli.ids {
        config.ids = ids;
    }

    match cli.input {
        Some(input) => {
            let output = cli.output.unwrap_or_else(|| default_output(&input));
            convert_file(&input, &output, &config)
        }
        None if io::stdin().is_terminal() => {
            Cli::command().print_help()?;
            Ok(())
        }
        None => convert_stdin(cli.output.as_deref(), &config),
    }
}

fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<(), ConvertError> {
    let bytes = fs::read(input)?;
    let d2 = taskfile_to_d2(&bytes, config)?;
    fs::write(output, d2)?;
    info!(input = %input.display(), output = %output.display(), "Diagram written");
    Ok(())
}

fn convert_stdin(output: Option<&Path>, config: &Config) -> Result<(), ConvertError> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;
    let d2 = taskfile_to_d2(&bytes, config)?;
    match output {
        Some(path) => fs::write(path, d2)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(d2.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// `Taskfile.yml` -> `Taskfile.yml.d2`
fn default_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".d2");
    PathBuf::from(name)
}
