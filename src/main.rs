use anyhow::{Context, Result};
use bitsim::areas::repository::Repository;
use bitsim::areas::shared::SharedRepository;
use bitsim::commands::shell::Shell;
use bitsim::config::RepositoryConfig;
use clap::{ArgAction, Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "BITSIM_LOG";

#[derive(Parser)]
#[command(
    name = "bitsim",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "An in-memory git repository simulator",
    long_about = "Simulates a git repository entirely in memory: commits, branches, \
    merges, rebases, cherry-picks and resets, driven by git-style commands. \
    Nothing is written to disk.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(long, global = true, help = "TOML file with repository defaults")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Print the final repository state as JSON")]
    json: bool,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "shell",
        about = "Start an interactive session",
        long_about = "Reads commands from standard input, one per line, until end of input or `exit`."
    )]
    Shell,
    #[command(
        name = "run",
        about = "Run a script of commands",
        long_about = "Executes each line of the script as if typed into the shell. \
        Blank lines and lines starting with '#' are skipped. Exits with an error \
        when any command was rejected."
    )]
    Run {
        #[arg(index = 1, help = "Path to the script")]
        script: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(format!("bitsim={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    colored::control::set_override(std::io::stdout().is_terminal());

    let config = RepositoryConfig::load(cli.config.as_deref())?;
    let repository = SharedRepository::new(Repository::initialized(config)?);
    let mut shell = Shell::new(repository.clone(), Box::new(std::io::stdout()));

    let failures = match &cli.command {
        Commands::Shell => {
            shell.run_interactive(std::io::stdin().lock())?;
            0
        }
        Commands::Run { script } => {
            let script = std::fs::read_to_string(script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            shell.run_script(&script)?
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&repository.snapshot())?);
    }

    anyhow::ensure!(failures == 0, "{failures} command(s) failed");

    Ok(())
}
