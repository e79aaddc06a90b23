use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use dotgather::cli::{Cli, Commands};
use dotgather::commands::{clean, disperse, gather, setup, undo};
use dotgather::output::{self, Verbosity};
use dotgather::prompt::{CONFIRM_PHRASE, Confirm, PhrasePrompt};
use dotgather::{DotgatherContext, GatherError, compare, home};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "DOTGATHER_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        output::error(&format!("{e:#}"));
        process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    output::set_verbosity(if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    });

    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    if let Some(path) = &cli.force_path {
        let prompt = format!(
            "you want to force the \"{}\" path. Bad things might happen?",
            path.display()
        );
        if !PhrasePrompt::terminal("Y").confirm(&prompt)? {
            return Err(GatherError::UserAborted("forcing an explicit path".to_string()).into());
        }
    }

    let user_home = dirs::home_dir().context("Could not find home directory")?;
    let cwd = std::env::current_dir().context("Could not read the current directory")?;
    let dotgather_home =
        home::resolve_dotgather_home(cli.dotgather_home.as_deref(), &cwd, &user_home)?;
    let host_dir = home::host_dir(&dotgather_home, cli.force_path.as_deref(), home::hostname())?;
    let ctx = DotgatherContext::load(dotgather_home, host_dir)?;
    output::verbose(&format!("Host directory: {}", ctx.host_dir.display()));

    match cli.command {
        Commands::Setup => setup::execute(&ctx, io::stdin().lock(), io::stdout())?,
        Commands::Gather => {
            gather::execute(&ctx)?;
        }
        Commands::Disperse => {
            let comparator = compare::from_config(&ctx.config)?;
            disperse::execute(&ctx, &*comparator)?;
        }
        Commands::Undo => {
            let comparator = compare::from_config(&ctx.config)?;
            undo::execute(&ctx, &*comparator, &mut PhrasePrompt::terminal(CONFIRM_PHRASE))?;
        }
        Commands::Clean => {
            clean::execute(&ctx, &mut PhrasePrompt::terminal(CONFIRM_PHRASE))?;
        }
        Commands::Completion { .. } => {}
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
