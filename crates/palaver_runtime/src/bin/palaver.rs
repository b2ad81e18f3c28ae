//! Palaver CLI entry point.

use clap::Parser;
use palaver_engine::{Engine, EngineConfig};
use palaver_runtime::{Chat, DEFAULT_START_INTENT, ScriptedEditor};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run a Palaver conversation script.
#[derive(Parser, Debug)]
#[command(name = "palaver", version, about)]
struct Cli {
    /// Script to load.
    script: PathBuf,

    /// Intent run when the session opens.
    #[arg(long, default_value = DEFAULT_START_INTENT)]
    start: String,

    /// Do not run a start intent.
    #[arg(long, conflicts_with = "start")]
    no_start: bool,

    /// Seed for template randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of inputs kept in the input history.
    #[arg(long)]
    history_limit: Option<usize>,

    /// Enable debug logging.
    #[arg(long, env = "PALAVER_DEBUG")]
    debug: bool,

    /// Read lines from stdin and echo a transcript instead of prompting.
    #[arg(short, long)]
    batch: bool,

    /// Load the script, report diagnostics, and exit.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::new();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(limit) = cli.history_limit {
        config = config.with_history_limit(limit);
    }

    let mut engine = Engine::from_file_with_config(&cli.script, config)?;
    let seed = engine.config().seed;
    palaver_stdlib::register_all_with_seed(engine.registry_mut(), seed);

    for diagnostic in engine.diagnostics() {
        eprintln!("\x1b[33mwarning: {diagnostic}\x1b[0m");
    }

    if cli.check {
        println!(
            "{}: {} intent(s): {}",
            cli.script.display(),
            engine.intents().len(),
            engine.intents().join(", ")
        );
        return Ok(());
    }

    let start = (!cli.no_start).then_some(cli.start);

    if cli.batch {
        let editor = ScriptedEditor::from_reader(io::stdin().lock())?;
        Chat::with_editor(engine, editor)
            .with_start_intent(start)
            .with_echo(true)
            .run()?;
    } else {
        Chat::new(engine)?.with_start_intent(start).run()?;
    }

    Ok(())
}
