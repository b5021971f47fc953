use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use loquat::config::LoquatConfig;
use loquat::console::{ConsoleOptions, TurnInterrupt, banner, run_repl};
use loquat::runtime::build_runtime;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Conversational agent console with calendar lookups
#[derive(Parser, Debug)]
#[command(name = "loquat", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model override for every turn
    #[arg(short, long)]
    model: Option<String>,

    /// Session id (defaults to a random UUID)
    #[arg(short, long)]
    session: Option<String>,

    /// Print each reply once complete instead of streaming fragments
    #[arg(long)]
    no_stream: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));
    // Stdin reads park a blocking thread that never returns on its own.
    runtime.shutdown_timeout(Duration::from_millis(100));
    code
}

async fn run(cli: Cli) -> ExitCode {
    let config = match LoquatConfig::load(cli.config.as_deref()).await {
        Ok(config) => config.with_process_env(),
        Err(err) => {
            eprintln!("Error: {}", err.message);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = lobserve::init_tracing(&config.log_level) {
        eprintln!("Warning: tracing subscriber not installed: {err}");
    }

    let bundle = match build_runtime(&config) {
        Ok(bundle) => bundle,
        Err(err) => {
            tracing::error!(error = %err, "failed to start");
            eprintln!("Error: {}", err.message);
            return ExitCode::FAILURE;
        }
    };

    let session_id = cli
        .session
        .filter(|session| !session.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let options = ConsoleOptions::new(session_id)
        .with_streaming(!cli.no_stream)
        .with_model(cli.model);

    let interrupt = TurnInterrupt::new();
    let shutdown = CancellationToken::new();
    spawn_interrupt_listener(interrupt.clone(), shutdown.clone());

    let mut stdout = tokio::io::stdout();
    let greeting = banner(config.provider.trim(), &options.session_id);
    if let Err(err) = stdout.write_all(format!("{greeting}\n").as_bytes()).await {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    match run_repl(
        &bundle.orchestrator,
        &options,
        stdin,
        &mut stdout,
        &interrupt,
        &shutdown,
    )
    .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Ctrl-C cancels the turn in flight; at the prompt it ends the session.
fn spawn_interrupt_listener(interrupt: TurnInterrupt, shutdown: CancellationToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !interrupt.interrupt() {
                shutdown.cancel();
                break;
            }
        }
    });
}
