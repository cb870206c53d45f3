mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use uninet_api::LocalClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Map `-v` counts onto a log filter; `RUST_LOG` wins when set.
fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Profile commands don't need a controller connection
        Command::Profile(args) => commands::profile::handle(args, &cli.global),

        // Neither does discarding the cached session
        Command::Logout => {
            let store = uninet_api::SessionStore::new(uninet_config::session_path());
            store.clear();
            if !cli.global.quiet {
                eprintln!("Session discarded");
            }
            Ok(())
        }

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "uninet", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the controller
        cmd => {
            let controller_config = build_controller_config(&cli.global)?;
            let client = LocalClient::new(controller_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
fn build_controller_config(
    global: &cli::GlobalOpts,
) -> Result<uninet_api::ControllerConfig, CliError> {
    let cfg = uninet_config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return config::resolve_profile(profile, &profile_name, global);
    }

    // No profile on disk -- flags and env vars must carry everything
    if global.controller.is_none() {
        return Err(CliError::NoConfig {
            path: uninet_config::config_path().display().to_string(),
        });
    }

    config::resolve_profile(&uninet_config::Profile::default(), &profile_name, global)
}
