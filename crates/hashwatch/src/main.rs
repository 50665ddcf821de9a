use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hashwatch::{Config, Monitor, relay_interrupts};
use hashwatch_fetch::{Fetcher, ReqwestClient};
use hashwatch_ledger::Ledger;
use hashwatch_store::{ContentStore, ExtensionResolver, FixOptions, SignatureResolver, Unavailable, fix_extensions};
use tokio::sync::watch;

use crate::cli::{App, Commands, FixArg, RunArg};

mod cli;

fn main() -> ExitCode {
    init_tracing();

    match run(App::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("critical failure: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(mut app: App) -> Result<()> {
    if !app.no_anchor {
        app.absolutize().context("failed to resolve command-line paths")?;
        anchor_to_executable();
    }
    tracing::info!(cwd = ?std::env::current_dir().ok(), "working directory");

    let config = Config::load(app.config.as_deref(), &app.overrides()).context("failed to load configuration")?;

    match app.cmd {
        Commands::Run(arg) => run_passes(&config, &arg),
        Commands::Fix(arg) => fix(&config, &arg),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config).context("failed to render configuration")?);
            Ok(())
        }
    }
}

/// Resolve relative paths against the executable's directory. Best effort.
fn anchor_to_executable() {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    match dir.map(|dir| std::env::set_current_dir(&dir).map(|()| dir)) {
        Some(Ok(dir)) => tracing::debug!(dir = %dir.display(), "anchored to executable directory"),
        Some(Err(e)) => tracing::debug!(error = %e, "could not anchor to executable directory"),
        None => tracing::debug!("executable directory unknown"),
    }
}

fn run_passes(config: &Config, arg: &RunArg) -> Result<()> {
    let store = ContentStore::open(&config.cache_dir)
        .context("failed to open content store")?
        .with_options(config.store_options());
    let mut ledger = Ledger::seeded(store.root()).context("failed to seed ledger")?;

    let options = config.fetch_options();
    let client = ReqwestClient::new(&options)?;
    let fetcher = Fetcher::new(client, config.endpoint.clone()).with_options(options);

    let resolver: Box<dyn ExtensionResolver> = if config.sniff {
        Box::new(SignatureResolver)
    } else {
        Box::new(Unavailable)
    };
    let monitor = Monitor::new(fetcher, store, resolver, config.monitor_options());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    tracing::info!(
        endpoint = %config.endpoint,
        passes = arg.passes,
        delay_secs = config.delay_secs,
        "do {} passes, one every {} seconds",
        arg.passes,
        config.delay_secs
    );

    let report = runtime.block_on(async {
        let (tx, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            if relay_interrupts(tokio::signal::ctrl_c, tx).await {
                tracing::warn!("second interrupt, exiting without a summary");
                std::process::exit(130);
            }
        });
        monitor.run(&mut ledger, arg.passes, &mut rx).await
    });

    tracing::info!(passes = report.passes, interrupted = report.interrupted, "run finished");

    let summary = ledger.summary();
    if arg.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn fix(config: &Config, arg: &FixArg) -> Result<()> {
    let store = ContentStore::open(&config.cache_dir)
        .context("failed to open content store")?
        .with_options(config.store_options());
    let options = FixOptions { dry_run: arg.dry_run };
    let report = fix_extensions(&store, &SignatureResolver, options).context("extension fix failed")?;
    println!("{report}");
    Ok(())
}
