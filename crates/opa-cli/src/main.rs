use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use opa_core::advisor::cancellation;
use opa_core::catalog::IndexLoader;
use opa_core::{AdvisorConfig, RenderedReport};

mod args;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays valid YAML.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run(command: args::Command) -> Result<()> {
    let args::Command::Static(args) = command;

    let config = AdvisorConfig {
        index_reference: args.catalog.clone(),
        operator_package: args.operator.clone(),
        channel: args.channel.clone(),
        aggregate: args.aggregate,
    };
    let loader = IndexLoader::for_reference(&args.catalog, &args.opm);

    let (handle, cancel) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            handle.cancel();
        }
    });

    let report = opa_core::advise(config, &loader, &cancel)
        .await
        .context("failed to compute operator permissions")?;
    let rendered = RenderedReport::new(&report).context("failed to serialize RBAC documents")?;

    // Extraction has fully succeeded at this point; only now touch outputs.
    let writer = output::PermissionsOutputWriter {
        rendered,
        role: args::destination(&args.role),
        cluster_role: args::destination(&args.cluster_role),
    };
    writer
        .write_view(args.output, &mut io::stdout().lock())
        .context("failed to write to stdout")?;
    writer.write_files()
}
