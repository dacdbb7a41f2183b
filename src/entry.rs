//! Process entry: argument parsing, settings resolution, runtime setup and
//! the exit-code contract.
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use crate::api::ApiClient;
use crate::args::{Command, HarnessArgs};
use crate::config::{self, Settings};
use crate::error::AppResult;
use crate::harness::{self, MediaPool, RunContext, report};
use crate::{logger, smoke};

/// Parses the CLI, resolves settings and runs the requested mode.
///
/// Returns `ExitCode::SUCCESS` only when every workflow (or the smoke
/// sweep) succeeded; any failed workflow turns into a non-zero exit.
///
/// # Errors
///
/// Returns setup failures: bad CLI/config input, unreadable resource
/// directories, or a runtime that cannot be built. Workflow failures are
/// not errors; they are reported per workflow and reflected in the exit
/// code.
pub fn run() -> AppResult<ExitCode> {
    let args = HarnessArgs::parse();
    logger::init_logging(args.verbose, args.no_color);

    let config = config::load_config(args.config.as_deref())?;
    let settings = config::resolve(&args, config.as_ref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match args.command {
        Some(Command::Smoke) => {
            runtime.block_on(smoke::run(&settings))?;
            Ok(ExitCode::SUCCESS)
        }
        None => runtime.block_on(run_load(settings)),
    }
}

async fn run_load(settings: Settings) -> AppResult<ExitCode> {
    let client = ApiClient::new(settings.base_url.clone(), settings.timeout)?;
    let media = MediaPool::scan(&settings.audio_dir, &settings.images_dir)?;
    info!(
        workflows = settings.workflows,
        concurrency = settings.concurrency.get(),
        iterations = settings.iterations,
        visibility = settings.visibility.as_str(),
        "starting load run against {}",
        settings.base_url
    );

    let started = Instant::now();
    let ctx = Arc::new(RunContext {
        client,
        media,
        iterations: settings.iterations,
        password: settings.password,
        visibility: settings.visibility,
    });
    let reports = harness::run(ctx, settings.workflows, settings.concurrency).await;

    for line in report::lines(&reports, started.elapsed()) {
        println!("{line}");
    }

    if report::all_succeeded(&reports) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
