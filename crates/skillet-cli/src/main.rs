//! Skillet - agent skill installer
//!
//! Usage:
//!   skillet add <source>        # Install from a path, owner/repo, URL or name
//!   skillet update [names...]   # Refresh installed skills from their sources
//!   skillet outdated            # Compare installed commits with upstream
//!   skillet targets             # List supported integrations

mod interactive;
mod output;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillet_core::commands::{
    InstallCommand, InstallOptions, OutdatedCommand, OutdatedOptions, UpdateCommand, UpdateOptions,
};
use skillet_core::context::AppContext;
use skillet_core::error::SkillError;
use skillet_core::integration::TargetRequest;
use skillet_core::source::{Chooser, NonInteractive};
use skillet_core::types::InstallScope;

use crate::interactive::DialoguerChooser;

#[derive(Parser)]
#[command(name = "skillet", version)]
#[command(about = "Install agent skills into AI coding tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a skill
    #[command(alias = "install")]
    Add(AddArgs),

    /// Re-fetch installed skills from their recorded sources
    Update {
        /// Skills to update (default: all installed)
        names: Vec<String>,

        /// Update skills in the home directory instead of the project
        #[arg(short = 'g', long)]
        global: bool,
    },

    /// Show installed skills whose upstream has moved on
    Outdated {
        /// Check skills in the home directory instead of the project
        #[arg(short = 'g', long)]
        global: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List supported integrations
    Targets,
}

#[derive(Args)]
struct AddArgs {
    /// Local path, owner/repo[/subpath], repository URL, or skill name
    source: String,

    /// Integration to install for (see `skillet targets`)
    #[arg(short, long, conflicts_with = "all")]
    target: Option<String>,

    /// Install for every integration
    #[arg(long)]
    all: bool,

    /// Install into the home directory instead of the project
    #[arg(short = 'g', long)]
    global: bool,

    /// Never prompt; fail when a choice would be needed
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillet=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Add(args) => run_add(args).await,
        Commands::Update { names, global } => {
            let ctx = AppContext::from_environment()?;
            let options = UpdateOptions {
                names,
                scope: scope(global),
            };
            let summary = UpdateCommand::new(&ctx).run(&options).await;
            output::print_update_summary(&mut io::stdout(), &summary)?;
            Ok(())
        }
        Commands::Outdated { global, format } => {
            let ctx = AppContext::from_environment()?;
            let remote = ctx.remote_services().await?;
            let options = OutdatedOptions { scope: scope(global) };
            let reports = OutdatedCommand::new(&ctx).run(&options, &remote).await;
            match format {
                OutputFormat::Table => output::print_outdated(&mut io::stdout(), &reports)?,
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&output::outdated_json(&reports))?)
                }
            }
            Ok(())
        }
        Commands::Targets => {
            output::print_targets(&mut io::stdout())?;
            Ok(())
        }
    }
}

async fn run_add(args: AddArgs) -> Result<()> {
    let ctx = AppContext::from_environment()?;
    let remote = ctx.remote_services().await?;

    let targets = match (args.target, args.all) {
        (Some(id), _) => TargetRequest::Explicit(id),
        (None, true) => TargetRequest::All,
        (None, false) => TargetRequest::Auto,
    };
    let options = InstallOptions::new(args.source)
        .with_targets(targets)
        .with_scope(scope(args.global));
    let chooser: Arc<dyn Chooser> = if args.yes {
        Arc::new(NonInteractive)
    } else {
        Arc::new(DialoguerChooser)
    };

    let outcome = InstallCommand::new(&ctx).run(&options, &remote, chooser).await?;
    output::print_install(&mut io::stdout(), &outcome)?;
    Ok(())
}

fn scope(global: bool) -> InstallScope {
    if global {
        InstallScope::Global
    } else {
        InstallScope::Project
    }
}

/// Print a fatal error. A cancelled selection is a clean exit.
fn report_error(err: &anyhow::Error) -> ExitCode {
    tracing::debug!("{:?}", err);
    match err.downcast_ref::<SkillError>() {
        Some(SkillError::Cancelled) => {
            println!("Cancelled; nothing was installed");
            ExitCode::SUCCESS
        }
        Some(SkillError::NotFound {
            message,
            suggestions,
        }) => {
            if let Err(e) = output::print_suggestions(&mut io::stderr(), message, suggestions) {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
        _ => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
