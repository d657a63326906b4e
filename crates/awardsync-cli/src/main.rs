mod config;
mod display;

use std::process::ExitCode;

use anyhow::Context;
use awardsync_core::EntryExport;
use awardsync_sync::{EntrySynchronizer, ExportedMedia, Phases, sync_all, sync_one};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "awardsync", version, about = "Sync award entries into the Shotgun tracking service")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync one entry by its local id
    Sync(SyncArgs),
    /// Sync the details of every entry in the export
    SyncAll,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Local entry id
    entry_id: i64,

    /// Skip the submission, people and slates
    #[arg(long)]
    no_details: bool,

    /// Skip the primary media
    #[arg(long)]
    no_media: bool,

    /// Skip the before/after media
    #[arg(long)]
    no_alternate_media: bool,

    /// Skip the supplemental PDF
    #[arg(long)]
    no_supplemental: bool,
}

impl SyncArgs {
    fn phases(&self) -> Phases {
        Phases {
            details: !self.no_details,
            primary_media: !self.no_media,
            alternate_media: !self.no_alternate_media,
            supplemental: !self.no_supplemental,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("awardsync v{}", env!("CARGO_PKG_VERSION"));

    let settings = &cli.settings;
    let export = EntryExport::load(&settings.entries)
        .with_context(|| format!("loading entries from {}", settings.entries.display()))?;
    let config = settings.sync_config();
    let tracking = settings.tracking();
    let storage = settings.storage()?;
    let slates = settings.slates();
    let probe = settings.probe();
    let locator = ExportedMedia;
    let synchronizer = EntrySynchronizer::new(
        &config,
        &tracking,
        storage.as_ref(),
        &slates,
        &probe,
        &locator,
    );

    match &cli.command {
        Command::Sync(args) => {
            let outcome = sync_one(&export, &synchronizer, args.entry_id, args.phases()).await;
            display::print_outcome(&outcome);
            Ok(ExitCode::from(outcome.failure_code() as u8))
        }
        Command::SyncAll => {
            if let Some(summary) = sync_all(&export, &synchronizer).await {
                display::print_summary(&summary);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
