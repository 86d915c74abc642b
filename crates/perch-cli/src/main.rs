use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use perch_core::ShortcutLocations;

mod completion;
mod dispatch;
mod render;

use completion::CliCompletionShell;
use dispatch::run_cli;

#[derive(Parser, Debug)]
#[command(name = "perch")]
#[command(about = "Desktop integration for per-user application installs", long_about = None)]
struct Cli {
    /// Install root holding `packages/` and the `app-<version>` directories.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Application name used for the uninstall key and default root.
    #[arg(long, global = true)]
    app_name: Option<String>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the release manifest with the latest and current versions.
    Releases,
    RegisterUninstall {
        #[arg(long)]
        uninstall_command: String,
        #[arg(long, default_value = "--silent")]
        quiet_switch: String,
        #[arg(long)]
        json: bool,
    },
    UnregisterUninstall,
    CreateShortcuts {
        #[arg(long)]
        exe: String,
        #[arg(long, default_value = "all", value_parser = parse_locations)]
        locations: ShortcutLocations,
    },
    RemoveShortcuts {
        #[arg(long)]
        exe: String,
        #[arg(long, default_value = "all", value_parser = parse_locations)]
        locations: ShortcutLocations,
    },
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

fn parse_locations(value: &str) -> std::result::Result<ShortcutLocations, String> {
    ShortcutLocations::parse_list(value).map_err(|err| err.to_string())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_cli(cli)
}
