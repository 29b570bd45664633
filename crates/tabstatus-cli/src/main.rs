mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, prefs::PrefsSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tabstatus",
    about = "Mirror the focused browser tab into your Slack status",
    version,
    propagate_version = true
)]
struct Cli {
    /// Settings directory (default: ~/.config/tabstatus)
    #[arg(long, global = true, env = "TABSTATUS_HOME")]
    home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire credentials from the browser and mirror the focused tab until interrupted
    Run {
        /// DevTools endpoint of the browser (overrides devtools_url in config.yaml)
        #[arg(long)]
        devtools_url: Option<String>,
    },

    /// Show the status text a tab title would produce
    Sanitize {
        /// Raw tab title
        title: String,

        /// URL of the tab (selects host-level redaction)
        #[arg(long, default_value = "")]
        url: String,

        /// Maximum status length (default: max_status_len from config.yaml)
        #[arg(long)]
        max_len: Option<usize>,
    },

    /// List workspaces seen at the last credential acquisition
    Workspaces,

    /// Show and change preferences
    Prefs {
        #[command(subcommand)]
        subcommand: PrefsSubcommand,
    },

    /// Inspect and validate config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = tabstatus_core::paths::resolve_home(cli.home.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|home| match cli.command {
            Commands::Run { devtools_url } => cmd::run::run(&home, devtools_url.as_deref()),
            Commands::Sanitize {
                title,
                url,
                max_len,
            } => cmd::sanitize::run(&home, &title, &url, max_len, cli.json),
            Commands::Workspaces => cmd::workspaces::run(&home, cli.json),
            Commands::Prefs { subcommand } => cmd::prefs::run(&home, subcommand, cli.json),
            Commands::Config { subcommand } => cmd::config::run(&home, subcommand, cli.json),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
