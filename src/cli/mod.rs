pub mod commands;
pub mod manifest;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rim-router")]
#[command(about = "Inspect route manifests and simulate guarded navigation")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Transform a raw route manifest and print the descriptor tree")]
    Inspect {
        #[arg(help = "Manifest file (JSON or YAML)")]
        manifest: PathBuf,
    },

    #[command(about = "Navigate through the dynamic router against a manifest")]
    Simulate {
        #[arg(help = "Manifest file (JSON or YAML)")]
        manifest: PathBuf,

        #[arg(long, help = "Session token; omit to navigate unauthenticated")]
        token: Option<String>,

        #[arg(long = "permission", help = "Granted permission key (repeatable)")]
        permissions: Vec<String>,

        #[arg(long, help = "Sign in with this token after the first navigation")]
        login_after: Option<String>,

        #[arg(required = true, help = "Paths to navigate to, in order")]
        paths: Vec<String>,
    },

    #[command(about = "Fetch the current user's routes from the remote menu endpoint")]
    Fetch {
        #[arg(long, help = "Override the configured base URL")]
        base_url: Option<String>,

        #[arg(long, help = "Bearer token for the request")]
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Inspect { manifest } => commands::inspect::handle(manifest, output_format).await,
        Commands::Simulate {
            manifest,
            token,
            permissions,
            login_after,
            paths,
        } => {
            let options = commands::simulate::SimulateOptions {
                manifest,
                token,
                permissions,
                login_after,
                paths,
            };
            commands::simulate::handle(options, output_format).await
        }
        Commands::Fetch { base_url, token } => {
            commands::fetch::handle(base_url, token, output_format).await
        }
    }
}
