pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::auth::{AuthClient, SessionStore};
use crate::error::ClientError;
use crate::library::{Agencies, AuditCriteria, AuditTypes, Auditors, DocumentTypes, UserAccounts};

#[derive(Parser)]
#[command(name = "auditlib")]
#[command(about = "Audit library console - manage internal-audit reference data")]
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
    #[command(about = "Login, logout and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Console settings (API and auth URLs)")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },

    #[command(about = "Overview of every library tab")]
    Library {
        #[command(subcommand)]
        cmd: commands::library::LibraryCommands,
    },

    #[command(about = "Audit areas and their hierarchy")]
    Areas {
        #[command(subcommand)]
        cmd: commands::areas::AreaCommands,
    },

    #[command(about = "Internal controls and their components")]
    Controls {
        #[command(subcommand)]
        cmd: commands::controls::ControlCommands,
    },

    #[command(about = "Agencies")]
    Agencies {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Auditors")]
    Auditors {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Audit criteria")]
    Criteria {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(name = "audit-types", about = "Types of audit")]
    AuditTypes {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(name = "document-types", about = "Types of document")]
    DocumentTypes {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "User accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
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

/// Client for the reference-data API, carrying the saved session token if any.
pub fn api_client() -> anyhow::Result<ApiClient> {
    let app = crate::config::config();
    let console = config::load_console_config()?;

    let mut api_config = app.api.clone();
    api_config.base_url = console.api_url(app);
    let client = ApiClient::from_config(&api_config)?;

    let session = config::FileSessionStore::in_config_dir()?.load()?;
    Ok(match session {
        Some(session) => {
            if session.is_expired() {
                tracing::warn!("Saved session expired; requests will likely be rejected");
            }
            client.with_token(session.token)
        }
        None => client,
    })
}

pub fn auth_client() -> anyhow::Result<AuthClient> {
    let app = crate::config::config();
    let console = config::load_console_config()?;

    let api = ApiClient::new(&console.auth_url(app), Duration::from_secs(app.api.timeout_secs))?;
    let store: Arc<dyn SessionStore> = Arc::new(config::FileSessionStore::in_config_dir()?);
    Ok(AuthClient::new(api, store))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format.clone()).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format.clone()).await,
        Commands::Library { cmd } => commands::library::handle(cmd, output_format.clone()).await,
        Commands::Areas { cmd } => commands::areas::handle(cmd, output_format.clone()).await,
        Commands::Controls { cmd } => commands::controls::handle(cmd, output_format.clone()).await,
        Commands::Agencies { cmd } => commands::records::handle::<Agencies>(cmd, output_format.clone()).await,
        Commands::Auditors { cmd } => commands::records::handle::<Auditors>(cmd, output_format.clone()).await,
        Commands::Criteria { cmd } => commands::records::handle::<AuditCriteria>(cmd, output_format.clone()).await,
        Commands::AuditTypes { cmd } => commands::records::handle::<AuditTypes>(cmd, output_format.clone()).await,
        Commands::DocumentTypes { cmd } => commands::records::handle::<DocumentTypes>(cmd, output_format.clone()).await,
        Commands::Users { cmd } => commands::records::handle::<UserAccounts>(cmd, output_format.clone()).await,
    };

    // Machine-readable failure on stdout; the binary still reports on stderr
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        if let Some(client_error) = e.downcast_ref::<ClientError>() {
            utils::output_error(&output_format, client_error)?;
        }
    }
    result
}
