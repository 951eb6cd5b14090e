use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{get_config_dir, load_console_config, save_console_config};
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show effective settings")]
    Show,

    #[command(about = "Set a console setting (api_url, auth_url)")]
    Set {
        #[arg(help = "Setting name")]
        key: String,
        #[arg(help = "Value")]
        value: String,
    },

    #[command(about = "Remove a console setting, falling back to the environment")]
    Unset {
        #[arg(help = "Setting name")]
        key: String,
    },

    #[command(about = "Print the configuration directory")]
    Path,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let app = crate::config::config();
            let console = load_console_config()?;
            let value = json!({
                "environment": app.environment,
                "api_url": console.api_url(app),
                "auth_url": console.auth_url(app),
                "timeout_secs": app.api.timeout_secs,
                "request_logging": app.api.enable_request_logging,
                "root_sentinel": app.hierarchy.root_sentinel,
                "parent_scope": app.hierarchy.parent_scope,
            });
            output_value(&output_format, &value, || {
                println!("Environment:   {:?}", app.environment);
                println!("API URL:       {}", console.api_url(app));
                println!("Auth URL:      {}", console.auth_url(app));
                println!("Timeout:       {}s", app.api.timeout_secs);
                println!("Root sentinel: {:?}", app.hierarchy.root_sentinel);
                println!("Parent scope:  {:?}", app.hierarchy.parent_scope);
                Ok(())
            })
        }
        ConfigCommands::Set { key, value } => {
            let mut console = load_console_config()?;
            if !console.set(&key, &value) {
                return Err(anyhow::anyhow!("Unknown setting '{}' (expected api_url or auth_url)", key));
            }
            save_console_config(&console)?;
            output_success(&output_format, &format!("Set {} = {}", key, value), None)
        }
        ConfigCommands::Unset { key } => {
            let mut console = load_console_config()?;
            if !console.unset(&key) {
                return Err(anyhow::anyhow!("Unknown setting '{}' (expected api_url or auth_url)", key));
            }
            save_console_config(&console)?;
            output_success(&output_format, &format!("Unset {}", key), None)
        }
        ConfigCommands::Path => {
            let dir = get_config_dir()?;
            output_value(&output_format, &json!({ "path": dir }), || {
                println!("{}", dir.display());
                Ok(())
            })
        }
    }
}
