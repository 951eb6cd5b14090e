use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::auth::RegisterRequest;
use crate::cli::utils::{output_success, output_value};
use crate::cli::{auth_client, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and save the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the saved session")]
    Logout,

    #[command(about = "Show the saved session")]
    Status,

    #[command(about = "Show current user information from the server")]
    Whoami,

    #[command(about = "Register a new user account (does not log in)")]
    Register {
        #[arg(help = "Full name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },
}

fn read_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("AUDITLIB_PASSWORD") {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow::anyhow!("Password is required"));
    }
    Ok(password)
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = auth_client()?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = read_password(password)?;
            let session = auth.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {} <{}>", session.user.name, session.user.email),
                Some(json!({ "user": session.user, "expires_at": session.expires_at })),
            )
        }
        AuthCommands::Logout => {
            auth.logout().await?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let session = auth.session()?;
            let value = json!({
                "logged_in": session.is_some(),
                "user": session.as_ref().map(|s| &s.user),
                "logged_in_at": session.as_ref().map(|s| s.logged_in_at),
                "expires_at": session.as_ref().and_then(|s| s.expires_at),
                "expired": session.as_ref().map(|s| s.is_expired()).unwrap_or(false),
            });
            output_value(&output_format, &value, || {
                match &session {
                    Some(s) => {
                        println!("Logged in as {} <{}>", s.user.name, s.user.email);
                        println!("Since: {}", s.logged_in_at.to_rfc3339());
                        match s.expires_at {
                            Some(exp) if s.is_expired() => println!("Expired: {}", exp.to_rfc3339()),
                            Some(exp) => println!("Expires: {}", exp.to_rfc3339()),
                            None => println!("Expires: unknown"),
                        }
                    }
                    None => println!("Not logged in"),
                }
                Ok(())
            })
        }
        AuthCommands::Whoami => {
            let user = auth.current_user().await?;
            let value = serde_json::to_value(&user)?;
            output_value(&output_format, &value, || {
                println!("{} <{}> (id {})", user.name, user.email, user.id);
                Ok(())
            })
        }
        AuthCommands::Register { name, email, password } => {
            let password = read_password(password)?;
            let request = RegisterRequest {
                name,
                email: email.clone(),
                password: password.clone(),
                password_confirmation: password,
            };
            let user = auth.register(&request).await?;
            output_success(
                &output_format,
                &format!("Registered {}", email),
                Some(json!({ "user": user })),
            )
        }
    }
}
