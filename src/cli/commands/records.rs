use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{format_table, output_empty_collection, output_success, output_value, parse_assignments};
use crate::cli::{api_client, OutputFormat};
use crate::library::{Identified, Panel, RecordStore, Resource};

#[derive(Subcommand)]
pub enum RecordCommands {
    #[command(about = "List records")]
    List {
        #[arg(long, help = "Case-insensitive search term")]
        search: Option<String>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: i64,
    },

    #[command(about = "Create a record from key=value (or key:=json) fields")]
    Create {
        #[arg(long = "set", value_name = "KEY=VALUE", required = true, help = "Payload field, repeatable")]
        fields: Vec<String>,
    },

    #[command(about = "Update fields of a record")]
    Update {
        #[arg(help = "Record ID")]
        id: i64,
        #[arg(long = "set", value_name = "KEY=VALUE", required = true, help = "Payload field, repeatable")]
        fields: Vec<String>,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record ID")]
        id: i64,
    },
}

pub async fn handle<R: Resource>(cmd: RecordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = Arc::new(api_client()?);
    let mut panel: Panel<R, _> = Panel::new(client.clone());
    let label = R::TAB.label();

    match cmd {
        RecordCommands::List { search } => {
            panel.load().await?;
            let term = search.unwrap_or_default();
            let visible = panel.visible(&term);

            if visible.is_empty() {
                return output_empty_collection(&output_format, R::TAB.as_str(), &format!("No {} found", label.to_lowercase()));
            }

            let key = R::TAB.as_str();
            let value = json!({ key: visible });
            output_value(&output_format, &value, || {
                let rows: Vec<Vec<String>> = visible.iter().map(|r| R::row(r)).collect();
                println!("{}", format_table(R::COLUMNS, &rows));
                println!("\n{} of {} {}", visible.len(), panel.records().len(), label.to_lowercase());
                Ok(())
            })
        }
        RecordCommands::Show { id } => {
            let record = RecordStore::<R>::get(client.as_ref(), id).await?;
            let value = serde_json::to_value(&record)?;
            output_value(&output_format, &value, || {
                for (column, cell) in R::COLUMNS.iter().zip(R::row(&record)) {
                    println!("{:<16} {}", format!("{}:", column), cell);
                }
                Ok(())
            })
        }
        RecordCommands::Create { fields } => {
            let payload: R::Create = serde_json::from_value(parse_assignments(&fields)?)?;
            let created = panel.create(&payload).await?;
            output_success(
                &output_format,
                &format!("Created {} record {}", label.to_lowercase(), created.id()),
                Some(serde_json::to_value(&created)?),
            )
        }
        RecordCommands::Update { id, fields } => {
            let changes: R::Update = serde_json::from_value(parse_assignments(&fields)?)?;
            let updated = panel.update(id, &changes).await?;
            output_success(
                &output_format,
                &format!("Updated {} record {}", label.to_lowercase(), id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        RecordCommands::Delete { id } => {
            panel.delete(id).await?;
            output_success(
                &output_format,
                &format!("Deleted {} record {}", label.to_lowercase(), id),
                Some(json!({ "id": id })),
            )
        }
    }
}
