use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{format_table, output_value};
use crate::cli::{api_client, OutputFormat};
use crate::library::{Library, TabKey};

#[derive(Subcommand)]
pub enum LibraryCommands {
    #[command(about = "Load every tab and show entry counts")]
    Tabs {
        #[arg(long, help = "Search term applied to every tab")]
        search: Option<String>,
        #[arg(long, help = "Tab to mark active (e.g. auditAreas)")]
        active: Option<TabKey>,
    },
}

pub async fn handle(cmd: LibraryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        LibraryCommands::Tabs { search, active } => {
            let mut library = Library::with_store(Arc::new(api_client()?));
            if let Some(key) = active {
                library.set_active(key);
            }
            library.set_search(search.unwrap_or_default());

            let results = library.load_all().await;
            let tabs: Vec<_> = results
                .iter()
                .map(|(key, result)| {
                    json!({
                        "key": key,
                        "label": key.label(),
                        "active": *key == library.active(),
                        "count": library.data_count(*key),
                        "error": result.as_ref().err().map(|e| e.to_string()),
                    })
                })
                .collect();

            let value = json!({ "search": library.search_term(), "tabs": tabs });
            output_value(&output_format, &value, || {
                let rows: Vec<Vec<String>> = results
                    .iter()
                    .map(|(key, result)| {
                        let marker = if *key == library.active() { "*" } else { "" };
                        let status = match result {
                            Ok(_) => library.data_count(*key).to_string(),
                            Err(e) => format!("error: {}", e),
                        };
                        vec![marker.to_string(), key.label().to_string(), status]
                    })
                    .collect();
                println!("{}", format_table(&["", "Tab", "Entries"], &rows));
                Ok(())
            })
        }
    }
}
