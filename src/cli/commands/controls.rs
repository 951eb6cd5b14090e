use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{format_table, output_empty_collection, output_success, output_value};
use crate::cli::{api_client, OutputFormat};
use crate::library::internal_control::{
    control_tree, filter_controls, ComponentList, ControlNode, InternalControlChanges, NewInternalControl,
};
use crate::library::{InternalControls, Panel, RecordStore, Resource};

#[derive(Subcommand)]
pub enum ControlCommands {
    #[command(about = "Show controls with their numbered components")]
    Tree {
        #[arg(long, help = "Keep matching controls and components")]
        search: Option<String>,
        #[arg(long, help = "List components of every control")]
        expand_all: bool,
    },

    #[command(about = "List internal controls as a flat table")]
    List {
        #[arg(long, help = "Case-insensitive search term")]
        search: Option<String>,
    },

    #[command(about = "Show one internal control")]
    Show {
        #[arg(help = "Internal control ID")]
        id: i64,
    },

    #[command(about = "Create an internal control")]
    Create {
        #[arg(long, help = "Audit area ID")]
        area: i64,
        #[arg(long, help = "Category")]
        category: String,
        #[arg(long, default_value = "", help = "Description")]
        description: String,
        #[arg(long = "component", help = "Component description, repeatable, in order")]
        components: Vec<String>,
        #[arg(long, help = "Create as inactive")]
        inactive: bool,
    },

    #[command(about = "Update an internal control")]
    Update {
        #[arg(help = "Internal control ID")]
        id: i64,
        #[arg(long, help = "Audit area ID")]
        area: Option<i64>,
        #[arg(long, help = "Category")]
        category: Option<String>,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long, help = "Set active (true/false)")]
        active: Option<bool>,
    },

    #[command(about = "Move a component (positions start at 1)")]
    Reorder {
        #[arg(help = "Internal control ID")]
        id: i64,
        #[arg(help = "Current position")]
        from: usize,
        #[arg(help = "New position")]
        to: usize,
    },

    #[command(about = "Append a component")]
    AddComponent {
        #[arg(help = "Internal control ID")]
        id: i64,
        #[arg(help = "Component description")]
        description: String,
    },

    #[command(about = "Remove a component (positions start at 1)")]
    RemoveComponent {
        #[arg(help = "Internal control ID")]
        id: i64,
        #[arg(help = "Position")]
        position: usize,
    },

    #[command(about = "Delete an internal control")]
    Delete {
        #[arg(help = "Internal control ID")]
        id: i64,
    },
}

fn position(value: usize) -> anyhow::Result<usize> {
    value
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

pub fn format_control_tree(nodes: &[ControlNode], expand_all: bool) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        let marker = if node.components.is_empty() {
            "•"
        } else if node.is_expanded || expand_all {
            "▾"
        } else {
            "▸"
        };
        let mut line = format!("{} {} [{}] ({})", marker, node.category, node.id, node.audit_area_name);
        if !node.active {
            line.push_str(" (inactive)");
        }
        lines.push(line);

        if node.is_expanded || expand_all {
            for component in &node.components {
                lines.push(format!("    {}. {}", component.sequence_number, component.description));
            }
        }
    }
    lines.join("\n")
}

pub async fn handle(cmd: ControlCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = Arc::new(api_client()?);
    let mut panel: Panel<InternalControls, _> = Panel::new(client.clone());

    match cmd {
        ControlCommands::Tree { search, expand_all } => {
            panel.load().await?;
            let nodes = filter_controls(&control_tree(panel.records()), search.as_deref().unwrap_or(""));
            if nodes.is_empty() {
                return output_empty_collection(&output_format, "internalControls", "No internal controls found");
            }
            output_value(&output_format, &json!({ "internalControls": nodes }), || {
                println!("{}", format_control_tree(&nodes, expand_all));
                Ok(())
            })
        }
        ControlCommands::List { search } => {
            panel.load().await?;
            let visible = panel.visible(search.as_deref().unwrap_or(""));
            if visible.is_empty() {
                return output_empty_collection(&output_format, "internalControls", "No internal controls found");
            }
            output_value(&output_format, &json!({ "internalControls": visible }), || {
                let rows: Vec<Vec<String>> = visible.iter().map(|c| InternalControls::row(c)).collect();
                println!("{}", format_table(InternalControls::COLUMNS, &rows));
                Ok(())
            })
        }
        ControlCommands::Show { id } => {
            let control = RecordStore::<InternalControls>::get(client.as_ref(), id).await?;
            output_value(&output_format, &serde_json::to_value(&control)?, || {
                println!("{}", format_control_tree(&control_tree(std::slice::from_ref(&control)), true));
                if !control.description.is_empty() {
                    println!("\n{}", control.description);
                }
                Ok(())
            })
        }
        ControlCommands::Create { area, category, description, components, inactive } => {
            let mut list = ComponentList::new();
            for component in components {
                list.push(component)?;
            }
            let payload = NewInternalControl::new(area, category, description, !inactive, &list);
            let created = panel.create(&payload).await?;
            output_success(
                &output_format,
                &format!("Created internal control '{}' [{}]", created.category, created.id),
                Some(serde_json::to_value(&created)?),
            )
        }
        ControlCommands::Update { id, area, category, description, active } => {
            let changes = InternalControlChanges {
                ic_ara_id: area,
                ic_category: category,
                ic_desc: description,
                ic_active: active.map(u8::from),
                components: None,
            };
            let updated = panel.update(id, &changes).await?;
            output_success(
                &output_format,
                &format!("Updated internal control [{}]", id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        ControlCommands::Reorder { id, from, to } => {
            panel.load().await?;
            let updated = panel.reorder_components(id, position(from)?, position(to)?).await?;
            output_success(
                &output_format,
                &format!("Moved component {} to {} in control [{}]", from, to, id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        ControlCommands::AddComponent { id, description } => {
            panel.load().await?;
            let updated = panel.add_component(id, &description).await?;
            output_success(
                &output_format,
                &format!("Added component {} to control [{}]", updated.components.len(), id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        ControlCommands::RemoveComponent { id, position: at } => {
            panel.load().await?;
            let updated = panel.remove_component(id, position(at)?).await?;
            output_success(
                &output_format,
                &format!("Removed component {} from control [{}]", at, id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        ControlCommands::Delete { id } => {
            panel.delete(id).await?;
            output_success(&output_format, &format!("Deleted internal control {}", id), Some(json!({ "id": id })))
        }
    }
}
