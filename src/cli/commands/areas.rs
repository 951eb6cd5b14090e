use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{format_table, output_empty_collection, output_success, output_value};
use crate::cli::{api_client, OutputFormat};
use crate::hierarchy::{build_tree_with, render_outline, ExpandState, Forest, OutlineRow, ParentScope};
use crate::library::audit_area::{AuditAreaChanges, NewAuditArea};
use crate::library::{AuditArea, AuditAreas, Panel, RecordStore, Resource};

#[derive(Subcommand)]
pub enum AreaCommands {
    #[command(about = "Show audit areas as an indented tree")]
    Tree {
        #[arg(long, help = "Keep matching areas and their ancestors")]
        search: Option<String>,
        #[arg(long, help = "Expand every node, not only ancestors of matches")]
        expand_all: bool,
        #[arg(long, help = "Read a flat JSON or YAML list instead of calling the API")]
        file: Option<PathBuf>,
    },

    #[command(about = "List audit areas as a flat table")]
    List {
        #[arg(long, help = "Case-insensitive search term")]
        search: Option<String>,
    },

    #[command(about = "Show one audit area")]
    Show {
        #[arg(help = "Audit area ID")]
        id: i64,
    },

    #[command(about = "List areas that may be chosen as parent")]
    Parents {
        #[arg(long = "for", value_name = "ID", help = "Area being edited (omit for a new area)")]
        node_id: Option<i64>,
        #[arg(long, help = "roots or any (defaults to configuration)")]
        scope: Option<ParentScope>,
    },

    #[command(about = "Create an audit area")]
    Create {
        #[arg(help = "Area name")]
        name: String,
        #[arg(long, help = "Parent area ID (omit for a top-level area)")]
        parent: Option<i64>,
        #[arg(long, help = "Create as inactive")]
        inactive: bool,
    },

    #[command(about = "Update an audit area")]
    Update {
        #[arg(help = "Audit area ID")]
        id: i64,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, conflicts_with = "root", help = "New parent area ID")]
        parent: Option<i64>,
        #[arg(long, help = "Move to the top level")]
        root: bool,
        #[arg(long, help = "Set active (true/false)")]
        active: Option<bool>,
    },

    #[command(about = "Delete an audit area")]
    Delete {
        #[arg(help = "Audit area ID")]
        id: i64,
    },
}

/// Flat area list from a file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
///
/// A JSON envelope (`{ "data": [...] }`) is accepted as well as a bare list.
pub fn load_areas_file(path: &Path) -> anyhow::Result<Vec<AuditArea>> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    let list = match value {
        Value::Object(mut object) if object.contains_key("data") => object.remove("data").unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(list)?)
}

/// Text outline: two spaces per level (capped at four levels), entry totals on roots.
pub fn format_outline(rows: &[OutlineRow]) -> String {
    rows.iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth.min(4));
            let marker = match (row.has_children, row.expanded) {
                (false, _) => "•",
                (true, false) => "▸",
                (true, true) => "▾",
            };
            let mut line = format!("{}{} {} [{}]", indent, marker, row.name, row.id);
            if !row.active {
                line.push_str(" (inactive)");
            }
            if row.depth == 0 {
                line.push_str(&format!("  {} entries", row.entries_count));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn output_forest(output_format: &OutputFormat, forest: &Forest<AuditArea>, expand_all: bool) -> anyhow::Result<()> {
    let mut state = ExpandState::from_forest(&forest.roots);
    if expand_all {
        state.expand_all(&forest.roots);
    }
    let rows = render_outline(&forest.roots, &state);

    let value = json!({
        "roots": forest.roots,
        "orphans": forest.orphans,
        "count": forest.count_all_nodes(),
    });
    output_value(output_format, &value, || {
        if rows.is_empty() {
            println!("No audit areas found");
        } else {
            println!("{}", format_outline(&rows));
        }
        if !forest.orphans.is_empty() {
            let ids: Vec<String> = forest.orphans.iter().map(|id| id.to_string()).collect();
            println!("\nNot shown (missing parent): {}", ids.join(", "));
        }
        Ok(())
    })
}

pub async fn handle(cmd: AreaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    if let AreaCommands::Tree { search, expand_all, file: Some(path) } = &cmd {
        let records = load_areas_file(path)?;
        let sentinel = crate::config::config().hierarchy.root_sentinel;
        let forest = build_tree_with(&records, sentinel)?.filter(search.as_deref().unwrap_or(""));
        return output_forest(&output_format, &forest, *expand_all);
    }

    let client = Arc::new(api_client()?);
    let mut panel: Panel<AuditAreas, _> = Panel::new(client.clone());

    match cmd {
        AreaCommands::Tree { search, expand_all, .. } => {
            panel.load().await?;
            let forest = panel.tree(search.as_deref().unwrap_or(""))?;
            output_forest(&output_format, &forest, expand_all)
        }
        AreaCommands::List { search } => {
            panel.load().await?;
            let visible = panel.visible(search.as_deref().unwrap_or(""));
            if visible.is_empty() {
                return output_empty_collection(&output_format, "auditAreas", "No audit areas found");
            }
            output_value(&output_format, &json!({ "auditAreas": visible }), || {
                let rows: Vec<Vec<String>> = visible.iter().map(|a| AuditAreas::row(a)).collect();
                println!("{}", format_table(AuditAreas::COLUMNS, &rows));
                Ok(())
            })
        }
        AreaCommands::Show { id } => {
            let area = RecordStore::<AuditAreas>::get(client.as_ref(), id).await?;
            output_value(&output_format, &serde_json::to_value(&area)?, || {
                println!("{} [{}]", area.name, area.id);
                match area.parent_id {
                    Some(parent) => println!("Parent: {}", parent),
                    None => println!("Parent: (top level)"),
                }
                println!("Active: {}", if area.active { "yes" } else { "no" });
                Ok(())
            })
        }
        AreaCommands::Parents { node_id, scope } => {
            panel.load().await?;
            let scope = scope.unwrap_or(crate::config::config().hierarchy.parent_scope);
            let options = panel.parent_options(node_id, scope);
            output_value(&output_format, &json!({ "parents": options }), || {
                if options.is_empty() {
                    println!("No eligible parents");
                }
                for area in &options {
                    println!("{:>5}  {}", area.id, area.name);
                }
                Ok(())
            })
        }
        AreaCommands::Create { name, parent, inactive } => {
            panel.load().await?;
            let payload = NewAuditArea {
                ara_name: name,
                ara_ara_id: parent,
                ara_active: if inactive { 0 } else { 1 },
            };
            let created = panel.create_area(&payload).await?;
            output_success(
                &output_format,
                &format!("Created audit area '{}' [{}]", created.name, created.id),
                Some(serde_json::to_value(&created)?),
            )
        }
        AreaCommands::Update { id, name, parent, root, active } => {
            panel.load().await?;
            let changes = AuditAreaChanges {
                ara_name: name,
                ara_ara_id: if root { Some(None) } else { parent.map(Some) },
                ara_active: active.map(u8::from),
            };
            let updated = panel.update_area(id, &changes).await?;
            output_success(
                &output_format,
                &format!("Updated audit area '{}' [{}]", updated.name, updated.id),
                Some(serde_json::to_value(&updated)?),
            )
        }
        AreaCommands::Delete { id } => {
            panel.delete(id).await?;
            output_success(&output_format, &format!("Deleted audit area {}", id), Some(json!({ "id": id })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(depth: usize, id: i64, name: &str, has_children: bool, expanded: bool) -> OutlineRow {
        OutlineRow {
            depth,
            id,
            name: name.to_string(),
            active: true,
            entries_count: 2,
            has_children,
            expanded,
        }
    }

    #[test]
    fn test_format_outline() {
        let rows = vec![
            row(0, 1, "Planning", true, true),
            row(1, 2, "Budgeting", true, false),
            row(6, 9, "Deep", false, false),
        ];
        let text = format_outline(&rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "▾ Planning [1]  2 entries");
        assert_eq!(lines[1], "  ▸ Budgeting [2]");
        assert_eq!(lines[2], "        • Deep [9]");
    }

    #[test]
    fn test_load_areas_file_formats() {
        let dir = std::env::temp_dir().join(format!("auditlib-areas-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let yaml = dir.join("areas.yaml");
        fs::write(
            &yaml,
            "- id: 1\n  name: Planning\n  parentId: null\n  active: 1\n- id: 2\n  name: Budgeting\n  parentId: 1\n  active: true\n",
        )
        .unwrap();
        let areas = load_areas_file(&yaml).unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[1].parent_id, Some(1));

        let json_file = dir.join("areas.json");
        fs::write(
            &json_file,
            r#"{ "success": true, "data": [{ "id": 5, "name": "Payroll", "parentId": null, "active": 0 }] }"#,
        )
        .unwrap();
        let areas = load_areas_file(&json_file).unwrap();
        assert_eq!(areas[0].name, "Payroll");
        assert!(!areas[0].active);

        fs::remove_dir_all(&dir).unwrap();
    }
}
