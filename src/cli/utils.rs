use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    error: &ClientError,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": error.to_string(),
                "error_code": error.error_code(),
            });

            if let Some(fields) = error.field_errors() {
                response["errors"] = json!(fields);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", error);
            if let Some(fields) = error.field_errors() {
                let mut fields: Vec<_> = fields.iter().collect();
                fields.sort();
                for (field, message) in fields {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
    Ok(())
}

/// Output a JSON value as-is, or run `text` to print it for humans
pub fn output_value(
    output_format: &OutputFormat,
    value: &Value,
    text: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        OutputFormat::Text => text(),
    }
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Render rows as a left-aligned text table
pub fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let mut out = vec![line(columns.to_vec()), rule];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Build a JSON object from `key=value` (string) and `key:=json` (raw) assignments
pub fn parse_assignments(assignments: &[String]) -> anyhow::Result<Value> {
    let mut object = Map::new();
    for assignment in assignments {
        let Some((key, rest)) = assignment.split_once('=') else {
            return Err(anyhow::anyhow!(
                "Expected key=value or key:=json, got '{}'",
                assignment
            ));
        };
        match key.strip_suffix(':') {
            Some(key) => {
                let value: Value = serde_json::from_str(rest)
                    .map_err(|e| anyhow::anyhow!("Invalid JSON for '{}': {}", key, e))?;
                object.insert(key.trim().to_string(), value);
            }
            None => {
                object.insert(key.trim().to_string(), Value::String(rest.to_string()));
            }
        }
    }
    Ok(Value::Object(object))
}
