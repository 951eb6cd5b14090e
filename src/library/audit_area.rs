use serde::{Deserialize, Serialize};

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;
use crate::hierarchy::{build_tree_with, Hierarchical};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditArea {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default = "default_active", with = "crate::library::flags")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Hierarchical for AuditArea {
    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Identified for AuditArea {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuditArea {
    pub ara_name: String,
    #[serde(default)]
    pub ara_ara_id: Option<i64>,
    #[serde(default = "default_active_flag")]
    pub ara_active: u8,
}

fn default_active_flag() -> u8 {
    1
}

/// Partial update. `ara_ara_id: Some(None)` moves the area to the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditAreaChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ara_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub ara_ara_id: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ara_active: Option<u8>,
}

// Distinguishes an explicit `null` (top level) from an absent key (unchanged).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

pub struct AuditAreas;

impl Resource for AuditAreas {
    type Record = AuditArea;
    type Create = NewAuditArea;
    type Update = AuditAreaChanges;

    const TAB: TabKey = TabKey::AuditAreas;
    const ENDPOINT: &'static str = "/audit-areas";
    const COLUMNS: &'static [&'static str] = &["ID", "Audit Area", "Parent", "Active"];

    fn row(area: &AuditArea) -> Vec<String> {
        vec![
            area.id.to_string(),
            area.name.clone(),
            area.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            if area.active { "yes" } else { "no" }.to_string(),
        ]
    }

    fn matches(area: &AuditArea, needle: &str) -> bool {
        contains(&area.name, needle)
    }

    /// Nodes in the filtered forest, ancestors of matches included.
    ///
    /// When the list cannot form a tree the flat matches are counted instead; the
    /// structural error itself is reported by the tree view.
    fn data_count(records: &[AuditArea], term: &str) -> usize {
        let sentinel = crate::config::config().hierarchy.root_sentinel;
        match build_tree_with(records, sentinel) {
            Ok(forest) => forest.filter(term).count_all_nodes(),
            Err(e) => {
                tracing::warn!("Counting audit areas without hierarchy: {}", e);
                let needle = term.to_lowercase();
                records
                    .iter()
                    .filter(|area| needle.is_empty() || Self::matches(area, &needle))
                    .count()
            }
        }
    }
}
