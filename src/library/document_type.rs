use serde::{Deserialize, Serialize};

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active", with = "crate::library::flags")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDocumentType {
    pub doc_typ_name: String,
    #[serde(default = "default_active_flag")]
    pub doc_typ_active: u8,
}

fn default_active_flag() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentTypeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_typ_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_typ_active: Option<u8>,
}

impl Identified for DocumentType {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct DocumentTypes;

impl Resource for DocumentTypes {
    type Record = DocumentType;
    type Create = NewDocumentType;
    type Update = DocumentTypeChanges;

    const TAB: TabKey = TabKey::DocumentTypes;
    const ENDPOINT: &'static str = "/document-types";
    const COLUMNS: &'static [&'static str] = &["ID", "Types of Document"];

    fn row(record: &DocumentType) -> Vec<String> {
        let mut name = record.name.clone();
        if !record.active {
            name.push_str(" (Inactive)");
        }
        vec![record.id.to_string(), name]
    }

    fn matches(record: &DocumentType, needle: &str) -> bool {
        contains(&record.name, needle)
    }
}
