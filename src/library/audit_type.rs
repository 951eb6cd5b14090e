use serde::{Deserialize, Serialize};

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditType {
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
pub struct NewAuditType {
    pub aud_typ_name: String,
    #[serde(default = "default_active_flag")]
    pub aud_typ_active: u8,
}

fn default_active_flag() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditTypeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud_typ_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud_typ_active: Option<u8>,
}

impl Identified for AuditType {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct AuditTypes;

impl Resource for AuditTypes {
    type Record = AuditType;
    type Create = NewAuditType;
    type Update = AuditTypeChanges;

    const TAB: TabKey = TabKey::TypesOfAudit;
    const ENDPOINT: &'static str = "/audit-types";
    const COLUMNS: &'static [&'static str] = &["ID", "Types of Audit"];

    fn row(record: &AuditType) -> Vec<String> {
        let mut name = record.name.clone();
        if !record.active {
            name.push_str(" (Inactive)");
        }
        vec![record.id.to_string(), name]
    }

    fn matches(record: &AuditType, needle: &str) -> bool {
        contains(&record.name, needle)
    }
}
