use serde::{Deserialize, Serialize};

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCriterion {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub references: String,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuditCriterion {
    pub cra_name: String,
    #[serde(default)]
    pub cra_areas: String,
    #[serde(default)]
    pub cra_references: String,
    #[serde(default = "default_active_flag")]
    pub cra_active: u8,
}

fn default_active_flag() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditCriterionChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cra_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cra_areas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cra_references: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cra_active: Option<u8>,
}

impl Identified for AuditCriterion {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct AuditCriteria;

impl Resource for AuditCriteria {
    type Record = AuditCriterion;
    type Create = NewAuditCriterion;
    type Update = AuditCriterionChanges;

    const TAB: TabKey = TabKey::AuditCriteria;
    const ENDPOINT: &'static str = "/audit-criteria";
    const COLUMNS: &'static [&'static str] = &["ID", "Audit Criteria", "Audit Area", "Reference"];

    fn row(criterion: &AuditCriterion) -> Vec<String> {
        vec![
            criterion.id.to_string(),
            criterion.name.clone(),
            criterion.areas.clone(),
            criterion.references.clone(),
        ]
    }

    fn matches(criterion: &AuditCriterion, needle: &str) -> bool {
        contains(&criterion.name, needle)
            || contains(&criterion.areas, needle)
            || contains(&criterion.references, needle)
    }
}
