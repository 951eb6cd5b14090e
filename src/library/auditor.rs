use serde::{Deserialize, Serialize};

use super::flags::{contains, contains_opt};
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auditor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub name_suffix: Option<String>,
    #[serde(default, with = "crate::library::flags")]
    pub external: bool,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub salary_grade: Option<i64>,
    #[serde(default)]
    pub agency_id: Option<i64>,
    #[serde(default)]
    pub agency_name: Option<String>,
    #[serde(default)]
    pub expertise: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub contact_no: Option<String>,
    #[serde(default)]
    pub tin: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_active", with = "crate::library::flags")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Auditor {
    /// Prefix, first, middle, last and suffix, skipping blanks.
    pub fn full_name(&self) -> String {
        [
            self.name_prefix.as_deref(),
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.name_suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuditor {
    pub aur_name_first: String,
    pub aur_name_last: String,
    pub aur_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_middle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_external: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_salary_grade: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_agn_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_expertise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_contact_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_active: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditorChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_middle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_name_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_external: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_salary_grade: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_agn_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_expertise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_contact_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aur_active: Option<u8>,
}

impl Identified for Auditor {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct Auditors;

impl Resource for Auditors {
    type Record = Auditor;
    type Create = NewAuditor;
    type Update = AuditorChanges;

    const TAB: TabKey = TabKey::Auditors;
    const ENDPOINT: &'static str = "/auditors";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Agency & Position",
        "Contact Details",
        "Birthdate",
        "Expertise",
    ];

    fn row(auditor: &Auditor) -> Vec<String> {
        let mut name = auditor.full_name();
        if !auditor.active {
            name.push_str(" (Inactive)");
        }
        let placement = [auditor.agency_name.as_deref(), auditor.position.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let contact = [Some(auditor.email.as_str()), auditor.contact_no.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        vec![
            auditor.id.to_string(),
            name,
            placement,
            contact,
            auditor.birthdate.clone().unwrap_or_default(),
            auditor.expertise.clone().unwrap_or_default(),
        ]
    }

    fn matches(auditor: &Auditor, needle: &str) -> bool {
        contains(&auditor.full_name(), needle)
            || contains(&auditor.email, needle)
            || contains_opt(auditor.position.as_deref(), needle)
            || contains_opt(auditor.expertise.as_deref(), needle)
            || contains_opt(auditor.contact_no.as_deref(), needle)
    }
}
