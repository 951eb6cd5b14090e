use serde::{Deserialize, Serialize};

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub contact_details: String,
    #[serde(default)]
    pub head_of_agency: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub classification_group: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub group_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAgency {
    pub agn_id: i64,
    pub agn_name: String,
    pub agn_acronym: String,
    pub agn_grp_code: String,
    pub agn_address: String,
    pub agn_head_name: String,
    pub agn_head_position: String,
    pub agn_contact_details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgencyChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_grp_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_head_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_head_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agn_contact_details: Option<String>,
}

impl Identified for Agency {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct Agencies;

impl Resource for Agencies {
    type Record = Agency;
    type Create = NewAgency;
    type Update = AgencyChanges;

    const TAB: TabKey = TabKey::Agencies;
    const ENDPOINT: &'static str = "/agencies";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Contact Details",
        "Head of Agency & Position",
        "Classification/Group",
    ];

    fn row(agency: &Agency) -> Vec<String> {
        let name = if agency.acronym.is_empty() {
            agency.name.clone()
        } else {
            format!("{} ({})", agency.name, agency.acronym)
        };
        let head = match (agency.head_of_agency.is_empty(), agency.position.is_empty()) {
            (false, false) => format!("{}, {}", agency.head_of_agency, agency.position),
            (false, true) => agency.head_of_agency.clone(),
            _ => agency.position.clone(),
        };
        vec![
            agency.id.to_string(),
            name,
            agency.contact_details.clone(),
            head,
            agency.classification_group.clone(),
        ]
    }

    fn matches(agency: &Agency, needle: &str) -> bool {
        contains(&agency.name, needle)
            || contains(&agency.acronym, needle)
            || contains(&agency.classification_group, needle)
            || contains(&agency.head_of_agency, needle)
    }
}
