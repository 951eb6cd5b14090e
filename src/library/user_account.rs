use serde::{Deserialize, Serialize};

use super::flags::{contains, contains_opt};
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub auditor_id: Option<i64>,
    pub level: i64,
    pub email: String,
    #[serde(default = "default_active", with = "crate::library::flags")]
    pub active: bool,
    /// The list endpoint reports this as `logged`.
    #[serde(default, alias = "logged", with = "crate::library::flags")]
    pub logged_in: bool,
    #[serde(default)]
    pub agency_name: Option<String>,
    #[serde(default)]
    pub agency_acronym: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Display name of an access level.
pub fn level_name(level: i64) -> &'static str {
    match level {
        1 => "System Administrator",
        2 => "Director",
        3 => "Division Chief",
        4 => "Supervisor",
        5 => "Internal Auditor",
        6 => "External Auditor",
        7 => "Auditee",
        8 => "Authorized Viewer",
        _ => "Unknown",
    }
}

impl UserAccount {
    pub fn agency(&self) -> &str {
        self.agency_name.as_deref().filter(|a| !a.is_empty()).unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUserAccount {
    pub usr_name: String,
    pub usr_aur_id: i64,
    pub usr_level: i64,
    pub usr_email: String,
    pub usr_password: String,
    #[serde(default = "default_active_flag")]
    pub usr_active: u8,
}

fn default_active_flag() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAccountChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_aur_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_active: Option<u8>,
}

impl Identified for UserAccount {
    fn id(&self) -> i64 {
        self.id
    }
}

pub struct UserAccounts;

impl Resource for UserAccounts {
    type Record = UserAccount;
    type Create = NewUserAccount;
    type Update = UserAccountChanges;

    const TAB: TabKey = TabKey::UserAccounts;
    const ENDPOINT: &'static str = "/user-accounts";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Agency",
        "Email Address",
        "Level of Access",
        "Logged In",
    ];

    fn row(user: &UserAccount) -> Vec<String> {
        let mut level = level_name(user.level).to_string();
        if !user.active {
            level.push_str(" (Inactive)");
        }
        vec![
            user.id.to_string(),
            user.name.clone(),
            user.agency().to_string(),
            user.email.clone(),
            level,
            if user.logged_in { "●" } else { "○" }.to_string(),
        ]
    }

    fn matches(user: &UserAccount, needle: &str) -> bool {
        contains(&user.name, needle)
            || contains_opt(user.agency_name.as_deref(), needle)
            || contains(&user.email, needle)
            || contains(level_name(user.level), needle)
    }
}
