use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::panel::Panel;
use super::resource::{RecordStore, Resource};
use super::{
    Agencies, AuditAreas, AuditCriteria, AuditTypes, Auditors, DocumentTypes, InternalControls, UserAccounts,
};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabKey {
    Agencies,
    Auditors,
    AuditAreas,
    AuditCriteria,
    TypesOfAudit,
    InternalControls,
    DocumentTypes,
    UserAccounts,
}

impl TabKey {
    /// Display order of the tab strip.
    pub const ALL: [TabKey; 8] = [
        TabKey::Agencies,
        TabKey::Auditors,
        TabKey::AuditAreas,
        TabKey::AuditCriteria,
        TabKey::TypesOfAudit,
        TabKey::InternalControls,
        TabKey::DocumentTypes,
        TabKey::UserAccounts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TabKey::Agencies => "agencies",
            TabKey::Auditors => "auditors",
            TabKey::AuditAreas => "auditAreas",
            TabKey::AuditCriteria => "auditCriteria",
            TabKey::TypesOfAudit => "typesOfAudit",
            TabKey::InternalControls => "internalControls",
            TabKey::DocumentTypes => "documentTypes",
            TabKey::UserAccounts => "userAccounts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TabKey::Agencies => "Agencies",
            TabKey::Auditors => "Auditors",
            TabKey::AuditAreas => "Audit Areas",
            TabKey::AuditCriteria => "Audit Criteria",
            TabKey::TypesOfAudit => "Types of Audit",
            TabKey::InternalControls => "Internal Controls",
            TabKey::DocumentTypes => "Types of Document",
            TabKey::UserAccounts => "User Accounts",
        }
    }
}

impl fmt::Display for TabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabKey {
    type Err = String;

    /// Accepts the camelCase key or a kebab-case form (`audit-areas`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s.chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();
        TabKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_lowercase() == folded)
            .ok_or_else(|| format!("Unknown tab '{}'", s))
    }
}

/// What the controller needs from each tab, independent of its record type.
#[async_trait]
pub trait TabPanel: Send {
    fn key(&self) -> TabKey;

    /// Fetch the tab's list; returns how many records came back.
    async fn load(&mut self) -> Result<usize, ClientError>;

    /// Open the tab's create form.
    fn add_new(&mut self);

    fn data_count(&self, term: &str) -> usize;

    fn error(&self) -> Option<&str>;
}

#[async_trait]
impl<R, S> TabPanel for Panel<R, S>
where
    R: Resource,
    S: RecordStore<R> + 'static,
{
    fn key(&self) -> TabKey {
        R::TAB
    }

    async fn load(&mut self) -> Result<usize, ClientError> {
        Panel::load(self).await
    }

    fn add_new(&mut self) {
        self.begin_create();
    }

    fn data_count(&self, term: &str) -> usize {
        Panel::data_count(self, term)
    }

    fn error(&self) -> Option<&str> {
        Panel::error(self)
    }
}

/// Owns the active tab, the shared search term and one panel per tab.
pub struct Library {
    panels: Vec<Box<dyn TabPanel>>,
    active: TabKey,
    search_term: String,
}

impl Library {
    /// Tabs are kept in the order given; the first one starts active.
    pub fn new(panels: Vec<Box<dyn TabPanel>>) -> Self {
        let active = panels.first().map(|p| p.key()).unwrap_or(TabKey::Agencies);
        Self {
            panels,
            active,
            search_term: String::new(),
        }
    }

    /// All eight tabs backed by one store.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: RecordStore<Agencies>
            + RecordStore<Auditors>
            + RecordStore<AuditAreas>
            + RecordStore<AuditCriteria>
            + RecordStore<AuditTypes>
            + RecordStore<InternalControls>
            + RecordStore<DocumentTypes>
            + RecordStore<UserAccounts>
            + 'static,
    {
        let panels: Vec<Box<dyn TabPanel>> = vec![
            Box::new(Panel::<Agencies, S>::new(store.clone())),
            Box::new(Panel::<Auditors, S>::new(store.clone())),
            Box::new(Panel::<AuditAreas, S>::new(store.clone())),
            Box::new(Panel::<AuditCriteria, S>::new(store.clone())),
            Box::new(Panel::<AuditTypes, S>::new(store.clone())),
            Box::new(Panel::<InternalControls, S>::new(store.clone())),
            Box::new(Panel::<DocumentTypes, S>::new(store.clone())),
            Box::new(Panel::<UserAccounts, S>::new(store)),
        ];
        Self::new(panels)
    }

    pub fn tabs(&self) -> Vec<TabKey> {
        self.panels.iter().map(|p| p.key()).collect()
    }

    pub fn active(&self) -> TabKey {
        self.active
    }

    /// Switch tabs. The search term carries over.
    pub fn set_active(&mut self, key: TabKey) -> bool {
        if self.panel(key).is_none() {
            tracing::warn!("No panel registered for tab {}", key);
            return false;
        }
        self.active = key;
        true
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Open the create form on the active tab.
    pub fn add_new(&mut self) -> bool {
        let active = self.active;
        match self.panel_mut(active) {
            Some(panel) => {
                panel.add_new();
                true
            }
            None => false,
        }
    }

    /// Entry count of a tab under the current search term.
    pub fn data_count(&self, key: TabKey) -> usize {
        self.panel(key)
            .map(|p| p.data_count(&self.search_term))
            .unwrap_or(0)
    }

    pub async fn load_active(&mut self) -> Result<usize, ClientError> {
        let active = self.active;
        match self.panel_mut(active) {
            Some(panel) => panel.load().await,
            None => Ok(0),
        }
    }

    /// Load every tab concurrently. One tab failing does not stop the others.
    pub async fn load_all(&mut self) -> Vec<(TabKey, Result<usize, ClientError>)> {
        let loads = self.panels.iter_mut().map(|panel| async move {
            let key = panel.key();
            (key, panel.load().await)
        });
        join_all(loads).await
    }

    pub fn panel(&self, key: TabKey) -> Option<&(dyn TabPanel + 'static)> {
        self.panels.iter().find(|p| p.key() == key).map(|p| p.as_ref())
    }

    pub fn panel_mut(&mut self, key: TabKey) -> Option<&mut (dyn TabPanel + 'static)> {
        self.panels.iter_mut().find(|p| p.key() == key).map(|p| p.as_mut())
    }
}
