use std::marker::PhantomData;
use std::sync::Arc;

use super::audit_area::{AuditArea, AuditAreaChanges, AuditAreas, NewAuditArea};
use super::internal_control::{
    ComponentList, ControlError, InternalControl, InternalControlChanges, InternalControls,
};
use super::resource::{Identified, RecordStore, Resource};
use crate::error::ClientError;
use crate::hierarchy::{
    build_tree_with, eligible_parents, validate_parent_assignment, Forest, HierarchyError, ParentScope,
};

/// What the edit form is currently open for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editing {
    New,
    Existing(i64),
}

/// In-memory copy of one resource's list plus the state of its edit form.
///
/// The list is fetched whole on `load` and patched in place after each successful write.
/// A failed call keeps the list as it was and records the message in `error`.
pub struct Panel<R: Resource, S> {
    store: Arc<S>,
    records: Vec<R::Record>,
    editing: Option<Editing>,
    error: Option<String>,
    loaded: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: RecordStore<R>> Panel<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            records: Vec::new(),
            editing: None,
            error: None,
            loaded: false,
            _resource: PhantomData,
        }
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn find(&self, id: i64) -> Option<&R::Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editing(&self) -> Option<Editing> {
        self.editing
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn begin_create(&mut self) {
        self.editing = Some(Editing::New);
    }

    /// Opens the form for an existing record, if it is in the list.
    pub fn begin_edit(&mut self, id: i64) -> Option<&R::Record> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        self.editing = Some(Editing::Existing(id));
        Some(&self.records[index])
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn visible(&self, term: &str) -> Vec<&R::Record> {
        if term.is_empty() {
            return self.records.iter().collect();
        }
        let needle = term.to_lowercase();
        self.records.iter().filter(|r| R::matches(r, &needle)).collect()
    }

    pub fn data_count(&self, term: &str) -> usize {
        R::data_count(&self.records, term)
    }

    pub async fn load(&mut self) -> Result<usize, ClientError> {
        self.error = None;
        match self.store.list().await {
            Ok(records) => {
                tracing::debug!("Loaded {} {} records", records.len(), R::TAB.label());
                self.records = records;
                self.loaded = true;
                Ok(self.records.len())
            }
            Err(e) => Err(self.fail("load", e)),
        }
    }

    pub async fn create(&mut self, payload: &R::Create) -> Result<R::Record, ClientError> {
        match self.store.create(payload).await {
            Ok(created) => {
                self.records.push(created.clone());
                self.editing = None;
                self.error = None;
                Ok(created)
            }
            Err(e) => Err(self.fail("create", e)),
        }
    }

    pub async fn update(&mut self, id: i64, payload: &R::Update) -> Result<R::Record, ClientError> {
        match self.store.update(id, payload).await {
            Ok(updated) => {
                match self.records.iter_mut().find(|r| r.id() == id) {
                    Some(slot) => *slot = updated.clone(),
                    None => tracing::warn!("Updated {} record {} was not in the loaded list", R::TAB.label(), id),
                }
                self.editing = None;
                self.error = None;
                Ok(updated)
            }
            Err(e) => Err(self.fail("update", e)),
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        match self.store.delete(id).await {
            Ok(()) => {
                self.records.retain(|r| r.id() != id);
                if self.editing == Some(Editing::Existing(id)) {
                    self.editing = None;
                }
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("delete", e)),
        }
    }

    fn fail(&mut self, action: &str, e: ClientError) -> ClientError {
        tracing::error!("Failed to {} {}: {}", action, R::TAB.label(), e);
        self.error = Some(e.to_string());
        e
    }
}

impl<S: RecordStore<AuditAreas>> Panel<AuditAreas, S> {
    /// Forest of the loaded areas, filtered by `term`.
    pub fn tree(&self, term: &str) -> Result<Forest<AuditArea>, HierarchyError> {
        let sentinel = crate::config::config().hierarchy.root_sentinel;
        Ok(build_tree_with(&self.records, sentinel)?.filter(term))
    }

    /// Areas that may be picked as parent for `node_id` (or for a new area).
    pub fn parent_options(&self, node_id: Option<i64>, scope: ParentScope) -> Vec<&AuditArea> {
        let sentinel = crate::config::config().hierarchy.root_sentinel;
        eligible_parents(node_id, &self.records, scope, sentinel)
            .into_iter()
            .filter_map(|id| self.records.iter().find(|area| area.id == id))
            .collect()
    }

    /// Create after checking the parent exists in the loaded list.
    pub async fn create_area(&mut self, payload: &NewAuditArea) -> Result<AuditArea, ClientError> {
        if let Some(parent) = payload.ara_ara_id {
            if !self.records.iter().any(|area| area.id == parent) {
                return Err(self.fail("create", HierarchyError::UnknownParent(parent).into()));
            }
        }
        self.create(payload).await
    }

    /// Update after rejecting a parent change that would loop the hierarchy.
    pub async fn update_area(&mut self, id: i64, changes: &AuditAreaChanges) -> Result<AuditArea, ClientError> {
        if let Some(candidate) = changes.ara_ara_id {
            let sentinel = crate::config::config().hierarchy.root_sentinel;
            if let Err(e) = validate_parent_assignment(candidate, id, &self.records, sentinel) {
                return Err(self.fail("update", e.into()));
            }
        }
        self.update(id, changes).await
    }
}

impl<S: RecordStore<InternalControls>> Panel<InternalControls, S> {
    /// Move one component and persist the renumbered list.
    pub async fn reorder_components(
        &mut self,
        id: i64,
        from: usize,
        to: usize,
    ) -> Result<InternalControl, ClientError> {
        self.edit_components(id, |components| components.move_item(from, to))
            .await
    }

    pub async fn add_component(&mut self, id: i64, description: &str) -> Result<InternalControl, ClientError> {
        self.edit_components(id, |components| components.push(description))
            .await
    }

    pub async fn remove_component(&mut self, id: i64, index: usize) -> Result<InternalControl, ClientError> {
        self.edit_components(id, |components| components.remove(index).map(|_| ()))
            .await
    }

    async fn edit_components<F>(&mut self, id: i64, edit: F) -> Result<InternalControl, ClientError>
    where
        F: FnOnce(&mut ComponentList) -> Result<(), ControlError>,
    {
        let mut components = match self.find(id) {
            Some(control) => ComponentList::from_components(&control.components),
            None => return Err(self.fail("update", ClientError::NotLoaded(id))),
        };
        if let Err(e) = edit(&mut components) {
            return Err(self.fail("update", e.into()));
        }

        let changes = InternalControlChanges::default().with_components(&components);
        self.update(id, &changes).await
    }
}
