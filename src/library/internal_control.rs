//! Internal controls: a category record with an ordered, numbered list of components.
//!
//! The tree here is fixed at two levels. Components never nest; their sequence numbers
//! only order them for display and are rewritten to 1..=n before anything is persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::flags::contains;
use super::resource::{Identified, Resource};
use super::tabs::TabKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Component index {index} is out of range ({len} components)")]
    ComponentIndex { index: usize, len: usize },

    #[error("Component description cannot be empty")]
    EmptyComponent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlComponent {
    pub sequence_number: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalControl {
    pub id: i64,
    pub audit_area_id: i64,
    #[serde(default)]
    pub audit_area_name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active", with = "crate::library::flags")]
    pub active: bool,
    #[serde(default)]
    pub components_count: usize,
    #[serde(default)]
    pub components: Vec<ControlComponent>,
}

fn default_active() -> bool {
    true
}

impl Identified for InternalControl {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Components in their current display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentList {
    items: Vec<ControlComponent>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders by the stored sequence numbers, then renumbers.
    pub fn from_components(components: &[ControlComponent]) -> Self {
        let mut items = components.to_vec();
        items.sort_by_key(|c| c.sequence_number);
        let mut list = Self { items };
        list.renumber();
        list
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[ControlComponent] {
        &self.items
    }

    pub fn push(&mut self, description: impl Into<String>) -> Result<(), ControlError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ControlError::EmptyComponent);
        }
        self.items.push(ControlComponent {
            sequence_number: self.items.len() as u32 + 1,
            description,
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ControlComponent, ControlError> {
        self.check(index)?;
        let removed = self.items.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Drag reorder: take the item at `from` and drop it at position `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ControlError> {
        self.check(from)?;
        self.check(to)?;
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        self.renumber();
        Ok(())
    }

    pub fn set_description(&mut self, index: usize, description: impl Into<String>) -> Result<(), ControlError> {
        self.check(index)?;
        self.items[index].description = description.into();
        Ok(())
    }

    /// Sequence numbers become 1..=n in current order.
    pub fn renumber(&mut self) {
        for (position, item) in self.items.iter_mut().enumerate() {
            item.sequence_number = position as u32 + 1;
        }
    }

    pub fn to_payload(&self) -> Vec<ComponentPayload> {
        self.items
            .iter()
            .enumerate()
            .map(|(position, item)| ComponentPayload {
                com_seqnum: position as u32 + 1,
                com_desc: item.description.clone(),
            })
            .collect()
    }

    fn check(&self, index: usize) -> Result<(), ControlError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(ControlError::ComponentIndex {
                index,
                len: self.items.len(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPayload {
    pub com_seqnum: u32,
    pub com_desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewInternalControl {
    pub ic_ara_id: i64,
    pub ic_category: String,
    #[serde(default)]
    pub ic_desc: String,
    #[serde(default = "default_active_flag")]
    pub ic_active: u8,
    #[serde(default)]
    pub components: Vec<ComponentPayload>,
}

fn default_active_flag() -> u8 {
    1
}

impl NewInternalControl {
    pub fn new(
        audit_area_id: i64,
        category: impl Into<String>,
        description: impl Into<String>,
        active: bool,
        components: &ComponentList,
    ) -> Self {
        Self {
            ic_ara_id: audit_area_id,
            ic_category: category.into(),
            ic_desc: description.into(),
            ic_active: super::flags::as_int(active),
            components: components.to_payload(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InternalControlChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic_ara_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic_active: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentPayload>>,
}

impl InternalControlChanges {
    /// Replace the component list, renumbered.
    pub fn with_components(mut self, components: &ComponentList) -> Self {
        self.components = Some(components.to_payload());
        self
    }
}

/// Category row of the two-level control tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlNode {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub audit_area_name: String,
    pub active: bool,
    pub components: Vec<ControlComponent>,
    pub is_expanded: bool,
}

/// One category node per control, components in sequence order.
pub fn control_tree(controls: &[InternalControl]) -> Vec<ControlNode> {
    controls
        .iter()
        .map(|control| ControlNode {
            id: control.id,
            category: control.category.clone(),
            description: control.description.clone(),
            audit_area_name: control.audit_area_name.clone(),
            active: control.active,
            components: ComponentList::from_components(&control.components).items,
            is_expanded: false,
        })
        .collect()
}

/// Search the control tree.
///
/// A control whose own text matches keeps all its components. Otherwise it survives only
/// with its matching components and comes back expanded.
pub fn filter_controls(nodes: &[ControlNode], term: &str) -> Vec<ControlNode> {
    if term.is_empty() {
        return nodes.to_vec();
    }
    let needle = term.to_lowercase();

    nodes
        .iter()
        .filter_map(|node| {
            if node_matches(node, &needle) {
                return Some(node.clone());
            }
            let components: Vec<ControlComponent> = node
                .components
                .iter()
                .filter(|c| contains(&c.description, &needle))
                .cloned()
                .collect();
            if components.is_empty() {
                return None;
            }
            Some(ControlNode {
                components,
                is_expanded: true,
                ..node.clone()
            })
        })
        .collect()
}

fn node_matches(node: &ControlNode, needle: &str) -> bool {
    contains(&node.category, needle)
        || contains(&node.description, needle)
        || contains(&node.audit_area_name, needle)
}

pub struct InternalControls;

impl Resource for InternalControls {
    type Record = InternalControl;
    type Create = NewInternalControl;
    type Update = InternalControlChanges;

    const TAB: TabKey = TabKey::InternalControls;
    const ENDPOINT: &'static str = "/internal-controls";
    const COLUMNS: &'static [&'static str] = &["ID", "Category", "Audit Area", "Components"];

    fn row(control: &InternalControl) -> Vec<String> {
        vec![
            control.id.to_string(),
            control.category.clone(),
            control.audit_area_name.clone(),
            control.components.len().to_string(),
        ]
    }

    fn matches(control: &InternalControl, needle: &str) -> bool {
        contains(&control.category, needle)
            || contains(&control.description, needle)
            || contains(&control.audit_area_name, needle)
            || control
                .components
                .iter()
                .any(|c| contains(&c.description, needle))
    }
}
