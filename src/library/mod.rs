//! Reference-data resources, the per-tab panel view-model, and the library controller.

pub mod agency;
pub mod audit_area;
pub mod audit_criteria;
pub mod audit_type;
pub mod auditor;
pub mod document_type;
pub mod flags;
pub mod internal_control;
pub mod panel;
pub mod resource;
pub mod tabs;
pub mod user_account;

pub use agency::{Agencies, Agency};
pub use audit_area::{AuditArea, AuditAreas};
pub use audit_criteria::{AuditCriteria, AuditCriterion};
pub use audit_type::{AuditType, AuditTypes};
pub use auditor::{Auditor, Auditors};
pub use document_type::{DocumentType, DocumentTypes};
pub use internal_control::{ControlComponent, InternalControl, InternalControls};
pub use panel::{Editing, Panel};
pub use resource::{Identified, RecordStore, Resource};
pub use tabs::{Library, TabKey, TabPanel};
pub use user_account::{UserAccount, UserAccounts};
