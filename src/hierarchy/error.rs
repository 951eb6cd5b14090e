use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Duplicate record id: {0}")]
    DuplicateId(i64),

    #[error("Record {0} has an empty name")]
    EmptyName(i64),

    #[error("Parent chain forms a cycle through records {ids:?}")]
    Cycle { ids: Vec<i64> },

    #[error("Record {0} cannot be its own parent")]
    SelfParent(i64),

    #[error("Parent record {0} does not exist")]
    UnknownParent(i64),

    #[error("Moving record {node_id} under {candidate_parent_id} would create a cycle (ancestry: {chain:?})")]
    WouldCreateCycle {
        node_id: i64,
        candidate_parent_id: i64,
        chain: Vec<i64>,
    },
}
