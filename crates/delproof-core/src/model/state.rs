use serde::Serialize;

/// States of the deletion workflow, in the order they are reached
///
/// The derived ordering follows declaration order, so `state >= Deleted`
/// reads as "the delete call has been issued and accepted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WorkflowState {
    Start,
    Fetched,
    Committed,
    Deleted,
    Verified,
    Timestamped,
    Receipted,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Start => "start",
            WorkflowState::Fetched => "fetched",
            WorkflowState::Committed => "committed",
            WorkflowState::Deleted => "deleted",
            WorkflowState::Verified => "verified",
            WorkflowState::Timestamped => "timestamped",
            WorkflowState::Receipted => "receipted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Receipted)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
