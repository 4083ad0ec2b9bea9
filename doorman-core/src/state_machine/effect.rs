//! Effects (side effects as data).
//!
//! Effects describe what should happen as a result of a transition. They are
//! pure data; the binary crate renders comment contents and executes the
//! API calls. This separation keeps the approval logic testable without
//! mocking HTTP.

/// All effects a transition can produce, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post a comment on the issue.
    PostComment { content: CommentContent },
    /// Add labels to the issue.
    AddLabels { labels: Vec<String> },
    /// Set the issue's assignees.
    SetAssignees { assignees: Vec<String> },
}

/// User-visible comment bodies produced by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentContent {
    /// No recognized `target:<name>` label, or the name is not configured.
    UnknownTarget,
    /// Approval mode with neither reviewer users nor reviewer teams set.
    NoReviewersConfigured,
    /// The requirement list posted when review begins.
    ApprovalRequirements {
        users: Vec<String>,
        teams: Vec<String>,
    },
    /// The commenting actor is not an authorized reviewer.
    ApprovalUnauthorized { actor: String },
    /// Approval registered, but named explicit reviewers are still missing.
    ApprovalMissingUsers {
        actor: String,
        missing: Vec<String>,
    },
    /// Approval registered, but the team-bucket requirement is unmet.
    ApprovalMissingTeam { actor: String, teams: Vec<String> },
    /// Every requirement is satisfied.
    ApprovalGranted { approvers: Vec<String> },
}
