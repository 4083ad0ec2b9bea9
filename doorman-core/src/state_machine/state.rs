//! Snapshot types for a single join-request issue.
//!
//! A snapshot is fetched once per invocation and treated as immutable input
//! to the transition; nothing here is cached across runs. The issue's labels
//! are the only persisted state the machine has.

use std::fmt;

/// Label marking an issue as a join request (the scanner's search filter).
pub const LABEL_JOIN_REQUEST: &str = "join-request";
/// Prefix of the label selecting a team configuration.
pub const TARGET_LABEL_PREFIX: &str = "target:";
/// Review has been requested from the roster.
pub const LABEL_PENDING_APPROVAL: &str = "pending-approval";
/// All approval requirements are satisfied.
pub const LABEL_APPROVED: &str = "approved";
/// An org invitation has been sent to the author.
pub const LABEL_INVITED: &str = "invited";
/// Team add failed; completion deferred to the scanner.
pub const LABEL_WAIT_SCANNING: &str = "wait-scanning";

/// Lowercase-normalized GitHub login.
///
/// Every username comparison in the approval flow goes through this type,
/// so authorization and tallying can never disagree on case handling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoginKey(String);

impl LoginKey {
    pub fn of(login: &str) -> Self {
        Self(login.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LoginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One comment on the issue, in posting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestComment {
    pub author: String,
    pub body: String,
}

/// Immutable snapshot of a join-request issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub number: u64,
    /// The requesting user; all processor side effects target this login.
    pub author: String,
    pub labels: Vec<String>,
    pub comments: Vec<RequestComment>,
}

impl JoinRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    pub fn is_approved(&self) -> bool {
        self.has_label(LABEL_APPROVED)
    }

    pub fn target(&self) -> Option<&str> {
        target_from_labels(&self.labels)
    }
}

/// Extract the target name from the first `target:<name>` label.
pub fn target_from_labels(labels: &[String]) -> Option<&str> {
    labels
        .iter()
        .find_map(|l| l.strip_prefix(TARGET_LABEL_PREFIX).filter(|t| !t.is_empty()))
}
