//! Comment command parsing for join-request issues.

use std::fmt;

/// A recognized command posted as an issue comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCommand {
    /// Approve the join request.
    Approve,
}

impl fmt::Display for IssueCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCommand::Approve => write!(f, "/approve"),
        }
    }
}

/// Parse a comment body for a command.
///
/// The whole body, trimmed, must equal the command (case-insensitive).
/// `/approve` embedded in a longer comment is deliberately not a command,
/// so quoting or discussing it never triggers an approval.
pub fn parse_comment(body: &str) -> Option<IssueCommand> {
    if body.trim().eq_ignore_ascii_case("/approve") {
        Some(IssueCommand::Approve)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_approve() {
        assert_eq!(parse_comment("/approve"), Some(IssueCommand::Approve));
        assert_eq!(parse_comment("/Approve"), Some(IssueCommand::Approve));
        assert_eq!(parse_comment("/APPROVE"), Some(IssueCommand::Approve));
        assert_eq!(parse_comment("  /approve  \n"), Some(IssueCommand::Approve));
    }

    #[test]
    fn test_embedded_approve_is_not_a_command() {
        assert_eq!(parse_comment("I would /approve this"), None);
        assert_eq!(parse_comment("/approve\nlooks good"), None);
        assert_eq!(parse_comment("please /approve"), None);
    }

    #[test]
    fn test_non_commands() {
        assert_eq!(parse_comment(""), None);
        assert_eq!(parse_comment("approve"), None);
        assert_eq!(parse_comment("/reject"), None);
        assert_eq!(parse_comment("/approved"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(IssueCommand::Approve.to_string(), "/approve");
    }
}
