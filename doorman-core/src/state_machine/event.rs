//! Events that drive the per-issue state machine.

/// The trigger that caused this invocation.
///
/// The machine reacts to exactly two triggers: the issue being opened and
/// comments (which may carry a command). Everything else is [`Other`] and
/// produces no effects while the request is not yet approved.
///
/// [`Other`]: TriggerEvent::Other
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// The issue was just opened.
    Opened,
    /// A comment was posted on the issue.
    Comment { actor: String, body: String },
    /// Any other event (label change, edit, close, ...).
    Other,
}

impl TriggerEvent {
    /// Classify the raw event fields handed to the process by its invoker.
    pub fn classify(event_name: &str, event_action: &str, actor: &str, comment_body: &str) -> Self {
        if event_action == "opened" {
            return TriggerEvent::Opened;
        }
        if event_name == "issue_comment" && !comment_body.is_empty() {
            return TriggerEvent::Comment {
                actor: actor.to_string(),
                body: comment_body.to_string(),
            };
        }
        TriggerEvent::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_opened() {
        assert_eq!(
            TriggerEvent::classify("issues", "opened", "", ""),
            TriggerEvent::Opened
        );
    }

    #[test]
    fn test_classify_comment() {
        assert_eq!(
            TriggerEvent::classify("issue_comment", "created", "alice", "/approve"),
            TriggerEvent::Comment {
                actor: "alice".to_string(),
                body: "/approve".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_other() {
        // A comment event with an empty body carries nothing to act on.
        assert_eq!(
            TriggerEvent::classify("issue_comment", "created", "alice", ""),
            TriggerEvent::Other
        );
        assert_eq!(
            TriggerEvent::classify("issues", "labeled", "", ""),
            TriggerEvent::Other
        );
    }
}
