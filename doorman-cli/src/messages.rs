//! Every user-visible comment body, in one place.

use doorman_core::CommentContent;
use serde_json::Value;

/// Render a state-machine comment for the given organization.
pub fn render(content: &CommentContent, org: &str) -> String {
    match content {
        CommentContent::UnknownTarget => {
            "No recognized target: this request needs a `target:<name>` label \
             that matches a configured team."
                .to_string()
        }

        CommentContent::NoReviewersConfigured => {
            "This request requires review, but no reviewers.users or \
             reviewers.teams are configured for this target. A maintainer \
             needs to complete the configuration."
                .to_string()
        }

        CommentContent::ApprovalRequirements { users, teams } => {
            let mut requirements = Vec::new();
            if !users.is_empty() {
                requirements.push(format!("- Approval required from: {}", mention_list(users)));
            }
            if !teams.is_empty() {
                requirements.push(format!(
                    "- At least one approval required from a member of {}",
                    team_list(org, teams)
                ));
            }
            format!(
                "**This request requires review**\n{}\n\nReply `/approve` in a comment to approve.",
                requirements.join("\n")
            )
        }

        CommentContent::ApprovalUnauthorized { actor } => {
            format!("@{} you are not authorized to approve this request.", actor)
        }

        CommentContent::ApprovalMissingUsers { actor, missing } => format!(
            "@{} approval recorded. Still waiting for approval from: {}.",
            actor,
            mention_list(missing)
        ),

        CommentContent::ApprovalMissingTeam { actor, teams } => format!(
            "@{} approval recorded. Still waiting for an approval from a \
             member of {} (members already listed as required users do not count).",
            actor,
            teams.join(", ")
        ),

        CommentContent::ApprovalGranted { approvers } => format!(
            "\u{2705} Approval complete! Approved by: {}\n\nProcessing the join request...",
            mention_list(approvers)
        ),
    }
}

pub fn invited(user: &str, org: &str) -> String {
    format!(
        "@{user} an invitation to **@{org}** has been sent. Please accept it \
         soon:\n\n{}",
        invitation_url(org)
    )
}

pub fn invite_failed(user: &str, status: u16, body: &Value) -> String {
    format!(
        "@{user} the organization invitation failed: HTTP {status}\n\n{}",
        json_block(body)
    )
}

pub fn already_member(user: &str, org: &str) -> String {
    format!("@{user} you are already a member of **@{org}**.")
}

pub fn team_added(user: &str, org: &str, team: &str) -> String {
    format!("@{user} added to **@{org}/{team}**.")
}

pub fn team_add_deferred(user: &str, org: &str, team: &str, status: u16, body: &Value) -> String {
    format!(
        "@{user} the invitation has been processed, but joining \
         **@{org}/{team}** is not complete yet (the organization invitation \
         may need to be accepted first).\n\nThe periodic scan will finish \
         this automatically.\n\nHTTP {status}\n\n{}",
        json_block(body)
    )
}

pub fn invite_reminder(user: &str, org: &str) -> String {
    format!(
        "@{user} reminder: you have not joined **@{org}** yet. Please accept \
         the invitation here:\n\n{}",
        invitation_url(org)
    )
}

pub fn scan_team_retry_failed(user: &str, org: &str, team: &str, status: u16, body: &Value) -> String {
    format!(
        "@{user} you are a member of **@{org}**, but adding you to \
         **@{org}/{team}** failed again; it will be retried on a later \
         scan.\n\nHTTP {status}\n\n{}",
        json_block(body)
    )
}

pub fn scan_completed(user: &str, org: &str, team: Option<&str>) -> String {
    match team {
        Some(team) => format!(
            "@{user} \u{2705} confirmed you have joined **@{org}** and \
             **@{org}/{team}**. Closing this issue."
        ),
        None => format!(
            "@{user} \u{2705} confirmed you have joined **@{org}**. Closing this issue."
        ),
    }
}

fn invitation_url(org: &str) -> String {
    format!("https://github.com/orgs/{org}/invitation")
}

fn json_block(body: &Value) -> String {
    let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    format!("```json\n{}\n```", pretty)
}

fn mention_list(users: &[String]) -> String {
    users
        .iter()
        .map(|u| format!("@{}", u))
        .collect::<Vec<_>>()
        .join(", ")
}

fn team_list(org: &str, teams: &[String]) -> String {
    teams
        .iter()
        .map(|t| format!("@{}/{}", org, t))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requirements_lists_users_and_teams() {
        let body = render(
            &CommentContent::ApprovalRequirements {
                users: vec!["alice".to_string(), "bob".to_string()],
                teams: vec!["leads".to_string()],
            },
            "acme",
        );
        assert!(body.contains("@alice, @bob"));
        assert!(body.contains("@acme/leads"));
        assert!(body.contains("`/approve`"));
    }

    #[test]
    fn test_unauthorized_names_the_actor() {
        let body = render(
            &CommentContent::ApprovalUnauthorized {
                actor: "mallory".to_string(),
            },
            "acme",
        );
        assert!(body.starts_with("@mallory "));
    }

    #[test]
    fn test_invite_failed_embeds_status_and_json() {
        let body = invite_failed("newcomer", 422, &json!({ "message": "Validation Failed" }));
        assert!(body.contains("HTTP 422"));
        assert!(body.contains("```json"));
        assert!(body.contains("Validation Failed"));
    }

    #[test]
    fn test_invited_links_the_invitation_page() {
        let body = invited("newcomer", "acme");
        assert!(body.contains("https://github.com/orgs/acme/invitation"));
    }

    #[test]
    fn test_scan_completed_with_and_without_team() {
        assert!(scan_completed("u", "acme", Some("infra")).contains("**@acme/infra**"));
        assert!(!scan_completed("u", "acme", None).contains('/'));
    }
}
