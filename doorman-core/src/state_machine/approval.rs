//! Approval tallying for review-gated join requests.

use std::collections::{BTreeMap, BTreeSet};

use crate::command::{parse_comment, IssueCommand};

use super::state::{LoginKey, RequestComment};

/// The reviewers authorized to approve a request: explicit users from the
/// configuration plus the live member list of each reviewer team.
///
/// Team membership is resolved by the caller at decision time and passed in
/// here; it is never derived from configuration or cached between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerRoster {
    /// Explicit reviewer logins, configuration casing preserved.
    pub users: Vec<String>,
    /// Team slug -> current member logins.
    pub team_members: BTreeMap<String, Vec<String>>,
}

impl ReviewerRoster {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.team_members.is_empty()
    }

    pub fn team_slugs(&self) -> Vec<String> {
        self.team_members.keys().cloned().collect()
    }

    /// Everyone to assign to the issue: explicit users first, then team
    /// members in team order.
    pub fn assignees(&self) -> Vec<String> {
        let mut out = self.users.clone();
        for members in self.team_members.values() {
            out.extend(members.iter().cloned());
        }
        out
    }

    fn user_keys(&self) -> BTreeSet<LoginKey> {
        self.users.iter().map(|u| LoginKey::of(u)).collect()
    }

    /// The full authorized set, lowercase-normalized.
    pub fn authorized(&self) -> BTreeSet<LoginKey> {
        let mut set = self.user_keys();
        for members in self.team_members.values() {
            set.extend(members.iter().map(|m| LoginKey::of(m)));
        }
        set
    }
}

/// Result of tallying `/approve` comments against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The triggering actor is not an authorized reviewer.
    Unauthorized,
    /// Explicit reviewers still missing, configuration casing preserved.
    MissingUsers { missing: Vec<String> },
    /// Every explicit reviewer approved, but no team member outside the
    /// explicit list has.
    MissingTeamApproval { teams: Vec<String> },
    /// All requirements satisfied; approvers sorted, lowercased.
    Granted { approvers: Vec<String> },
}

/// Tally approvals for the triggering `/approve` from `actor`.
///
/// Scans every prior comment whose trimmed body is exactly `/approve`,
/// keeps those from currently-authorized commenters, and includes the
/// actor. Approval is granted only when every explicit reviewer user has
/// approved and, if any reviewer team is configured, at least one team
/// member outside the explicit user list has approved. Explicit users and
/// team members are mutually exclusive buckets: one login never satisfies
/// both requirements.
pub fn evaluate(
    roster: &ReviewerRoster,
    comments: &[RequestComment],
    actor: &str,
) -> ApprovalOutcome {
    let authorized = roster.authorized();
    let actor_key = LoginKey::of(actor);
    if !authorized.contains(&actor_key) {
        return ApprovalOutcome::Unauthorized;
    }

    let mut approved: BTreeSet<LoginKey> = comments
        .iter()
        .filter(|c| matches!(parse_comment(&c.body), Some(IssueCommand::Approve)))
        .map(|c| LoginKey::of(&c.author))
        .filter(|key| authorized.contains(key))
        .collect();
    approved.insert(actor_key);

    let missing: Vec<String> = roster
        .users
        .iter()
        .filter(|user| !approved.contains(&LoginKey::of(user)))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return ApprovalOutcome::MissingUsers { missing };
    }

    if !roster.team_members.is_empty() {
        let user_keys = roster.user_keys();
        let team_approved = roster.team_members.values().flatten().any(|member| {
            let key = LoginKey::of(member);
            approved.contains(&key) && !user_keys.contains(&key)
        });
        if !team_approved {
            return ApprovalOutcome::MissingTeamApproval {
                teams: roster.team_slugs(),
            };
        }
    }

    ApprovalOutcome::Granted {
        approvers: approved.into_iter().map(LoginKey::into_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(users: &[&str], teams: &[(&str, &[&str])]) -> ReviewerRoster {
        ReviewerRoster {
            users: users.iter().map(|s| s.to_string()).collect(),
            team_members: teams
                .iter()
                .map(|(slug, members)| {
                    (
                        slug.to_string(),
                        members.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    fn approve(author: &str) -> RequestComment {
        RequestComment {
            author: author.to_string(),
            body: "/approve".to_string(),
        }
    }

    #[test]
    fn test_single_user_case_insensitive() {
        let roster = roster(&["alice"], &[]);
        let outcome = evaluate(&roster, &[], "Alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::Granted {
                approvers: vec!["alice".to_string()],
            }
        );
    }

    #[test]
    fn test_unauthorized_actor() {
        let roster = roster(&["alice"], &[("leads", &["bob"])]);
        assert_eq!(evaluate(&roster, &[], "mallory"), ApprovalOutcome::Unauthorized);
    }

    #[test]
    fn test_user_alone_still_needs_team() {
        let roster = roster(&["alice"], &[("leads", &["bob"])]);
        let outcome = evaluate(&roster, &[], "alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::MissingTeamApproval {
                teams: vec!["leads".to_string()],
            }
        );
    }

    #[test]
    fn test_team_member_alone_still_needs_users() {
        let roster = roster(&["alice"], &[("leads", &["bob"])]);
        let outcome = evaluate(&roster, &[], "bob");
        assert_eq!(
            outcome,
            ApprovalOutcome::MissingUsers {
                missing: vec!["alice".to_string()],
            }
        );
    }

    #[test]
    fn test_user_and_team_member_grant() {
        let roster = roster(&["alice"], &[("leads", &["bob"])]);
        let comments = [approve("Bob")];
        let outcome = evaluate(&roster, &comments, "alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::Granted {
                approvers: vec!["alice".to_string(), "bob".to_string()],
            }
        );
    }

    #[test]
    fn test_user_in_team_never_counts_as_team_approval() {
        // alice sits in both buckets; her approval satisfies only the
        // explicit-user requirement.
        let roster = roster(&["alice"], &[("leads", &["alice", "bob"])]);
        let outcome = evaluate(&roster, &[], "alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::MissingTeamApproval {
                teams: vec!["leads".to_string()],
            }
        );
    }

    #[test]
    fn test_no_team_requirement_when_unconfigured() {
        let roster = roster(&["alice", "carol"], &[]);
        let comments = [approve("carol")];
        assert_eq!(
            evaluate(&roster, &comments, "alice"),
            ApprovalOutcome::Granted {
                approvers: vec!["alice".to_string(), "carol".to_string()],
            }
        );
    }

    #[test]
    fn test_comments_from_deauthorized_users_do_not_count() {
        // eve approved earlier but is no longer in the roster.
        let roster = roster(&["alice"], &[("leads", &["bob"])]);
        let comments = [approve("eve"), approve("alice")];
        let outcome = evaluate(&roster, &comments, "alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::MissingTeamApproval {
                teams: vec!["leads".to_string()],
            }
        );
    }

    #[test]
    fn test_non_command_comments_are_ignored() {
        let roster = roster(&["alice", "carol"], &[]);
        let comments = [
            RequestComment {
                author: "carol".to_string(),
                body: "I will /approve later".to_string(),
            },
            RequestComment {
                author: "carol".to_string(),
                body: "lgtm".to_string(),
            },
        ];
        assert_eq!(
            evaluate(&roster, &comments, "alice"),
            ApprovalOutcome::MissingUsers {
                missing: vec!["carol".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_users_preserve_config_casing() {
        let roster = roster(&["Alice", "Carol"], &[]);
        let outcome = evaluate(&roster, &[], "alice");
        assert_eq!(
            outcome,
            ApprovalOutcome::MissingUsers {
                missing: vec!["Carol".to_string()],
            }
        );
    }

    #[test]
    fn test_assignees_users_then_team_members() {
        let roster = roster(&["alice"], &[("leads", &["bob", "carol"])]);
        assert_eq!(roster.assignees(), ["alice", "bob", "carol"]);
    }
}
