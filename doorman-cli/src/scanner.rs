//! Periodic reconciliation over open join-request issues.
//!
//! The sweep needs no event payload: it searches all open issues carrying
//! the join-request label, retries stalled team adds, and closes the ones
//! that are done. Re-running it is a no-op for anything it already closed,
//! because the search only returns open issues.

use anyhow::Result;
use tracing::{info, warn};

use doorman_core::{target_from_labels, JoinConfig, LABEL_INVITED};

use crate::github::GitHubClient;
use crate::messages;

/// What the sweep should do with one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAction {
    /// Author not yet a member and no invitation was recorded; leave it be.
    SkipSilently,
    /// Author not yet a member but an invitation is out; nudge them.
    Remind,
    /// Author is a member; make sure the team membership is in place, then
    /// close.
    EnsureTeamThenClose { team_slug: String },
    /// Author is a member and no team is required; close now.
    CloseNow,
}

/// Classify one open issue from facts queried live.
pub fn decide(is_member: bool, has_invited_label: bool, team_slug: Option<&str>) -> ScanAction {
    if !is_member {
        return if has_invited_label {
            ScanAction::Remind
        } else {
            ScanAction::SkipSilently
        };
    }
    match team_slug {
        Some(slug) => ScanAction::EnsureTeamThenClose {
            team_slug: slug.to_string(),
        },
        None => ScanAction::CloseNow,
    }
}

pub async fn scan(
    client: &GitHubClient,
    join_config: &JoinConfig,
    org: &str,
    repo: &str,
) -> Result<()> {
    let issues = client.search_open_join_requests(repo).await?;
    info!("scanning {} open join-request issue(s)", issues.len());

    for issue in issues {
        let labels = issue.label_names();
        let Some(team) = target_from_labels(&labels).and_then(|t| join_config.team(t)) else {
            continue;
        };

        let number = issue.number;
        let author = issue.user.login;
        let is_member = client.is_org_member(org, &author).await?;
        let has_invited = labels.iter().any(|l| l == LABEL_INVITED);

        match decide(is_member, has_invited, team.team_slug.as_deref()) {
            ScanAction::SkipSilently => {}

            ScanAction::Remind => {
                info!("issue #{}: {} has not accepted the invitation", number, author);
                client
                    .post_comment(repo, number, &messages::invite_reminder(&author, org))
                    .await?;
            }

            ScanAction::EnsureTeamThenClose { team_slug } => {
                if !client
                    .team_membership_is_settled(org, &team_slug, &author)
                    .await?
                {
                    let response = client.add_team_member(org, &team_slug, &author).await?;
                    if !matches!(response.status.as_u16(), 200 | 201) {
                        warn!(
                            "issue #{}: team add for {} returned HTTP {}",
                            number, author, response.status
                        );
                        client
                            .post_comment(
                                repo,
                                number,
                                &messages::scan_team_retry_failed(
                                    &author,
                                    org,
                                    &team_slug,
                                    response.status.as_u16(),
                                    &response.body,
                                ),
                            )
                            .await?;
                        continue;
                    }
                }

                client
                    .post_comment(
                        repo,
                        number,
                        &messages::scan_completed(&author, org, Some(team_slug.as_str())),
                    )
                    .await?;
                client.close_issue(repo, number).await?;
            }

            ScanAction::CloseNow => {
                client
                    .post_comment(repo, number, &messages::scan_completed(&author, org, None))
                    .await?;
                client.close_issue(repo, number).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_member_without_invitation_is_skipped() {
        assert_eq!(decide(false, false, Some("infra")), ScanAction::SkipSilently);
        assert_eq!(decide(false, false, None), ScanAction::SkipSilently);
    }

    #[test]
    fn test_non_member_with_invitation_gets_reminded() {
        assert_eq!(decide(false, true, Some("infra")), ScanAction::Remind);
    }

    #[test]
    fn test_member_with_team_requirement() {
        assert_eq!(
            decide(true, true, Some("infra")),
            ScanAction::EnsureTeamThenClose {
                team_slug: "infra".to_string(),
            }
        );
    }

    #[test]
    fn test_member_without_team_requirement_closes() {
        assert_eq!(decide(true, false, None), ScanAction::CloseNow);
    }
}
