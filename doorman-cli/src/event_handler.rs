//! Per-event orchestration.
//!
//! One invocation handles one issue event: fetch the snapshot, resolve the
//! target and the live reviewer roster, run the pure transition, apply its
//! effects, and run the processor if the machine says to proceed.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;

use doorman_core::{
    transition, ApprovalMode, Decision, JoinConfig, JoinRequest, RequestComment, Reviewers,
    ReviewerRoster, TargetResolution, TriggerEvent,
};

use crate::config::EventPayload;
use crate::github::GitHubClient;
use crate::interpreter::{self, EffectContext};
use crate::processor;

pub async fn handle_event(
    client: &GitHubClient,
    join_config: &JoinConfig,
    org: &str,
    repo: &str,
    payload: &EventPayload,
) -> Result<()> {
    let issue = client.get_issue(repo, payload.issue_number).await?;
    let labels = issue.label_names();

    let event = TriggerEvent::classify(
        &payload.event_name,
        &payload.event_action,
        &payload.actor,
        &payload.comment_body,
    );

    // Comments only feed the approval tally, so they are fetched when the
    // trigger is a comment.
    let comments = match &event {
        TriggerEvent::Comment { .. } => client
            .issue_comments(repo, payload.issue_number)
            .await?
            .into_iter()
            .map(|c| RequestComment {
                author: c.user.login,
                body: c.body,
            })
            .collect(),
        _ => Vec::new(),
    };

    let request = JoinRequest {
        number: payload.issue_number,
        author: payload.author.clone(),
        labels,
        comments,
    };

    let team = request.target().and_then(|t| join_config.team(t));
    let target = match team {
        None => TargetResolution::Unknown,
        Some(config) => {
            let roster = match config.mode {
                ApprovalMode::Approval => {
                    resolve_roster(client, org, &config.reviewers).await?
                }
                ApprovalMode::Auto => ReviewerRoster::default(),
            };
            TargetResolution::Known { config, roster }
        }
    };

    let result = transition(&request, &target, &event);
    info!(
        "issue #{}: {} effect(s), decision {:?}",
        request.number,
        result.effects.len(),
        result.decision
    );

    let ctx = EffectContext {
        client,
        repo,
        org,
        issue_number: request.number,
    };
    interpreter::execute_effects(&ctx, result.effects).await?;

    if result.decision == Decision::Proceed {
        if let Some(config) = team {
            processor::process_join_request(&ctx, config, &request.author).await?;
        }
    }

    Ok(())
}

/// Resolve the live reviewer roster: explicit users from the configuration
/// plus the current member list of each reviewer team. Queried on every
/// invocation; never cached.
pub async fn resolve_roster(
    client: &GitHubClient,
    org: &str,
    reviewers: &Reviewers,
) -> Result<ReviewerRoster> {
    let mut team_members = BTreeMap::new();
    for slug in &reviewers.teams {
        let members = client.team_members(org, slug).await?;
        team_members.insert(slug.clone(), members);
    }
    Ok(ReviewerRoster {
        users: reviewers.users.clone(),
        team_members,
    })
}
