//! Pure transition for a single join-request invocation.
//!
//! Given the issue snapshot, the resolved target, and the triggering event,
//! produce effects plus the decision the processor stage consumes. The
//! function has no side effects and performs no I/O.

use crate::command::{parse_comment, IssueCommand};
use crate::join_config::{ApprovalMode, TeamConfig};

use super::approval::{self, ApprovalOutcome, ReviewerRoster};
use super::effect::{CommentContent, Effect};
use super::event::TriggerEvent;
use super::state::{JoinRequest, LABEL_APPROVED, LABEL_PENDING_APPROVAL};

/// What the issue's target label resolved to for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetResolution<'a> {
    /// No `target:<name>` label, or the name is not in the configuration.
    Unknown,
    /// A configured target. The roster carries the live reviewer team
    /// member lists and is empty for auto-mode targets.
    Known {
        config: &'a TeamConfig,
        roster: ReviewerRoster,
    },
}

/// Whether the join-request processor should run after this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NotReady,
    Proceed,
}

/// Result of a transition: effects to apply in order, then the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub effects: Vec<Effect>,
    pub decision: Decision,
}

impl TransitionResult {
    pub fn not_ready(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            decision: Decision::NotReady,
        }
    }

    pub fn proceed(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            decision: Decision::Proceed,
        }
    }
}

/// Pure transition function.
pub fn transition(
    request: &JoinRequest,
    target: &TargetResolution<'_>,
    event: &TriggerEvent,
) -> TransitionResult {
    let (config, roster) = match target {
        TargetResolution::Unknown => {
            return TransitionResult::not_ready(vec![comment(CommentContent::UnknownTarget)]);
        }
        TargetResolution::Known { config, roster } => (*config, roster),
    };

    match config.mode {
        ApprovalMode::Auto => match event {
            TriggerEvent::Opened => TransitionResult::proceed(vec![]),
            _ => TransitionResult::not_ready(vec![]),
        },
        ApprovalMode::Approval => approval_transition(request, roster, event),
    }
}

fn approval_transition(
    request: &JoinRequest,
    roster: &ReviewerRoster,
    event: &TriggerEvent,
) -> TransitionResult {
    // The approved label is the persisted outcome: once present, any later
    // invocation goes straight to the processor.
    if request.has_label(LABEL_APPROVED) {
        return TransitionResult::proceed(vec![]);
    }

    match event {
        TriggerEvent::Opened => {
            let mut effects = Vec::new();
            if roster.is_empty() {
                effects.push(comment(CommentContent::NoReviewersConfigured));
            } else {
                effects.push(Effect::SetAssignees {
                    assignees: roster.assignees(),
                });
                effects.push(comment(CommentContent::ApprovalRequirements {
                    users: roster.users.clone(),
                    teams: roster.team_slugs(),
                }));
            }
            effects.push(Effect::AddLabels {
                labels: vec![LABEL_PENDING_APPROVAL.to_string()],
            });
            TransitionResult::not_ready(effects)
        }

        TriggerEvent::Comment { actor, body }
            if matches!(parse_comment(body), Some(IssueCommand::Approve)) =>
        {
            match approval::evaluate(roster, &request.comments, actor) {
                ApprovalOutcome::Unauthorized => {
                    TransitionResult::not_ready(vec![comment(CommentContent::ApprovalUnauthorized {
                        actor: actor.clone(),
                    })])
                }
                ApprovalOutcome::MissingUsers { missing } => {
                    TransitionResult::not_ready(vec![comment(CommentContent::ApprovalMissingUsers {
                        actor: actor.clone(),
                        missing,
                    })])
                }
                ApprovalOutcome::MissingTeamApproval { teams } => {
                    TransitionResult::not_ready(vec![comment(CommentContent::ApprovalMissingTeam {
                        actor: actor.clone(),
                        teams,
                    })])
                }
                ApprovalOutcome::Granted { approvers } => TransitionResult::proceed(vec![
                    comment(CommentContent::ApprovalGranted { approvers }),
                    Effect::AddLabels {
                        labels: vec![LABEL_APPROVED.to_string()],
                    },
                ]),
            }
        }

        // Not a trigger the machine reacts to while unapproved.
        _ => TransitionResult::not_ready(vec![]),
    }
}

fn comment(content: CommentContent) -> Effect {
    Effect::PostComment { content }
}
