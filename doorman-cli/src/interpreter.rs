//! Executes state-machine effects against the real API.
//!
//! The boundary between the pure transition and I/O. Effects are applied in
//! order; a non-2xx on one of these writes is logged and the rest still run,
//! mirroring how the issue annotations are best-effort.

use anyhow::Result;
use tracing::{info, warn};

use doorman_core::Effect;

use crate::github::GitHubClient;
use crate::messages;

/// Everything needed to apply effects to one issue.
pub struct EffectContext<'a> {
    pub client: &'a GitHubClient,
    pub repo: &'a str,
    pub org: &'a str,
    pub issue_number: u64,
}

impl EffectContext<'_> {
    /// Post a comment, logging (not failing) on an HTTP error status.
    pub async fn post(&self, body: &str) -> Result<()> {
        self.client
            .post_comment(self.repo, self.issue_number, body)
            .await?;
        Ok(())
    }

    pub async fn add_labels(&self, labels: &[&str]) -> Result<()> {
        self.client
            .add_labels(self.repo, self.issue_number, labels)
            .await?;
        Ok(())
    }
}

/// Apply the transition's effects in order.
pub async fn execute_effects(ctx: &EffectContext<'_>, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
        execute_effect(ctx, effect).await?;
    }
    Ok(())
}

async fn execute_effect(ctx: &EffectContext<'_>, effect: Effect) -> Result<()> {
    match effect {
        Effect::PostComment { content } => {
            ctx.post(&messages::render(&content, ctx.org)).await?;
        }
        Effect::AddLabels { labels } => {
            info!("labeling issue #{} with {:?}", ctx.issue_number, labels);
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            ctx.add_labels(&labels).await?;
        }
        Effect::SetAssignees { assignees } => {
            info!(
                "assigning issue #{} to {:?}",
                ctx.issue_number, assignees
            );
            let response = ctx
                .client
                .set_assignees(ctx.repo, ctx.issue_number, &assignees)
                .await?;
            if !response.is_success() {
                warn!(
                    "assignment returned HTTP {}; reviewers may need to self-assign",
                    response.status
                );
            }
        }
    }
    Ok(())
}
