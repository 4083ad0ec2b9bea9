//! Join-request side effects after a `Proceed` decision.
//!
//! Runs for the issue author only, never the commenting actor. Each step is
//! observable through a posted comment; an invitation failure halts the
//! sequence, a team-add failure defers completion to the scanner.

use anyhow::Result;
use tracing::{info, warn};

use doorman_core::{TeamConfig, LABEL_INVITED, LABEL_WAIT_SCANNING};

use crate::interpreter::EffectContext;
use crate::messages;

pub async fn process_join_request(
    ctx: &EffectContext<'_>,
    team: &TeamConfig,
    author: &str,
) -> Result<()> {
    let org = ctx.org;

    if !ctx.client.is_org_member(org, author).await? {
        // Resolution failure is a hard error: without the numeric id there
        // is no invitation to send.
        let invitee_id = ctx.client.user_id(author).await?;

        let response = ctx.client.invite_to_org(org, invitee_id).await?;
        if !matches!(response.status.as_u16(), 201 | 202) {
            warn!(
                "invitation for {} returned HTTP {}",
                author, response.status
            );
            ctx.post(&messages::invite_failed(
                author,
                response.status.as_u16(),
                &response.body,
            ))
            .await?;
            return Ok(());
        }

        info!("invited {} to {}", author, org);
        ctx.post(&messages::invited(author, org)).await?;
        ctx.add_labels(&[LABEL_INVITED]).await?;
    } else {
        ctx.post(&messages::already_member(author, org)).await?;
    }

    let Some(team_slug) = team.team_slug.as_deref() else {
        return Ok(());
    };

    let response = ctx.client.add_team_member(org, team_slug, author).await?;
    if matches!(response.status.as_u16(), 200 | 201) {
        info!("added {} to {}/{}", author, org, team_slug);
        ctx.post(&messages::team_added(author, org, team_slug)).await?;
    } else {
        // Usually the invitation has not been accepted yet; the scanner
        // retries until it lands.
        warn!(
            "team add for {} returned HTTP {}; deferring to scanner",
            author, response.status
        );
        ctx.post(&messages::team_add_deferred(
            author,
            org,
            team_slug,
            response.status.as_u16(),
            &response.body,
        ))
        .await?;
        ctx.add_labels(&[LABEL_WAIT_SCANNING]).await?;
    }

    Ok(())
}
