//! Role checks for the creation commands.

use crate::framework::{reply_ephemeral, Context, Error};
use cutie_common::RoleId;
use poise::serenity_prelude as serenity;
use tracing::debug;

/// Whether `roles` satisfies `required`. Unset means everyone may.
pub fn role_allows(required: Option<RoleId>, roles: &[serenity::RoleId]) -> bool {
    required.map_or(true, |role| roles.iter().any(|held| held.get() == role.get()))
}

/// Checks that the author holds `required`, answering with an ephemeral
/// refusal when not.
///
/// # Errors
///
/// Returns an error when the refusal cannot be sent.
pub async fn ensure_role(ctx: Context<'_>, required: Option<RoleId>) -> Result<bool, Error> {
    let Some(role) = required else {
        return Ok(true);
    };

    let allowed = match ctx.author_member().await {
        Some(member) => role_allows(required, &member.roles),
        None => false,
    };

    if !allowed {
        debug!("{} lacks role {} for /{}", ctx.author().id, role, ctx.command().name);
        let text = ctx
            .data()
            .messages
            .format("error-missing-role", &[("role", role.mention().into())]);
        reply_ephemeral(ctx, text).await?;
    }

    Ok(allowed)
}
