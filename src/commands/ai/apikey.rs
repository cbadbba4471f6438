//! Defines the `apikey` command, which lets administrators store the Gemini API key.

use poise::{CreateReply, serenity_prelude as serenity};
use tracing::{debug, warn};

use super::*;
use crate::cog::{KeyUpdateError, Requester, error_reply};
use crate::is_admin;

/// Update the Google Gemini API key (administrators only)
///
/// The key can be passed directly (`apikey <your_key>`); otherwise the bot asks for it
/// and waits a minute for your next message in this channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("set_api_key"),
    category = "Admin"
)]
pub async fn apikey(
    ctx: Context<'_>,
    #[description = "The API key (leave empty to be prompted for it)"]
    #[rest]
    key: Option<String>,
) -> CommandResult {
    let author = ctx.author();
    debug!("API key update requested by {}", author.name);

    let requester = Requester {
        name: author.name.clone(),
        is_admin: is_admin(ctx).await?,
    };
    let cog = &ctx.data().cog;

    if let (poise::Context::Prefix(prefix_ctx), Some(_)) = (ctx, &key) {
        if let Err(e) = prefix_ctx.msg.delete(ctx).await {
            warn!("Could not delete command message containing the API key: {}", e);
        }
    }

    // Only polled when no inline key was given and the requester is an administrator.
    let follow_up = async {
        ctx.say(format!(
            "Please enter your Google Gemini API key. You can also use `{}apikey <your_key>` directly to set it.",
            ctx.prefix()
        ))
        .await
        .ok()?;

        let reply = serenity::MessageCollector::new(ctx.serenity_context())
            .author_id(author.id)
            .channel_id(ctx.channel_id())
            .timeout(cog.reply_timeout())
            .next()
            .await?;

        // Keep the key out of the channel history.
        if let Err(e) = reply.delete(ctx).await {
            warn!("Could not delete message containing the API key: {}", e);
        }

        Some(reply.content)
    };

    let content = match cog.set_key(&requester, key, follow_up).await {
        Ok(masked) => format!("API key updated successfully (ends in `{masked}`)."),
        Err(KeyUpdateError::NotAdministrator) => {
            "You need administrator permissions to change the API key.".to_string()
        }
        Err(e) => error_reply(e),
    };

    // Ephemeral only applies to slash invocations.
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}
