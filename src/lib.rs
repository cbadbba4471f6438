//! A Discord bot that relays questions to Google Gemini and lets administrators manage the API key.

use poise::serenity_prelude as serenity;

pub mod cog;
pub mod commands;
pub mod config;
pub mod utils;

use cog::GeminiCog;
use utils::gemini_client::GeminiClient;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub cog: GeminiCog<GeminiClient>,
}

/// Returns every command the bot registers.
pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    use commands::{
        ai::{apikey::*, query::*},
        general::{help::*, register::*},
    };

    vec![
        // Default commands
        register(),
        help(),
        // AI-centric commands
        ai(),
        apikey(),
    ]
}

/// Logs framework errors before handing them to poise's default reporting.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    if let poise::FrameworkError::Command { error, ctx, .. } = &error {
        tracing::error!("Command '{}' failed: {}", ctx.command().name, error);
    }

    if let Err(e) = poise::builtins::on_error(error).await {
        tracing::error!("Error while handling error: {}", e);
    }
}

/// Guild-level permissions of a member: the `@everyone` role plus every role they hold.
pub fn effective_permissions(
    everyone: serenity::Permissions,
    roles: impl IntoIterator<Item = serenity::Permissions>,
) -> serenity::Permissions {
    roles.into_iter().fold(everyone, |acc, perms| acc | perms)
}

/// The guild owner always counts as an administrator.
pub fn grants_admin(is_owner: bool, permissions: serenity::Permissions) -> bool {
    is_owner || permissions.contains(serenity::Permissions::ADMINISTRATOR)
}

/// Whether the invoking user may administer the bot in this guild.
/// Falls back to fetching the guild over HTTP when it is not cached.
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(false);
    };

    let author_id = ctx.author().id;
    let member = guild_id.member(ctx, author_id).await?;
    // The @everyone role shares the guild's id.
    let everyone_id = serenity::RoleId::new(guild_id.get());

    let cached = ctx.guild().map(|guild| {
        let lookup = |id: &serenity::RoleId| guild.roles.get(id).map(|role| role.permissions);
        (
            guild.owner_id,
            effective_permissions(
                lookup(&everyone_id).unwrap_or_else(serenity::Permissions::empty),
                member.roles.iter().filter_map(lookup),
            ),
        )
    });

    let (owner_id, permissions) = match cached {
        Some(found) => found,
        None => {
            let guild = guild_id.to_partial_guild(ctx).await?;
            let lookup = |id: &serenity::RoleId| guild.roles.get(id).map(|role| role.permissions);
            (
                guild.owner_id,
                effective_permissions(
                    lookup(&everyone_id).unwrap_or_else(serenity::Permissions::empty),
                    member.roles.iter().filter_map(lookup),
                ),
            )
        }
    };

    Ok(grants_admin(owner_id == author_id, permissions))
}

/// Gateway intents required by the bot. Message content is needed for prefix commands and key replies.
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT
}
