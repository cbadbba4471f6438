use crate::{CommandResult, Context};

/// Show help for the bot's commands
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "Ask Gemini anything with `ai <question>`.",
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}
