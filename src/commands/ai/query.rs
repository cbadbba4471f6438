use super::*;
use tracing::debug;

/// Query the Google Gemini API with a question or statement
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn ai(
    ctx: Context<'_>,
    #[description = "Your question or statement"]
    #[rest]
    query: String,
) -> CommandResult {
    debug!("AI query received from user {}", ctx.author().name);

    // Shows a typing indicator (or a deferred slash response) while Gemini answers.
    ctx.defer().await?;

    let response = ctx.data().cog.query(&query).await;

    chunk_response(ctx, response).await
}
