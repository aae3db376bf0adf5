use anyhow::{Context, Result};
use telegram::{Chat, TgBot, User};
use tracing::{info, instrument};

#[instrument(name = "whoami", skip(bot))]
pub async fn whoami(bot: &TgBot) -> Result<User> {
    let me = bot.get_me().await.context("getMe failed")?;
    info!(
        id = me.id,
        username = me.username.as_deref().unwrap_or("-"),
        "bot identity"
    );
    Ok(me)
}

#[instrument(name = "describe_chat", skip(bot))]
pub async fn describe_chat(bot: &TgBot, chat_id: i64) -> Result<Chat> {
    let chat = bot
        .get_chat(chat_id)
        .await
        .with_context(|| format!("getChat failed for {chat_id}"))?;
    info!(
        id = chat.id,
        kind = %chat.kind,
        title = chat.title.as_deref().unwrap_or("-"),
        "chat"
    );
    Ok(chat)
}

/// Chats seen in the pending updates, first appearance order, no repeats.
#[instrument(name = "recent_chats", skip(bot))]
pub async fn recent_chats(bot: &TgBot) -> Result<Vec<Chat>> {
    let updates = bot.get_updates().await.context("getUpdates failed")?;

    let mut chats: Vec<Chat> = Vec::new();
    for message in updates
        .into_iter()
        .flat_map(|update| [update.message, update.channel_post])
        .flatten()
    {
        if chats.iter().all(|chat| chat.id != message.chat.id) {
            chats.push(message.chat);
        }
    }

    for chat in &chats {
        info!(
            id = chat.id,
            kind = %chat.kind,
            title = chat.title.as_deref().or(chat.username.as_deref()).unwrap_or("-"),
            "chat from updates"
        );
    }

    Ok(chats)
}
