use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ReplyParameters};
use teloxide::update_listeners;
use tracing::{info, warn};

use crate::config::TelegramConfig;
use crate::platform::{IncomingMessage, ReplySink};
use crate::relay::Relay;

/// Stay under Telegram's 4096 char message limit
const MAX_MESSAGE_LEN: usize = 4000;

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// Plain text that is not a bot command
fn is_translatable(text: &str) -> bool {
    !text.trim_start().starts_with('/')
}

/// Replies in the originating chat, threaded onto the original message.
struct TelegramReply {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

#[async_trait]
impl ReplySink for TelegramReply {
    async fn send_reply(&self, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            self.bot
                .send_message(self.chat_id, chunk)
                .reply_parameters(ReplyParameters::new(self.message_id).allow_sending_without_reply())
                .await
                .context("Failed to send Telegram message")?;
        }
        Ok(())
    }
}

/// Run the Telegram bot until `shutdown` resolves.
///
/// On shutdown the dispatcher stops taking new updates and lets the
/// handlers already running finish. A shutdown that arrives while the
/// dispatcher is still starting up abandons the startup. Failing to reach
/// the Bot API at startup is returned as an error.
pub async fn run(
    relay: Arc<Relay>,
    config: &TelegramConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let mut bot = Bot::new(&config.bot_token);
    if let Some(api_url) = &config.api_url {
        let url = reqwest::Url::parse(api_url)
            .with_context(|| format!("Invalid Telegram API URL: {}", api_url))?;
        bot = bot.set_api_url(url);
    }

    info!("Starting Telegram platform...");

    let allowed_user_ids = config.allowed_user_ids.clone();

    let handler = Update::filter_message()
        .filter_map(move |msg: Message| {
            if allowed_user_ids.is_empty() {
                return Some(msg);
            }
            let user = msg.from.as_ref()?;
            if allowed_user_ids.contains(&user.id.0) {
                Some(msg)
            } else {
                None
            }
        })
        .filter(|msg: Message| msg.text().is_some_and(is_translatable))
        .endpoint(handle_message);

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![relay])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build();

    let token = dispatcher.shutdown_token();
    let dispatching = async {
        let listener = update_listeners::polling_default(bot).await;
        info!("Polling Telegram for updates...");
        dispatcher
            .try_dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await
            .context("Failed to start Telegram dispatcher")
    };
    tokio::pin!(dispatching);

    tokio::select! {
        biased;
        _ = shutdown => {}
        result = &mut dispatching => return result,
    }

    info!("Stopping Telegram dispatcher...");
    let result = match token.shutdown() {
        // Keep driving the dispatcher so in-flight handlers finish.
        Ok(_stopped) => dispatching.await,
        Err(_) => {
            info!("Shutdown requested before the dispatcher started");
            Ok(())
        }
    };
    result
}

async fn handle_message(bot: Bot, msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let (user_id, sender_name) = match msg.from.as_ref() {
        Some(user) => (
            user.id.0.to_string(),
            Some(user.first_name.clone()).filter(|n| !n.trim().is_empty()),
        ),
        None => ("unknown".to_string(), None),
    };

    let incoming = IncomingMessage {
        user_id,
        chat_id: msg.chat.id.0.to_string(),
        sender_name,
        text,
    };

    let sink = TelegramReply {
        bot,
        chat_id: msg.chat.id,
        message_id: msg.id,
    };

    let outcome = relay.handle(&incoming, &sink).await;
    info!("Message {} in chat {} finished: {:?}", msg.id.0, incoming.chat_id, outcome);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::classifier::Classifier;
    use crate::config::RepliesConfig;
    use crate::keywords::KeywordTables;
    use crate::reply::ReplyTexts;
    use crate::testing::{StubDetector, StubTranslator};

    fn relay() -> Arc<Relay> {
        let classifier = Classifier::new(
            Arc::new(StubDetector::returning("pt")),
            KeywordTables::builtin().unwrap(),
            Duration::from_secs(1),
        );
        Arc::new(Relay::new(
            classifier,
            Arc::new(StubTranslator::replying("Hi")),
            ReplyTexts::from_config(&RepliesConfig::default()),
            Duration::from_secs(1),
        ))
    }

    fn config(api_url: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: "123:abc".to_string(),
            allowed_user_ids: Vec::new(),
            api_url: Some(api_url.to_string()),
        }
    }

    #[tokio::test]
    async fn test_shutdown_before_startup_stops_run() {
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run(relay(), &config("http://127.0.0.1:9/"), async {}),
        )
        .await
        .expect("run did not return after shutdown");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        // Nothing listens on the discard port, so get_me fails at startup.
        let result = tokio::time::timeout(
            Duration::from_secs(30),
            run(relay(), &config("http://127.0.0.1:9/"), std::future::pending()),
        )
        .await
        .expect("run did not return after a failed startup");
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to start Telegram dispatcher"));
    }

    #[tokio::test]
    async fn test_invalid_api_url_is_an_error() {
        let result = run(relay(), &config("not a url"), async {}).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_short_message_is_single_chunk() {
        assert_eq!(split_message("Ana said:\nHi", 4000), vec!["Ana said:\nHi"]);
    }

    #[test]
    fn test_split_prefers_line_breaks() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 8);
        assert_eq!(chunks, vec!["aaaa\n", "bbbb\n", "cccc"]);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "ção".repeat(10);
        let chunks = split_message(&text, 7);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.len() <= 7));
    }

    #[test]
    fn test_commands_are_not_translated() {
        assert!(!is_translatable("/start"));
        assert!(!is_translatable("  /help me"));
        assert!(is_translatable("Olá /start"));
    }
}
