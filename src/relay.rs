use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, info};

use crate::classifier::{Classification, Classifier};
use crate::language::LanguageCode;
use crate::platform::{IncomingMessage, ReplySink};
use crate::reply::ReplyTexts;
use crate::translate::{translate_or_fail, Translation, Translator};

/// Terminal state reached for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty or whitespace-only text, nothing sent
    Ignored,
    DetectionFailed,
    Unsupported(String),
    TranslationFailed,
    Translated,
}

/// Turns one incoming message into at most one reply.
///
/// Holds no per-message state; one `Relay` serves all messages concurrently.
pub struct Relay {
    classifier: Classifier,
    translator: Arc<dyn Translator>,
    texts: ReplyTexts,
    translation_timeout: Duration,
}

impl Relay {
    pub fn new(
        classifier: Classifier,
        translator: Arc<dyn Translator>,
        texts: ReplyTexts,
        translation_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            translator,
            texts,
            translation_timeout,
        }
    }

    /// Process `incoming` and send the reply through `sink`.
    ///
    /// Never fails: a panic in the pipeline becomes the generic
    /// translation-failed reply, and send errors are only logged.
    pub async fn handle(&self, incoming: &IncomingMessage, sink: &dyn ReplySink) -> Outcome {
        if incoming.text.trim().is_empty() {
            info!("Empty message from user {}, ignoring", incoming.user_id);
            return Outcome::Ignored;
        }

        info!(
            "Processing message from user {}: {}",
            incoming.user_id,
            preview(&incoming.text, 50)
        );

        let (outcome, reply) = match AssertUnwindSafe(self.decide(incoming)).catch_unwind().await {
            Ok(decided) => decided,
            Err(panic) => {
                error!(
                    "Unexpected error while handling message from user {}: {}",
                    incoming.user_id,
                    panic_message(panic.as_ref())
                );
                (Outcome::TranslationFailed, self.texts.translation_failed.clone())
            }
        };

        if let Err(e) = sink.send_reply(&reply).await {
            error!("Failed to send reply to chat {}: {:#}", incoming.chat_id, e);
        }

        outcome
    }

    async fn decide(&self, incoming: &IncomingMessage) -> (Outcome, String) {
        let source = match self.classifier.classify(&incoming.text).await {
            Classification::Language(lang) => lang,
            Classification::Unsupported(code) => {
                info!("Unsupported language detected: {}", code);
                return (Outcome::Unsupported(code), self.texts.unsupported.clone());
            }
            Classification::DetectionFailed => {
                return (Outcome::DetectionFailed, self.texts.detection_failed.clone());
            }
        };

        let target = source.target();
        let translated = match translate_or_fail(
            self.translator.as_ref(),
            &incoming.text,
            source,
            target,
            self.translation_timeout,
        )
        .await
        {
            Translation::Translated(text) => text,
            Translation::Failed => {
                return (Outcome::TranslationFailed, self.texts.translation_failed.clone());
            }
        };

        let reply = self.texts.format_translation(
            &translated,
            &LanguageCode::Supported(target),
            incoming.sender_name.as_deref(),
        );
        info!("Translation completed for user {}", incoming.user_id);
        (Outcome::Translated, reply)
    }
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
