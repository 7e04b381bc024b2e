//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info};

use crate::dialogue::{CompletedForm, FormStep, Session, StepOutcome};
use crate::localization::t;
use crate::session_store::SessionStore;
use crate::submission::SubmissionRecord;

use super::dispatcher::dispatch_submission;
use super::router::{route, Route};
use super::transport::{InboundEvent, MessageContent, MessageSender};
use super::ui_builder::{prompt_for, ReplyKeyboard};

/// Longest slice of user text copied into a log record
const LOG_TEXT_LIMIT: usize = 120;

/// Drives the request form for every conversation
pub struct FormService {
    store: Arc<dyn SessionStore>,
    sender: Arc<dyn MessageSender>,
    staff_channel: ChatId,
    /// Username commands may be addressed to as `/command@username`
    bot_username: Option<String>,
}

impl FormService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        sender: Arc<dyn MessageSender>,
        staff_channel: ChatId,
    ) -> Self {
        Self {
            store,
            sender,
            staff_channel,
            bot_username: None,
        }
    }

    /// Ignore commands addressed to any other bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one incoming message
    pub async fn handle(&self, event: &InboundEvent) -> Result<()> {
        let session = self.store.get(event.conversation_id).await?;
        let current = session.as_ref().map(|session| session.step);

        match route(&event.content, current, self.bot_username.as_deref()) {
            Route::Start => self.handle_start(event).await,
            Route::Help => self.handle_help(event).await,
            Route::StartForm => self.handle_start_form(event).await,
            Route::Cancel => self.handle_cancel(event, current).await,
            Route::Answer(step) => match session {
                Some(session) => self.handle_answer(event, step, session).await,
                None => self.handle_fallback(event, None).await,
            },
            Route::Fallback { current } => self.handle_fallback(event, current).await,
        }
    }

    async fn handle_start(&self, event: &InboundEvent) -> Result<()> {
        info!(
            user_id = event.sender.id,
            username = ?event.sender.username,
            "CMD /start"
        );
        self.store.delete(event.conversation_id).await?;
        self.reply(event.conversation_id, &t("welcome"), Some(ReplyKeyboard::StartForm))
            .await
    }

    async fn handle_help(&self, event: &InboundEvent) -> Result<()> {
        info!(user_id = event.sender.id, "CMD /help");
        self.reply(event.conversation_id, &t("help"), None).await
    }

    async fn handle_start_form(&self, event: &InboundEvent) -> Result<()> {
        info!(user_id = event.sender.id, "Start form");
        self.store.set(event.conversation_id, Session::start()).await?;
        self.send_prompt(event.conversation_id, FormStep::Product)
            .await
    }

    async fn handle_cancel(&self, event: &InboundEvent, current: Option<FormStep>) -> Result<()> {
        info!(
            user_id = event.sender.id,
            step = current.unwrap_or_default().label(),
            "CMD /cancel"
        );
        self.store.delete(event.conversation_id).await?;
        self.reply(
            event.conversation_id,
            &t("cancelled"),
            Some(ReplyKeyboard::StartForm),
        )
        .await
    }

    async fn handle_answer(
        &self,
        event: &InboundEvent,
        step: FormStep,
        mut session: Session,
    ) -> Result<()> {
        let Some(input) = event.content.as_form_input() else {
            return self.handle_fallback(event, Some(step)).await;
        };

        let preview = match &event.content {
            MessageContent::Text(text) => truncate_for_log(text),
            MessageContent::Photo { caption, .. } => {
                truncate_for_log(caption.as_deref().unwrap_or_default())
            }
            MessageContent::Other => String::new(),
        };
        info!(
            user_id = event.sender.id,
            step = step.label(),
            content_type = event.content.kind(),
            text = %preview,
            "Form step answered"
        );

        match session.apply(&input) {
            Ok(StepOutcome::Advanced(next)) => {
                self.store.set(event.conversation_id, session).await?;
                self.send_prompt(event.conversation_id, next).await
            }
            Ok(StepOutcome::Completed(form)) => self.submit(event, session.started_at, form).await,
            Err(rejected) => {
                debug!(user_id = event.sender.id, error = %rejected, "Answer rejected");
                self.handle_fallback(event, Some(step)).await
            }
        }
    }

    /// Forward the finished form to staff and tell the user how it went
    async fn submit(
        &self,
        event: &InboundEvent,
        started_at: DateTime<Utc>,
        form: CompletedForm,
    ) -> Result<()> {
        let chat = event.conversation_id;
        // A failed delivery is not retried, so the form is discarded either way.
        self.store.delete(chat).await?;

        let record = SubmissionRecord::new(&form, &event.sender);
        match dispatch_submission(self.sender.as_ref(), self.staff_channel, &record).await {
            Ok(()) => {
                info!(
                    user_id = event.sender.id,
                    has_photo = record.image_ref.is_some(),
                    duration_secs = (Utc::now() - started_at).num_seconds(),
                    "Request sent to staff channel"
                );
                self.reply(chat, &t("submission-thanks"), Some(ReplyKeyboard::NewRequest))
                    .await
            }
            Err(e) => {
                error!(
                    user_id = event.sender.id,
                    channel_id = %self.staff_channel,
                    error = %e,
                    "Failed to send request to staff channel"
                );
                self.reply(chat, &t("submission-failed"), None).await
            }
        }
    }

    async fn handle_fallback(&self, event: &InboundEvent, current: Option<FormStep>) -> Result<()> {
        info!(
            user_id = event.sender.id,
            step = current.unwrap_or_default().label(),
            content_type = event.content.kind(),
            text = %truncate_for_log(event.content.text().unwrap_or_default()),
            "Fallback"
        );

        match current {
            None => {
                self.reply(
                    event.conversation_id,
                    &t("fallback-idle"),
                    Some(ReplyKeyboard::StartForm),
                )
                .await
            }
            Some(_) => {
                self.reply(event.conversation_id, &t("fallback-in-progress"), None)
                    .await
            }
        }
    }

    async fn send_prompt(&self, chat: ChatId, step: FormStep) -> Result<()> {
        if let Some((prompt, keyboard)) = prompt_for(step) {
            self.reply(chat, &prompt, keyboard).await?;
        }
        Ok(())
    }

    async fn reply(&self, chat: ChatId, body: &str, keyboard: Option<ReplyKeyboard>) -> Result<()> {
        self.sender.send_text(chat, body, keyboard).await?;
        Ok(())
    }
}

/// teloxide endpoint for message updates
pub async fn message_handler(msg: Message, service: Arc<FormService>) -> Result<()> {
    let event = InboundEvent::from_message(&msg);
    debug!(
        user_id = event.sender.id,
        chat_id = %event.conversation_id,
        content_type = event.content.kind(),
        "Received message"
    );
    service.handle(&event).await
}

fn truncate_for_log(text: &str) -> String {
    text.chars().take(LOG_TEXT_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_counts_characters() {
        let long = "я".repeat(200);
        assert_eq!(truncate_for_log(&long).chars().count(), LOG_TEXT_LIMIT);
        assert_eq!(truncate_for_log("short"), "short");
    }
}
