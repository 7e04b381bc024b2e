//! UI Builder module for creating keyboards and step prompts

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::dialogue::FormStep;
use crate::localization::t;

/// Reply keyboards the bot attaches to its messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKeyboard {
    /// Single "start a request" button
    StartForm,
    /// Single skip button for the optional steps
    Skip,
    /// "Start another request" button after a successful submission
    NewRequest,
    /// Hide whatever keyboard is showing
    Remove,
}

impl ReplyKeyboard {
    /// Label of the keyboard's only button
    pub fn button_label(self) -> Option<String> {
        match self {
            ReplyKeyboard::StartForm => Some(t("button-start-form")),
            ReplyKeyboard::Skip => Some(t("button-skip")),
            ReplyKeyboard::NewRequest => Some(t("button-new-request")),
            ReplyKeyboard::Remove => None,
        }
    }
}

/// Convert a keyboard into Telegram markup
pub fn reply_markup(keyboard: ReplyKeyboard) -> ReplyMarkup {
    match keyboard.button_label() {
        Some(label) => ReplyMarkup::Keyboard(
            KeyboardMarkup::new(vec![vec![KeyboardButton::new(label)]]).resize_keyboard(),
        ),
        None => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

/// Question text and keyboard that open `step`
pub fn prompt_for(step: FormStep) -> Option<(String, Option<ReplyKeyboard>)> {
    let prompt = match step {
        FormStep::NotStarted => return None,
        FormStep::Product => (t("prompt-product"), Some(ReplyKeyboard::Remove)),
        FormStep::Options => (t("prompt-options"), Some(ReplyKeyboard::Skip)),
        FormStep::Budget => (t("prompt-budget"), Some(ReplyKeyboard::Skip)),
        FormStep::City => (t("prompt-city"), Some(ReplyKeyboard::Remove)),
        FormStep::Contact => (t("prompt-contact"), None),
    };
    Some(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::SKIP_KEYWORD;

    #[test]
    fn test_skip_button_sends_skip_keyword() {
        assert_eq!(
            ReplyKeyboard::Skip.button_label().as_deref(),
            Some(SKIP_KEYWORD)
        );
    }

    #[test]
    fn test_skippable_steps_show_skip_button() {
        for step in FormStep::QUESTIONS {
            let (_, keyboard) = prompt_for(step).unwrap();
            assert_eq!(keyboard == Some(ReplyKeyboard::Skip), step.is_skippable());
        }
        assert!(prompt_for(FormStep::NotStarted).is_none());
    }

    #[test]
    fn test_remove_keyboard_markup() {
        assert!(matches!(
            reply_markup(ReplyKeyboard::Remove),
            ReplyMarkup::KeyboardRemove(_)
        ));
        assert!(matches!(
            reply_markup(ReplyKeyboard::StartForm),
            ReplyMarkup::Keyboard(_)
        ));
    }
}
