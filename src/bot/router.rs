//! Event router: decides what an incoming message means for the conversation.
//!
//! Rules are evaluated first-match, in the order of the checks in [`route`].

use crate::dialogue::FormStep;

use super::transport::MessageContent;

/// Word carried by both "start a request" buttons
pub const START_FORM_TRIGGER: &str = "Оформить";

/// Slash commands the bot understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    Form,
}

impl Command {
    /// Parse the leading `/command`, ignoring any payload.
    ///
    /// A `@mention` suffix must name this bot when its username is known.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Command> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = match name.split_once('@') {
            Some((name, mention)) => {
                if bot_username.is_some_and(|own| !mention.eq_ignore_ascii_case(own)) {
                    return None;
                }
                name
            }
            None => name,
        };

        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "cancel" => Some(Command::Cancel),
            "form" => Some(Command::Form),
            _ => None,
        }
    }
}

/// What to do with an incoming message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Greet and offer the start button; drops any form in progress
    Start,
    Help,
    /// Begin a fresh form at the product step
    StartForm,
    /// Drop the form in progress
    Cancel,
    /// The message answers the given step
    Answer(FormStep),
    /// Nothing matched; re-prompt without changing state
    Fallback { current: Option<FormStep> },
}

pub fn route(
    content: &MessageContent,
    current: Option<FormStep>,
    bot_username: Option<&str>,
) -> Route {
    let command = content
        .command_text()
        .and_then(|text| Command::parse(text, bot_username));

    if command == Some(Command::Start) {
        return Route::Start;
    }
    if command == Some(Command::Help) {
        return Route::Help;
    }
    // The start buttons send plain text, so captions never start a form.
    if command == Some(Command::Form)
        || content
            .text()
            .is_some_and(|text| text.contains(START_FORM_TRIGGER))
    {
        return Route::StartForm;
    }
    if command == Some(Command::Cancel) {
        return Route::Cancel;
    }

    if let Some(step) = current {
        let accepted = content
            .as_form_input()
            .is_some_and(|input| step.accepts(&input));
        if accepted {
            return Route::Answer(step);
        }
    }

    Route::Fallback { current }
}
