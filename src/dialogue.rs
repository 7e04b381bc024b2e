//! Purchase request dialogue: the ordered form steps and the rule each step
//! applies to the user's answer.

use chrono::{DateTime, Utc};

/// Button text that bypasses an optional step
pub const SKIP_KEYWORD: &str = "Пропустить";

pub const OPTIONS_DEFAULT: &str = "Не указано";
pub const BUDGET_DEFAULT: &str = "Не указан";
pub const PRODUCT_PLACEHOLDER: &str = "(без описания)";
pub const CITY_PLACEHOLDER: &str = "(не указано)";
pub const CONTACT_PLACEHOLDER: &str = "(не указан)";

/// Position of a conversation in the request form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormStep {
    #[default]
    NotStarted,
    Product,
    Options,
    Budget,
    City,
    Contact,
}

impl FormStep {
    /// The five questions, in the order they are asked
    pub const QUESTIONS: [FormStep; 5] = [
        FormStep::Product,
        FormStep::Options,
        FormStep::Budget,
        FormStep::City,
        FormStep::Contact,
    ];

    /// Step that follows this one; `None` once the form is complete
    pub fn next(self) -> Option<FormStep> {
        match self {
            FormStep::NotStarted => Some(FormStep::Product),
            FormStep::Product => Some(FormStep::Options),
            FormStep::Options => Some(FormStep::Budget),
            FormStep::Budget => Some(FormStep::City),
            FormStep::City => Some(FormStep::Contact),
            FormStep::Contact => None,
        }
    }

    pub fn is_skippable(self) -> bool {
        matches!(self, FormStep::Options | FormStep::Budget)
    }

    /// Whether this step takes the given kind of input.
    ///
    /// Only the product step takes a photo; every question takes text.
    pub fn accepts(self, input: &FormInput<'_>) -> bool {
        match self {
            FormStep::NotStarted => false,
            FormStep::Product => true,
            FormStep::Options | FormStep::Budget | FormStep::City | FormStep::Contact => {
                matches!(input, FormInput::Text(_))
            }
        }
    }

    /// Short name used in log records
    pub fn label(self) -> &'static str {
        match self {
            FormStep::NotStarted => "not_started",
            FormStep::Product => "product",
            FormStep::Options => "options",
            FormStep::Budget => "budget",
            FormStep::City => "city",
            FormStep::Contact => "contact",
        }
    }
}

/// An answer as the form sees it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormInput<'a> {
    Text(&'a str),
    Photo {
        file_id: &'a str,
        caption: Option<&'a str>,
    },
}

/// Answers collected so far
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub product_text: Option<String>,
    pub product_image_ref: Option<String>,
    pub options: Option<String>,
    pub budget: Option<String>,
    pub city_delivery: Option<String>,
    pub contact: Option<String>,
}

/// Every answer of a finished form, defaults already substituted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedForm {
    pub product_text: String,
    pub product_image_ref: Option<String>,
    pub options: String,
    pub budget: String,
    pub city_delivery: String,
    pub contact: String,
}

/// In-progress form of one conversation
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub step: FormStep,
    pub fields: FormFields,
    pub started_at: DateTime<Utc>,
}

/// Result of an accepted answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(FormStep),
    Completed(CompletedForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step `{}` does not accept this input", .step.label())]
pub struct InputRejected {
    pub step: FormStep,
}

impl Session {
    /// A fresh form waiting for the product answer
    pub fn start() -> Self {
        Self {
            step: FormStep::Product,
            fields: FormFields::default(),
            started_at: Utc::now(),
        }
    }

    /// Store `input` as the answer to the current step and move forward.
    ///
    /// A rejected input leaves the session untouched.
    pub fn apply(&mut self, input: &FormInput<'_>) -> Result<StepOutcome, InputRejected> {
        let rejected = InputRejected { step: self.step };

        match (self.step, *input) {
            (FormStep::NotStarted, _) => return Err(rejected),
            (FormStep::Product, FormInput::Photo { file_id, caption }) => {
                self.fields.product_image_ref = Some(file_id.to_string());
                self.fields.product_text =
                    Some(verbatim_or(caption.unwrap_or_default(), PRODUCT_PLACEHOLDER));
            }
            (FormStep::Product, FormInput::Text(text)) => {
                self.fields.product_image_ref = None;
                self.fields.product_text = Some(verbatim_or(text, PRODUCT_PLACEHOLDER));
            }
            (FormStep::Options, FormInput::Text(text)) => {
                self.fields.options = Some(skip_or(text, OPTIONS_DEFAULT));
            }
            (FormStep::Budget, FormInput::Text(text)) => {
                self.fields.budget = Some(skip_or(text, BUDGET_DEFAULT));
            }
            (FormStep::City, FormInput::Text(text)) => {
                self.fields.city_delivery = Some(trimmed_or(text, CITY_PLACEHOLDER));
            }
            (FormStep::Contact, FormInput::Text(text)) => {
                self.fields.contact = Some(trimmed_or(text, CONTACT_PLACEHOLDER));
            }
            (_, FormInput::Photo { .. }) => return Err(rejected),
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(StepOutcome::Advanced(next))
            }
            None => Ok(StepOutcome::Completed(self.complete())),
        }
    }

    /// The collected answers with defaults filled in for anything missing
    pub fn complete(&self) -> CompletedForm {
        let fields = &self.fields;
        let or_default = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        CompletedForm {
            product_text: or_default(&fields.product_text, PRODUCT_PLACEHOLDER),
            product_image_ref: fields.product_image_ref.clone(),
            options: or_default(&fields.options, OPTIONS_DEFAULT),
            budget: or_default(&fields.budget, BUDGET_DEFAULT),
            city_delivery: or_default(&fields.city_delivery, CITY_PLACEHOLDER),
            contact: or_default(&fields.contact, CONTACT_PLACEHOLDER),
        }
    }
}

/// Case-insensitive match against the skip button, ignoring outer whitespace
pub fn is_skip_keyword(text: &str) -> bool {
    text.trim().to_lowercase() == SKIP_KEYWORD.to_lowercase()
}

fn skip_or(text: &str, default: &str) -> String {
    if is_skip_keyword(text) {
        default.to_string()
    } else {
        text.trim().to_string()
    }
}

fn trimmed_or(text: &str, placeholder: &str) -> String {
    match text.trim() {
        "" => placeholder.to_string(),
        trimmed => trimmed.to_string(),
    }
}

// Product descriptions keep the user's own layout.
fn verbatim_or(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_keyword_matching() {
        assert!(is_skip_keyword("Пропустить"));
        assert!(is_skip_keyword("  пропустить \n"));
        assert!(is_skip_keyword("ПРОПУСТИТЬ"));
        assert!(!is_skip_keyword("пропустить, пожалуйста"));
        assert!(!is_skip_keyword(""));
    }

    #[test]
    fn test_rejected_input_leaves_session_untouched() {
        let mut session = Session::start();
        session.apply(&FormInput::Text("red dress")).unwrap();
        let before = session.clone();

        let photo = FormInput::Photo {
            file_id: "AgACAgIAAx",
            caption: None,
        };
        let err = session.apply(&photo).unwrap_err();

        assert_eq!(err.step, FormStep::Options);
        assert_eq!(session, before);
    }

    #[test]
    fn test_not_started_accepts_nothing() {
        let mut session = Session {
            step: FormStep::NotStarted,
            ..Session::start()
        };
        assert!(session.apply(&FormInput::Text("hello")).is_err());
        assert!(!FormStep::NotStarted.accepts(&FormInput::Text("hello")));
    }
}
