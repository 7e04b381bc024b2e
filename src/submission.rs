//! Submission record sent to the staff channel once a form is complete.

use teloxide::utils::html;

use crate::dialogue::CompletedForm;

/// Telegram identity of the person filling in the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitter {
    pub id: u64,
    pub username: Option<String>,
}

impl Submitter {
    /// `@handle` when the user has one, the numeric id otherwise
    pub fn display_identity(&self) -> String {
        match self.username.as_deref().filter(|name| !name.is_empty()) {
            Some(username) => format!("@{username}"),
            None => format!("id: {}", self.id),
        }
    }
}

/// A completed request ready for delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub submitter: String,
    pub product: String,
    pub options: String,
    pub budget: String,
    pub city_delivery: String,
    pub contact: String,
    pub image_ref: Option<String>,
}

impl SubmissionRecord {
    pub fn new(form: &CompletedForm, submitter: &Submitter) -> Self {
        Self {
            submitter: submitter.display_identity(),
            product: form.product_text.clone(),
            options: form.options.clone(),
            budget: form.budget.clone(),
            city_delivery: form.city_delivery.clone(),
            contact: form.contact.clone(),
            image_ref: form.product_image_ref.clone(),
        }
    }

    /// Labelled sections in the order staff read them
    pub fn sections(&self) -> [(&'static str, &str); 5] {
        [
            ("1. Товар:", &self.product),
            ("2. Размер / цвет / пожелания:", &self.options),
            ("3. Бюджет:", &self.budget),
            ("4. Город / доставка:", &self.city_delivery),
            ("5. Контакт:", &self.contact),
        ]
    }

    /// Render the record for Telegram's HTML parse mode.
    ///
    /// User text is escaped, so the staff see it exactly as it was typed.
    pub fn render(&self) -> String {
        let mut text = format!(
            "🛍 <b>Новая заявка</b>\n\n👤 <b>Клиент:</b> {}\n",
            html::escape(&self.submitter)
        );

        for (label, value) in self.sections() {
            text.push_str(&format!("\n<b>{label}</b>\n{}\n", html::escape(value)));
        }

        text
    }
}
