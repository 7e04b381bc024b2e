//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: The request form service and the teloxide endpoint
//! - `router`: Decides what an incoming message means in the current step
//! - `dispatcher`: Delivers completed requests to the staff channel
//! - `transport`: Capability traits over the Telegram client
//! - `ui_builder`: Creates keyboards and step prompts

pub mod dispatcher;
pub mod message_handler;
pub mod router;
pub mod transport;
pub mod ui_builder;

// Re-export main handler types for use in main.rs
pub use message_handler::{message_handler, FormService};
pub use transport::{InboundEvent, MessageContent, MessageSender, TelegramSender};
pub use ui_builder::ReplyKeyboard;
