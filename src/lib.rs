//! # Buyer Request Telegram Bot
//!
//! A Telegram bot that walks buyers through a five-step purchase request form
//! and forwards each completed request to a private staff channel.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod health;
pub mod localization;
pub mod session_store;
pub mod submission;
