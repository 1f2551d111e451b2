//! Messaging platform adapters.

pub mod line;
pub mod telegram;
pub mod traits;

pub use line::LineChannel;
pub use telegram::{BotCommand, TelegramChannel, TelegramUpdate};
pub use traits::{ChannelAdapter, InboundMessage};
