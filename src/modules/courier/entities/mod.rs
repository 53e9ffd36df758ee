pub mod chat;
pub mod chat_message;
pub mod courier;
pub mod enums;
pub mod message;
