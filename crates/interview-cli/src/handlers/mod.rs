pub mod chat;
pub mod command;
pub mod preview;
pub mod session;
