pub mod backend;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod notification;
pub mod panel;
pub mod turn;
pub mod widget;
