//! Terminal presentation of the chat widget.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
