use serde::{Deserialize, Serialize};

/// Prefix applied to every entry the user authors.
pub const USER_LABEL: &str = "You: ";

/// Prefix applied to every entry the bot authors.
pub const BOT_LABEL: &str = "Bot: ";

/// Bot entry appended when a turn fails for any reason.
pub const FALLBACK_REPLY: &str = "Bot: Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => USER_LABEL,
            Sender::Bot => BOT_LABEL,
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }
}

/// One recorded message. Entries are never edited after they are created;
/// the text already carries its sender label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub text: String,
    pub sender: Sender,
}

impl MessageEntry {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// Labeled echo of what the user typed.
    pub fn user(raw_input: &str) -> Self {
        Self::labeled(Sender::User, raw_input)
    }

    /// Labeled reply taken from a successful backend response.
    pub fn bot(reply: &str) -> Self {
        Self::labeled(Sender::Bot, reply)
    }

    pub fn fallback() -> Self {
        Self::new(Sender::Bot, FALLBACK_REPLY)
    }

    fn labeled(sender: Sender, body: &str) -> Self {
        Self::new(sender, format!("{}{}", sender.label(), body))
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }
}
