//! The chat widget: everything one panel instance owns.

use crate::core::backend::{ChatBackend, TransportError};
use crate::core::config::data::Settings;
use crate::core::conversation::Conversation;
use crate::core::notification::Notifications;
use crate::core::panel::PanelController;
use crate::core::turn::{PendingTurn, SubmitError, TurnExecutor, TurnOutcome, TurnState};
use crate::utils::logging::TranscriptLog;
use crate::utils::scroll::AutoScroll;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct ChatWidget {
    pub panel: PanelController,
    pub auto_scroll: AutoScroll,
    pub title: String,
    conversation: Conversation,
    turn: TurnState,
    notifications: Notifications,
    transcript: TranscriptLog,
}

impl ChatWidget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings, transcript: TranscriptLog) -> Self {
        Self {
            title: settings.title.clone(),
            conversation: Conversation::with_limit(settings.history_limit),
            notifications: Notifications::new(Duration::from_secs(settings.notification_seconds)),
            transcript,
            ..Self::default()
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn transcript_mut(&mut self) -> &mut TranscriptLog {
        &mut self.transcript
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    /// Let the auto-scroll observer see the latest conversation. Returns true
    /// when it fired.
    pub fn observe_conversation(&mut self) -> bool {
        self.auto_scroll.observe(&self.conversation)
    }

    pub fn is_busy(&self) -> bool {
        self.turn.is_busy()
    }

    pub fn input(&self) -> &str {
        &self.turn.pending_input
    }

    /// Edit the input field. Ignored while busy, like a disabled control.
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        if self.turn.is_busy() {
            return false;
        }
        edit(&mut self.turn.pending_input);
        true
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.turn.pending_input = text.into();
    }

    pub fn turns(&mut self) -> TurnExecutor<'_> {
        TurnExecutor::new(
            &mut self.conversation,
            &mut self.turn,
            &mut self.notifications,
            &self.transcript,
        )
    }

    /// Begin a turn with the contents of the input field.
    pub fn begin_pending_turn(&mut self) -> Result<PendingTurn, SubmitError> {
        self.turns().begin_pending()
    }

    pub fn finish_turn(
        &mut self,
        turn: PendingTurn,
        outcome: Result<String, TransportError>,
    ) -> TurnOutcome {
        self.turns().finish(turn, outcome)
    }

    /// Run one complete turn for `raw_input`. Settles with either two new
    /// entries or, for rejected input, no change at all.
    pub async fn submit(&mut self, backend: &dyn ChatBackend, raw_input: impl Into<String>) {
        self.turns().run(backend, raw_input.into()).await;
    }

    /// Run one complete turn with the contents of the input field.
    pub async fn submit_pending(&mut self, backend: &dyn ChatBackend) {
        let raw_input = self.turn.pending_input.clone();
        self.submit(backend, raw_input).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{MessageEntry, Sender, FALLBACK_REPLY};
    use crate::core::notification::{NotificationLevel, EMPTY_INPUT_WARNING, TURN_FAILED_ERROR};
    use crate::utils::test_utils::{Scripted, ScriptedBackend};
    use reqwest::StatusCode;

    fn texts(widget: &ChatWidget) -> Vec<(Sender, String)> {
        widget
            .conversation()
            .iter()
            .map(|e| (e.sender, e.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn successful_turn_appends_user_then_bot() {
        let backend = ScriptedBackend::new([Scripted::reply("Hello!")]);
        let mut widget = ChatWidget::new("Chatbot");

        widget.submit(&backend, "hi").await;

        assert_eq!(
            texts(&widget),
            vec![
                (Sender::User, "You: hi".to_string()),
                (Sender::Bot, "Bot: Hello!".to_string()),
            ]
        );
        assert!(!widget.is_busy());
        assert_eq!(backend.calls(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn transport_failure_appends_fallback() {
        let backend = ScriptedBackend::new([Scripted::Interrupted]);
        let mut widget = ChatWidget::new("Chatbot");

        widget.submit(&backend, "hi").await;

        assert_eq!(
            texts(&widget),
            vec![
                (Sender::User, "You: hi".to_string()),
                (Sender::Bot, FALLBACK_REPLY.to_string()),
            ]
        );
        assert!(!widget.is_busy());
        let notice = widget.notifications().current().expect("error notice");
        assert_eq!(notice.level, NotificationLevel::Error);
        assert_eq!(notice.text, TURN_FAILED_ERROR);
    }

    #[tokio::test]
    async fn status_failure_matches_transport_failure() {
        let backend = ScriptedBackend::new([Scripted::Status(StatusCode::BAD_GATEWAY)]);
        let mut widget = ChatWidget::new("Chatbot");

        widget.submit(&backend, "test").await;

        assert_eq!(
            widget.conversation().last(),
            Some(&MessageEntry::fallback())
        );
        assert_eq!(texts(&widget)[0].1, "You: test");
    }

    #[tokio::test]
    async fn malformed_success_body_falls_back() {
        let backend = ScriptedBackend::new([Scripted::Malformed]);
        let mut widget = ChatWidget::new("Chatbot");

        widget.submit(&backend, "hi").await;

        assert_eq!(widget.conversation().len(), 2);
        assert_eq!(
            widget.conversation().last().map(|e| e.text.as_str()),
            Some(FALLBACK_REPLY)
        );
    }

    #[tokio::test]
    async fn blank_inputs_never_reach_backend() {
        let backend = ScriptedBackend::new([]);
        let mut widget = ChatWidget::new("Chatbot");

        for blank in ["", "   ", "\n\t"] {
            widget.submit(&backend, blank).await;
        }

        assert!(widget.conversation().is_empty());
        assert!(!widget.is_busy());
        assert!(backend.calls().is_empty());
        assert_eq!(
            widget.notifications().current().map(|n| n.text.as_str()),
            Some(EMPTY_INPUT_WARNING)
        );
    }

    #[tokio::test]
    async fn repeated_failures_each_add_two_entries() {
        let backend = ScriptedBackend::new([
            Scripted::Interrupted,
            Scripted::Status(StatusCode::INTERNAL_SERVER_ERROR),
            Scripted::Malformed,
        ]);
        let mut widget = ChatWidget::new("Chatbot");

        for (round, input) in ["a", "b", "c"].iter().enumerate() {
            widget.submit(&backend, *input).await;
            assert_eq!(widget.conversation().len(), (round + 1) * 2);
            assert!(!widget.is_busy());
        }

        let bots = widget
            .conversation()
            .iter()
            .filter(|e| e.is_bot() && e.text == FALLBACK_REPLY)
            .count();
        assert_eq!(bots, 3);
    }

    #[tokio::test]
    async fn submit_pending_clears_input_immediately() {
        let backend = ScriptedBackend::new([Scripted::reply("ok")]);
        let mut widget = ChatWidget::new("Chatbot");
        widget.set_input("hello there");

        let turn = widget.begin_pending_turn().expect("turn");
        assert!(widget.input().is_empty());
        assert!(widget.is_busy());
        assert!(!widget.edit_input(|input| input.push('x')));

        let outcome = backend.send(&turn.message).await;
        widget.finish_turn(turn, outcome);
        assert!(!widget.is_busy());
        assert!(widget.edit_input(|input| input.push('x')));
        assert_eq!(widget.input(), "x");
    }

    #[tokio::test]
    async fn submit_pending_uses_input_field() {
        let backend = ScriptedBackend::new([Scripted::reply("pong")]);
        let mut widget = ChatWidget::new("Chatbot");
        widget.set_input("ping");

        widget.submit_pending(&backend).await;

        assert_eq!(backend.calls(), vec!["ping".to_string()]);
        assert_eq!(widget.input(), "");
        assert_eq!(widget.conversation().len(), 2);
    }

    #[test]
    fn from_settings_applies_history_limit_and_title() {
        let settings = Settings {
            title: "EHS Chatbot".to_string(),
            history_limit: Some(4),
            ..Settings::default()
        };
        let widget = ChatWidget::from_settings(&settings, TranscriptLog::disabled());
        assert_eq!(widget.title, "EHS Chatbot");
        assert_eq!(widget.conversation().capacity(), Some(4));
        assert!(!widget.panel.is_open());
    }
}
