//! One user message → bot reply cycle.
//!
//! A turn is split in two halves so an event loop can keep drawing while the
//! backend call is outstanding: [`TurnExecutor::begin`] validates the input,
//! records the user entry and marks the widget busy; [`TurnExecutor::finish`]
//! records the bot entry (reply or fallback) and clears the busy flag.
//! [`TurnExecutor::run`] chains both halves around the backend call.

use crate::core::backend::{ChatBackend, TransportError};
use crate::core::conversation::Conversation;
use crate::core::message::MessageEntry;
use crate::core::notification::{
    Notifications, BUSY_WARNING, EMPTY_INPUT_WARNING, TURN_FAILED_ERROR,
};
use crate::utils::logging::TranscriptLog;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Input waiting to be sent plus the id of the call currently in flight.
#[derive(Debug, Clone, Default)]
pub struct TurnState {
    pub pending_input: String,
    in_flight: Option<u64>,
    next_id: u64,
}

impl TurnState {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }
}

/// Handed out by [`TurnExecutor::begin`]; carries the raw input to the
/// backend call and back into [`TurnExecutor::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub id: u64,
    pub message: String,
}

/// Reasons a submission is turned away before anything changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter a message.")]
    EmptyInput,
    #[error("Please wait for the current reply.")]
    Busy,
}

/// How a finished turn was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied,
    FellBack,
    /// The turn was not the one in flight and was ignored.
    Stale,
}

pub struct TurnExecutor<'a> {
    conversation: &'a mut Conversation,
    state: &'a mut TurnState,
    notifications: &'a mut Notifications,
    transcript: &'a TranscriptLog,
}

impl<'a> TurnExecutor<'a> {
    pub fn new(
        conversation: &'a mut Conversation,
        state: &'a mut TurnState,
        notifications: &'a mut Notifications,
        transcript: &'a TranscriptLog,
    ) -> Self {
        Self {
            conversation,
            state,
            notifications,
            transcript,
        }
    }

    /// Validate `raw_input`, append the user entry, clear the input field and
    /// mark the call as in flight. Rejections leave every piece of state
    /// untouched apart from the warning notification.
    pub fn begin(&mut self, raw_input: String) -> Result<PendingTurn, SubmitError> {
        if raw_input.trim().is_empty() {
            self.notifications.warning(EMPTY_INPUT_WARNING);
            return Err(SubmitError::EmptyInput);
        }
        if self.state.is_busy() {
            debug!("submission rejected while a reply is pending");
            self.notifications.warning(BUSY_WARNING);
            return Err(SubmitError::Busy);
        }

        self.record(MessageEntry::user(&raw_input));
        self.state.pending_input.clear();

        self.state.next_id += 1;
        let id = self.state.next_id;
        self.state.in_flight = Some(id);
        info!(turn = id, "chat turn started");

        Ok(PendingTurn {
            id,
            message: raw_input,
        })
    }

    /// Take whatever is in the input field and begin a turn with it.
    pub fn begin_pending(&mut self) -> Result<PendingTurn, SubmitError> {
        let raw_input = self.state.pending_input.clone();
        self.begin(raw_input)
    }

    /// Record the result of the backend call for `turn` and clear the busy
    /// flag. Failures become the fallback entry plus an error notification.
    pub fn finish(
        &mut self,
        turn: PendingTurn,
        outcome: Result<String, TransportError>,
    ) -> TurnOutcome {
        if self.state.in_flight != Some(turn.id) {
            debug!(turn = turn.id, "ignoring result for a turn that is not in flight");
            return TurnOutcome::Stale;
        }

        let recorded = match outcome {
            Ok(reply) => {
                info!(turn = turn.id, "chat turn completed");
                self.record(MessageEntry::bot(&reply));
                TurnOutcome::Replied
            }
            Err(err) => {
                warn!(turn = turn.id, error = %err, "chat turn failed");
                self.notifications.error(TURN_FAILED_ERROR);
                self.record(MessageEntry::fallback());
                TurnOutcome::FellBack
            }
        };

        self.state.in_flight = None;
        recorded
    }

    /// Run a whole turn against `backend`. Never fails: rejections surface as
    /// notifications and transport errors as the fallback entry.
    pub async fn run(mut self, backend: &dyn ChatBackend, raw_input: String) {
        let Ok(turn) = self.begin(raw_input) else {
            return;
        };
        let outcome = backend.send(&turn.message).await;
        self.finish(turn, outcome);
    }

    fn record(&mut self, entry: MessageEntry) {
        self.transcript.log_entry(&entry);
        self.conversation.append(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Sender, FALLBACK_REPLY};
    use crate::core::notification::NotificationLevel;
    use reqwest::StatusCode;

    struct Fixture {
        conversation: Conversation,
        state: TurnState,
        notifications: Notifications,
        transcript: TranscriptLog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                conversation: Conversation::new(),
                state: TurnState::default(),
                notifications: Notifications::default(),
                transcript: TranscriptLog::disabled(),
            }
        }

        fn executor(&mut self) -> TurnExecutor<'_> {
            TurnExecutor::new(
                &mut self.conversation,
                &mut self.state,
                &mut self.notifications,
                &self.transcript,
            )
        }
    }

    #[test]
    fn begin_records_user_entry_and_marks_busy() {
        let mut fixture = Fixture::new();
        fixture.state.pending_input = "hi".to_string();

        let turn = fixture.executor().begin_pending().expect("turn");

        assert_eq!(turn.message, "hi");
        assert!(fixture.state.is_busy());
        assert!(fixture.state.pending_input.is_empty());
        assert_eq!(
            fixture.conversation.entries().back(),
            Some(&MessageEntry::new(Sender::User, "You: hi"))
        );
    }

    #[test]
    fn begin_keeps_surrounding_whitespace_in_message() {
        let mut fixture = Fixture::new();
        let turn = fixture.executor().begin("  spaced  ".to_string()).expect("turn");
        assert_eq!(turn.message, "  spaced  ");
        assert_eq!(
            fixture.conversation.last().map(|e| e.text.as_str()),
            Some("You:   spaced  ")
        );
    }

    #[test]
    fn whitespace_input_is_rejected_without_side_effects() {
        let mut fixture = Fixture::new();
        fixture.state.pending_input = " \t\n".to_string();

        let result = fixture.executor().begin_pending();

        assert_eq!(result, Err(SubmitError::EmptyInput));
        assert!(fixture.conversation.is_empty());
        assert!(!fixture.state.is_busy());
        assert_eq!(fixture.state.pending_input, " \t\n");
        let notice = fixture.notifications.current().expect("warning");
        assert_eq!(notice.level, NotificationLevel::Warning);
        assert_eq!(notice.text, EMPTY_INPUT_WARNING);
    }

    #[test]
    fn second_begin_while_busy_is_rejected() {
        let mut fixture = Fixture::new();
        let first = fixture.executor().begin("one".to_string()).expect("turn");

        let second = fixture.executor().begin("two".to_string());

        assert_eq!(second, Err(SubmitError::Busy));
        assert_eq!(fixture.conversation.len(), 1);
        assert_eq!(fixture.state.in_flight(), Some(first.id));
        assert_eq!(
            fixture.notifications.current().map(|n| n.text.as_str()),
            Some(BUSY_WARNING)
        );
    }

    #[test]
    fn finish_success_appends_labeled_reply() {
        let mut fixture = Fixture::new();
        let turn = fixture.executor().begin("hi".to_string()).expect("turn");

        let outcome = fixture.executor().finish(turn, Ok("Hello!".to_string()));

        assert_eq!(outcome, TurnOutcome::Replied);
        assert!(!fixture.state.is_busy());
        let entries: Vec<_> = fixture.conversation.iter().cloned().collect();
        assert_eq!(
            entries,
            vec![
                MessageEntry::new(Sender::User, "You: hi"),
                MessageEntry::new(Sender::Bot, "Bot: Hello!"),
            ]
        );
        assert!(fixture.notifications.current().is_none());
    }

    #[test]
    fn finish_failure_appends_fallback_and_notifies() {
        let mut fixture = Fixture::new();
        let turn = fixture.executor().begin("test".to_string()).expect("turn");

        let outcome = fixture.executor().finish(
            turn,
            Err(TransportError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            }),
        );

        assert_eq!(outcome, TurnOutcome::FellBack);
        assert!(!fixture.state.is_busy());
        assert_eq!(
            fixture.conversation.last().map(|e| e.text.as_str()),
            Some(FALLBACK_REPLY)
        );
        let notice = fixture.notifications.current().expect("error");
        assert_eq!(notice.level, NotificationLevel::Error);
        assert_eq!(notice.text, TURN_FAILED_ERROR);
    }

    #[test]
    fn finish_ignores_stale_turns() {
        let mut fixture = Fixture::new();
        let turn = fixture.executor().begin("hi".to_string()).expect("turn");
        let stale = PendingTurn {
            id: turn.id + 7,
            message: "ghost".to_string(),
        };

        let outcome = fixture.executor().finish(stale, Ok("boo".to_string()));

        assert_eq!(outcome, TurnOutcome::Stale);
        assert!(fixture.state.is_busy());
        assert_eq!(fixture.conversation.len(), 1);
    }

    #[test]
    fn turn_ids_increase() {
        let mut fixture = Fixture::new();
        let first = fixture.executor().begin("a".to_string()).expect("turn");
        let first_id = first.id;
        fixture.executor().finish(first, Ok("x".to_string()));
        let second = fixture.executor().begin("b".to_string()).expect("turn");
        assert!(second.id > first_id);
    }
}
