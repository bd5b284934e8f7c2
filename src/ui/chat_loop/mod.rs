//! Main chat event loop
//!
//! Terminal events, finished backend calls and a frame tick all feed one
//! `select!` loop. The backend call for a turn runs on its own task so the
//! panel keeps drawing (and showing the busy state) while it is in flight.

mod keys;
mod lifecycle;

use self::keys::{handle_key, handle_mouse, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

use crate::core::backend::{ChatBackend, HttpChatBackend, TransportError};
use crate::core::config::data::Settings;
use crate::core::turn::{PendingTurn, TurnOutcome};
use crate::core::widget::ChatWidget;
use crate::ui::renderer::{ui, RenderMetrics};
use crate::ui::theme::Theme;
use crate::utils::logging::TranscriptLog;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// The result of one backend call, delivered back to the loop.
#[derive(Debug)]
pub struct TurnCompletion {
    pub turn: PendingTurn,
    pub outcome: Result<String, TransportError>,
}

enum LoopControl {
    Continue,
    Quit,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run the backend call for `turn` and report back on `completion_tx`.
///
/// The call runs inside a nested task so that a panicking backend still
/// produces a completion; the busy flag is always cleared.
pub fn spawn_turn(
    backend: Arc<dyn ChatBackend>,
    turn: PendingTurn,
    completion_tx: mpsc::UnboundedSender<TurnCompletion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let message = turn.message.clone();
        let call = tokio::spawn(async move { backend.send(&message).await });
        let outcome = match call.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                warn!(turn = turn.id, error = %join_err, "backend call aborted");
                Err(TransportError::Interrupted(join_err.to_string()))
            }
        };
        if completion_tx.send(TurnCompletion { turn, outcome }).is_err() {
            debug!("chat loop gone before the turn completed");
        }
    })
}

pub async fn run_chat(settings: Settings, transcript: TranscriptLog) -> Result<(), Box<dyn Error>> {
    info!(endpoint = %settings.endpoint, "starting chat session");
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpChatBackend::new(settings.endpoint.clone()));
    let mut widget = ChatWidget::from_settings(&settings, transcript);
    let theme = Theme::default();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut widget, backend, &theme).await;
    let restored = restore_terminal(&mut terminal);

    info!(entries = widget.conversation().len(), "chat session ended");
    result.and(restored)
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    widget: &mut ChatWidget,
    backend: Arc<dyn ChatBackend>,
    theme: &Theme,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<TurnCompletion>();
    let event_reader = spawn_event_reader(event_tx);

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut metrics = RenderMetrics::default();
    let mut needs_redraw = true;

    let result = loop {
        if needs_redraw {
            if let Err(err) = terminal.draw(|f| metrics = ui(f, widget, theme)) {
                break Err(err.into());
            }
            needs_redraw = false;
        }

        tokio::select! {
            Some(ui_event) = event_rx.recv() => {
                let control = handle_ui_event(
                    widget,
                    ui_event,
                    &metrics,
                    &backend,
                    &completion_tx,
                );
                if matches!(control, LoopControl::Quit) {
                    break Ok(());
                }
                needs_redraw = true;
            }
            Some(completion) = completion_rx.recv() => {
                let outcome = widget.finish_turn(completion.turn, completion.outcome);
                if outcome != TurnOutcome::Stale {
                    needs_redraw = true;
                }
            }
            _ = ticker.tick() => {
                if widget.notifications_mut().expire(Instant::now()) {
                    needs_redraw = true;
                }
                if widget.auto_scroll.tick() {
                    needs_redraw = true;
                }
            }
            else => break Ok(()),
        }

        if widget.observe_conversation() {
            needs_redraw = true;
        }
    };

    event_reader.abort();
    result
}

fn handle_ui_event(
    widget: &mut ChatWidget,
    ui_event: UiEvent,
    metrics: &RenderMetrics,
    backend: &Arc<dyn ChatBackend>,
    completion_tx: &mpsc::UnboundedSender<TurnCompletion>,
) -> LoopControl {
    match ui_event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            match handle_key(widget, key, metrics) {
                KeyAction::Continue => {}
                KeyAction::Send(turn) => {
                    spawn_turn(Arc::clone(backend), turn, completion_tx.clone());
                }
                KeyAction::Quit => return LoopControl::Quit,
            }
        }
        UiEvent::Crossterm(Event::Mouse(mouse)) => handle_mouse(widget, mouse, metrics),
        UiEvent::Crossterm(_) => {}
    }
    LoopControl::Continue
}
