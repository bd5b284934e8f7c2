//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::core::backend::{ChatBackend, HttpChatBackend};
use crate::core::config::data::Settings;
use crate::core::widget::ChatWidget;
use crate::utils::logging::TranscriptLog;

pub async fn run_say(
    prompt: Vec<String>,
    settings: &Settings,
    transcript: TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    let backend = HttpChatBackend::new(settings.endpoint.clone());
    let mut widget = ChatWidget::from_settings(settings, transcript);

    let accepted = say_with(
        &backend,
        &mut widget,
        &prompt.join(" "),
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;

    if !accepted {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one turn and print what it appended to `out`, with any notification
/// on `err`. Returns false when the input was rejected before sending.
pub async fn say_with<O: Write, E: Write>(
    backend: &dyn ChatBackend,
    widget: &mut ChatWidget,
    prompt: &str,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool> {
    let before = widget.conversation().revision();
    widget.submit(backend, prompt).await;

    let appended = (widget.conversation().revision() - before) as usize;
    let skip = widget.conversation().len().saturating_sub(appended);
    for entry in widget.conversation().iter().skip(skip) {
        writeln!(out, "{}", entry.text)?;
    }
    out.flush()?;

    if let Some(notice) = widget.notifications().current() {
        writeln!(err, "{}", notice.text)?;
    }

    Ok(appended > 0)
}
