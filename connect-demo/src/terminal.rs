//! Terminal host loop.

use connect_router::AuthEvent;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::app::Shell;

/// Take over the terminal, run the UI until the user quits, then restore it.
pub async fn run(shell: Shell, auth_events: broadcast::Receiver<AuthEvent>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app_loop(&shell, &mut terminal, auth_events).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_app_loop(
    shell: &Shell,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut auth_events: broadcast::Receiver<AuthEvent>,
) -> anyhow::Result<()> {
    let mut document_changed = shell.document().subscribe();
    let mut shell_changed = shell.shell_state().subscribe();

    terminal.draw(|frame| shell.render(frame))?;

    loop {
        tokio::select! {
            _ = document_changed.changed() => {
                terminal.draw(|frame| shell.render(frame))?;
            }
            _ = shell_changed.changed() => {
                terminal.draw(|frame| shell.render(frame))?;
            }
            auth = auth_events.recv() => {
                if let Ok(event) = auth {
                    tracing::info!(?event, "session changed, reloading header");
                }
                shell.reload_header();
            }
            event_ready = async { event::poll(Duration::from_millis(100)) } => {
                if let Ok(true) = event_ready {
                    match event::read()? {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            if shell.handle_key(key) {
                                return Ok(());
                            }
                        }
                        CrosstermEvent::Resize(_, _) => {
                            terminal.draw(|frame| shell.render(frame))?;
                        }
                        _ => {}
                    }
                } else {
                    // Keep the status line's router state current while pages load.
                    terminal.draw(|frame| shell.render(frame))?;
                }
            }
        }
    }
}
