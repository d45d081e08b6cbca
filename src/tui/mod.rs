// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI shell (ratatui + crossterm).
//!
//! The edit surface is a deliberately minimal stand-in for a real editor:
//! it appends and deletes at the end of the buffer and reports every change
//! as a whole-content edit to the session controller. Everything the spec
//! cares about — source arbitration, share links, the restart banner — runs
//! through the same controller API a full editor component would use.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;

use crate::connect::{ConnectionLifecycleManager, ConnectionStatus, RestartNotice, WsTransport};
use crate::fetch::{ContentFetcher, FetchError, HttpFetcher};
use crate::files;
use crate::model::DOCUMENT_URI;
use crate::session::{FetchTicket, SessionController};

const STATUS_COLOR: Color = Color::DarkGray;
const BANNER_COLOR: Color = Color::Yellow;
const PROMPT_COLOR: Color = Color::Cyan;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How the shell is launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Startup share-link fragment, the address-bar read of the browser
    /// client.
    pub fragment: Option<String>,
    /// Websocket endpoint of the compile server; `None` runs offline.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    LoadUrl,
    LoadFile,
    ShareLink,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            Self::LoadUrl => "Load from url",
            Self::LoadFile => "Load file from disk",
            Self::ShareLink => "Open share link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

/// Work the event loop has to perform on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Fetch(FetchTicket),
    Restart,
    Quit,
}

/// A completed url fetch on its way back into the controller.
#[derive(Debug)]
struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<String, FetchError>,
}

pub struct App {
    controller: SessionController,
    connection: Option<ConnectionStatus>,
    restart_banner: bool,
    toast: Option<String>,
    prompt: Option<Prompt>,
    save_dir: PathBuf,
    should_quit: bool,
}

impl App {
    pub fn new(controller: SessionController, save_dir: PathBuf) -> Self {
        Self {
            controller,
            connection: None,
            restart_banner: false,
            toast: None,
            prompt: None,
            save_dir,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn restart_banner_visible(&self) -> bool {
        self.restart_banner
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    pub fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    pub fn set_connection(&mut self, status: Option<ConnectionStatus>) {
        self.connection = status;
    }

    pub fn show_restart_banner(&mut self) {
        self.restart_banner = true;
    }

    fn resolve_fetch(&mut self, ticket: &FetchTicket, result: Result<String, FetchError>) {
        self.controller.resolve_url(ticket, result);
    }

    /// Handles one key press; returns work for the event loop when the
    /// press triggers something asynchronous.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    Some(AppAction::Quit)
                }
                KeyCode::Char('u') => {
                    self.open_prompt(PromptKind::LoadUrl);
                    None
                }
                KeyCode::Char('o') => {
                    self.open_prompt(PromptKind::LoadFile);
                    None
                }
                KeyCode::Char('l') => {
                    self.open_prompt(PromptKind::ShareLink);
                    None
                }
                KeyCode::Char('s') => {
                    self.save();
                    None
                }
                KeyCode::Char('r') => {
                    self.restart_banner = false;
                    Some(AppAction::Restart)
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => {
                // Dismissing the banner never touches the document.
                self.restart_banner = false;
                self.toast = None;
                None
            }
            KeyCode::Char(c) => {
                let mut content = self.controller.content().to_owned();
                content.push(c);
                self.controller.on_editor_edit(content);
                None
            }
            KeyCode::Enter => {
                let mut content = self.controller.content().to_owned();
                content.push('\n');
                self.controller.on_editor_edit(content);
                None
            }
            KeyCode::Backspace => {
                let mut content = self.controller.content().to_owned();
                if content.pop().is_some() {
                    self.controller.on_editor_edit(content);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                None
            }
            KeyCode::Enter => {
                let prompt = self.prompt.take()?;
                self.submit_prompt(prompt)
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.pop();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(c);
                }
                None
            }
            _ => None,
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) -> Option<AppAction> {
        let input = prompt.input.trim().to_owned();
        if input.is_empty() {
            return None;
        }
        match prompt.kind {
            PromptKind::LoadUrl => self.controller.load_from_url(input).map(AppAction::Fetch),
            PromptKind::ShareLink => self.controller.observe_fragment(&input).map(AppAction::Fetch),
            PromptKind::LoadFile => {
                match files::import(Path::new(&input)) {
                    Ok(text) => self.controller.load_from_file(text),
                    // Read failure leaves the document unchanged.
                    Err(err) => self.set_toast(err.to_string()),
                }
                None
            }
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt { kind, input: String::new() });
    }

    fn save(&mut self) {
        match files::export(&self.save_dir, self.controller.save()) {
            Ok(path) => self.set_toast(format!("Saved {}", path.display())),
            Err(err) => self.set_toast(err.to_string()),
        }
    }
}

/// Runs the shell until the user quits, then tears the compile session down.
pub async fn run(options: RunOptions) -> Result<(), Box<dyn Error>> {
    let save_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut app = App::new(SessionController::new(), save_dir);

    let mut manager = options
        .endpoint
        .map(|endpoint| ConnectionLifecycleManager::new(WsTransport::new(endpoint), DOCUMENT_URI));
    let notice = manager.as_ref().map(|m| m.restart_notice()).unwrap_or_default();

    if let Some(manager) = manager.as_mut() {
        if let Err(err) = manager.start().await {
            app.set_toast(format!("Compile session unavailable: {err}"));
        }
        app.set_connection(Some(manager.status()));
    }

    let fetcher = HttpFetcher::new();
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchOutcome>();

    if let Some(fragment) = options.fragment.as_deref() {
        if let Some(ticket) = app.controller.initialize(fragment) {
            spawn_fetch(fetcher.clone(), ticket, fetch_tx.clone());
        }
    }

    let mut terminal = TerminalSession::new()?;
    let loop_result = event_loop(
        &mut terminal,
        &mut app,
        &mut manager,
        &notice,
        &fetcher,
        &fetch_tx,
        &mut fetch_rx,
    )
    .await;

    // Teardown stops the session on every exit path and waits for it.
    let stop_result = match manager.as_mut() {
        Some(manager) => manager.stop().await,
        None => Ok(()),
    };
    drop(terminal);

    loop_result?;
    stop_result?;
    Ok(())
}

async fn event_loop(
    terminal: &mut TerminalSession,
    app: &mut App,
    manager: &mut Option<ConnectionLifecycleManager<WsTransport>>,
    notice: &RestartNotice,
    fetcher: &HttpFetcher,
    fetch_tx: &mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<(), Box<dyn Error>> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, app))?;

        tokio::select! {
            _ = ticker.tick() => {
                if notice.take() {
                    app.show_restart_banner();
                }
            }
            Some(outcome) = fetch_rx.recv() => {
                app.resolve_fetch(&outcome.ticket, outcome.result);
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        match app.handle_key(key) {
                            Some(AppAction::Fetch(ticket)) => {
                                spawn_fetch(fetcher.clone(), ticket, fetch_tx.clone());
                            }
                            Some(AppAction::Restart) => {
                                match manager.as_mut() {
                                    Some(manager) => {
                                        if let Err(err) = manager.restart().await {
                                            app.set_toast(format!("Restart failed: {err}"));
                                        }
                                    }
                                    None => app.set_toast("Offline: no compile session to restart"),
                                }
                            }
                            Some(AppAction::Quit) | None => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(Box::new(err)),
                    None => break,
                }
            }
        }

        if let Some(manager) = manager.as_ref() {
            app.set_connection(Some(manager.status()));
        }
    }

    Ok(())
}

fn spawn_fetch(
    fetcher: HttpFetcher,
    ticket: FetchTicket,
    tx: mpsc::UnboundedSender<FetchOutcome>,
) {
    tokio::spawn(async move {
        let result = fetcher.fetch(ticket.url()).await;
        let _ = tx.send(FetchOutcome { ticket, result });
    });
}

fn draw(frame: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(frame.size());

    frame.render_widget(editor_widget(app), layout[0]);
    frame.render_widget(notice_line(app), layout[1]);
    frame.render_widget(footer_line(app), layout[2]);
}

fn editor_widget(app: &App) -> Paragraph<'_> {
    Paragraph::new(app.controller.content())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(files::SAVE_FILE_NAME))
}

fn notice_line(app: &App) -> Paragraph<'_> {
    if let Some(prompt) = app.prompt.as_ref() {
        return Paragraph::new(format!("{}: {}_", prompt.kind.label(), prompt.input))
            .style(Style::default().fg(PROMPT_COLOR));
    }
    if app.restart_banner {
        return Paragraph::new(
            "Compile server restarted — Ctrl+R to restart your session, Esc to dismiss",
        )
        .style(Style::default().fg(BANNER_COLOR));
    }
    if let Some(toast) = app.toast.as_deref() {
        return Paragraph::new(toast).style(Style::default().fg(STATUS_COLOR));
    }
    Paragraph::new(app.controller.share_fragment()).style(Style::default().fg(STATUS_COLOR))
}

fn footer_line(app: &App) -> Paragraph<'_> {
    let connection = match app.connection {
        Some(status) => status.to_string(),
        None => "offline".to_owned(),
    };
    let spans = vec![
        Span::styled("^U", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" url  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^O", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" file  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^L", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" link  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^S", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" save  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^R", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" restart  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^Q", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" quit  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled(format!("session: {connection}"), Style::default().fg(FOOTER_LABEL_COLOR)),
    ];
    Paragraph::new(Line::from(spans))
}

/// Raw-mode/alternate-screen guard; restores the terminal on drop whatever
/// path tore the shell down.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
