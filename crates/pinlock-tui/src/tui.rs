//! Terminal lock screen: PIN pad, settings dialogs, and the shortcut toolbar.

use crate::host::{OverlayHost, SessionNotifier};
use crate::store::FileStore;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use pinlock_core::dialog::{RemoveFlow, SetupFlow, SetupOutcome, SetupStage};
use pinlock_core::{
    ActivityEvent, Attempts, DialogKind, LockScreen, LockStatus, PinEntry, PinKey,
    PinlockConfig, SubmitDisposition, SubmitOutcome,
};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

/// The lock screen as instantiated by this frontend.
pub type Screen = LockScreen<FileStore, SessionNotifier, OverlayHost>;

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiExit {
    /// The user quit from the unlocked view.
    Quit,
    /// Attempts were exhausted; the host must end the session.
    SignedOut,
}

/// Fire up the lock screen with its collaborators already wired.
pub fn launch(config: Arc<PinlockConfig>, screen: Screen) -> Result<TuiExit> {
    let mut app = App::new(config, screen);
    app.run()
}

/// What the frontend should render and which keys apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Locked,
    Dialog(DialogKind),
    Session,
}

struct App {
    config: Arc<PinlockConfig>,
    screen: Screen,
    entry: PinEntry,
    setup: Option<SetupFlow>,
    removal: Option<RemoveFlow>,
    feedback: Option<String>,
    exit: Option<TuiExit>,
}

impl App {
    fn new(config: Arc<PinlockConfig>, screen: Screen) -> Self {
        let entry = PinEntry::new(config.lock.pin_length);
        Self {
            config,
            screen,
            entry,
            setup: None,
            removal: None,
            feedback: None,
            exit: None,
        }
    }

    /// Enter the alternate screen, run the event loop, and clean up on exit.
    fn run(&mut self) -> Result<TuiExit> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.show_cursor()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;

        res
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<ratatui::backend::CrosstermBackend<Stdout>>,
    ) -> Result<TuiExit> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if crossterm::event::poll(Duration::from_millis(200))? {
                let ev = event::read()?;
                if let Some(activity) = activity_event(&ev) {
                    self.screen.record_activity(activity);
                }
                if let Event::Key(key) = ev {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(TuiExit::Quit);
                    }
                    self.on_key(key.code)?;
                }
            }

            if self.screen.poll_idle()? {
                // overlays were closed by the machine; drop frontend state too
                self.entry.clear();
                self.setup = None;
                self.removal = None;
                self.feedback = Some("Locked after inactivity".to_string());
            }

            if let Some(exit) = self.exit {
                return Ok(exit);
            }
        }
    }

    fn mode(&self) -> Mode {
        if self.screen.status() == LockStatus::Locked {
            Mode::Locked
        } else if let Some(kind) = self.screen.modals().dialog() {
            Mode::Dialog(kind)
        } else {
            Mode::Session
        }
    }

    fn on_key(&mut self, code: KeyCode) -> Result<()> {
        match self.mode() {
            Mode::Locked => self.on_pin_key(code, PinTarget::Unlock),
            Mode::Dialog(DialogKind::Setup) => {
                if code == KeyCode::Esc && self.entry.is_empty() {
                    self.close_dialog();
                    return Ok(());
                }
                self.on_pin_key(code, PinTarget::Setup)
            }
            Mode::Dialog(DialogKind::Remove) => {
                if code == KeyCode::Esc && self.entry.is_empty() {
                    self.close_dialog();
                    return Ok(());
                }
                self.on_pin_key(code, PinTarget::Remove)
            }
            Mode::Session => self.on_session_key(code),
        }
    }

    /// Route a key through the PIN-entry contract toward `target`.
    fn on_pin_key(&mut self, code: KeyCode, target: PinTarget) -> Result<()> {
        let Some(key) = pin_key(code) else {
            return Ok(());
        };
        if key != PinKey::Submit {
            self.entry.press(key, |_| SubmitDisposition::Retain);
            return Ok(());
        }

        match target {
            PinTarget::Unlock => {
                let mut result = None;
                let screen = &mut self.screen;
                self.entry.submit(|pin| {
                    result = Some(screen.submit(pin));
                    SubmitDisposition::Clear
                });
                if let Some(outcome) = result {
                    self.apply_outcome(outcome?);
                }
            }
            PinTarget::Setup => {
                let Some(flow) = self.setup.as_mut() else {
                    return Ok(());
                };
                let mut staged = None;
                self.entry.submit(|pin| {
                    staged = Some(flow.submit(pin));
                    SubmitDisposition::Clear
                });
                match staged {
                    Some(SetupOutcome::Completed(digits)) => {
                        self.screen.configure_code(&digits)?;
                        self.feedback = Some("PIN configured".to_string());
                        self.close_dialog();
                    }
                    Some(SetupOutcome::Mismatch) => {
                        self.feedback = Some("PINs did not match, start again".to_string());
                    }
                    Some(SetupOutcome::AwaitingConfirmation) | None => {}
                }
            }
            PinTarget::Remove => {
                let mut result = None;
                let screen = &mut self.screen;
                self.entry.submit(|pin| {
                    result = Some(screen.submit_removal(pin));
                    SubmitDisposition::Clear
                });
                if let Some(outcome) = result {
                    let outcome = outcome?;
                    if let Some(flow) = self.removal.as_mut() {
                        flow.note_outcome(&outcome);
                    }
                    if outcome == SubmitOutcome::Removed {
                        self.feedback = Some("PIN removed".to_string());
                        self.close_dialog();
                    }
                    self.apply_outcome(outcome);
                }
            }
        }
        Ok(())
    }

    fn on_session_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.exit = Some(TuiExit::Quit);
            }
            KeyCode::Char('s') => {
                self.screen.request_settings_dialog();
                match self.screen.modals().dialog() {
                    Some(DialogKind::Setup) => self.setup = Some(SetupFlow::new()),
                    Some(DialogKind::Remove) => self.removal = Some(RemoveFlow::new()),
                    None => {}
                }
                self.entry.clear();
            }
            KeyCode::Char('t') => {
                if let Some(toolbar) = self.screen.modals_mut().toolbar_mut() {
                    toolbar.toggle_menu();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as u8 - b'1') as usize;
                let mut target = None;
                if let Some(toolbar) = self.screen.modals_mut().toolbar_mut() {
                    if toolbar.is_menu_open() {
                        target = toolbar.activate(index).map(str::to_string);
                    }
                }
                if let Some(url) = target {
                    info!("opening toolbar shortcut {url}");
                    self.feedback = Some(format!("Opening {url}"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Unlocked => {
                self.feedback = Some("Unlocked".to_string());
            }
            SubmitOutcome::Mismatch { remaining } => {
                self.feedback = Some(match remaining.count() {
                    Some(1) => "Wrong PIN (1 attempt remaining)".to_string(),
                    Some(n) => format!("Wrong PIN ({n} attempts remaining)"),
                    None => "Wrong PIN".to_string(),
                });
            }
            SubmitOutcome::SignedOut => {
                self.exit = Some(TuiExit::SignedOut);
            }
            SubmitOutcome::Removed | SubmitOutcome::Ignored => {}
        }
    }

    fn close_dialog(&mut self) {
        self.screen.modals_mut().close_dialog();
        self.setup = None;
        self.removal = None;
        self.entry.clear();
    }

    fn render(&self, f: &mut Frame<'_>) {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Min(7),
                    Constraint::Length(3),
                ]
                .as_ref(),
            )
            .split(size);

        let hints = match self.mode() {
            Mode::Locked => "  0-9:digits  backspace:delete  esc:clear  enter:submit",
            Mode::Dialog(_) => "  0-9:digits  enter:submit  esc:cancel",
            Mode::Session => "  q:quit  s:pin settings  t:shortcuts",
        };
        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled(
                "pinlock",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(hints),
        ])])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        match self.mode() {
            Mode::Locked => self.render_pin_pad(f, chunks[1], "Enter PIN"),
            Mode::Dialog(DialogKind::Setup) => {
                let prompt = match self.setup.as_ref().map(SetupFlow::stage) {
                    Some(SetupStage::Confirm) => "Repeat the new PIN",
                    _ => "Choose a new PIN",
                };
                self.render_pin_pad(f, chunks[1], prompt);
            }
            Mode::Dialog(DialogKind::Remove) => {
                self.render_pin_pad(f, chunks[1], "Enter PIN to remove it");
            }
            Mode::Session => self.render_session(f, chunks[1]),
        }

        let footer = if let Some(ref msg) = self.feedback {
            Paragraph::new(msg.as_str()).style(Style::default().fg(Color::Yellow))
        } else {
            Paragraph::new("Ready").style(Style::default().fg(Color::Green))
        };
        f.render_widget(
            footer.block(Block::default().borders(Borders::ALL)),
            chunks[2],
        );
    }

    fn render_pin_pad(&self, f: &mut Frame<'_>, area: ratatui::prelude::Rect, prompt: &str) {
        let mut dots = String::new();
        for position in 0..self.config.lock.pin_length {
            dots.push(if position < self.entry.len() { '●' } else { '○' });
            dots.push(' ');
        }

        let mut lines = vec![
            Line::from(prompt.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                dots,
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        // the warning only appears once an attempt has been spent
        if let Attempts::Remaining(n) = self.screen.remaining_attempts() {
            if n < self.screen.max_attempts() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("{n} attempts remaining"),
                    Style::default().fg(Color::Red),
                )));
            }
        }

        let pad = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Locked"));
        f.render_widget(pad, area);
    }

    fn render_session(&self, f: &mut Frame<'_>, area: ratatui::prelude::Rect) {
        let status = if self.screen.is_configured() {
            "A PIN is set. Press 's' to remove it."
        } else {
            "No PIN is set. Press 's' to configure one."
        };

        let items: Vec<ListItem> = match self.screen.modals().toolbar() {
            None => vec![ListItem::new(status)],
            Some(toolbar) if toolbar.is_menu_open() => {
                let mut items = vec![ListItem::new(status), ListItem::new("")];
                items.extend(toolbar.items().iter().enumerate().map(|(index, item)| {
                    let line = vec![
                        Span::styled(
                            format!("{}. ", index + 1),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(&item.label, Style::default().fg(Color::White)),
                        Span::raw("  "),
                        Span::styled(&item.url, Style::default().fg(Color::Magenta)),
                    ];
                    ListItem::new(Line::from(line))
                }));
                items
            }
            Some(_) => vec![
                ListItem::new(status),
                ListItem::new(""),
                ListItem::new("Press 't' to list shortcuts."),
            ],
        };

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Session"));
        f.render_widget(list, area);
    }
}

/// Which operation a completed PIN entry feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PinTarget {
    Unlock,
    Setup,
    Remove,
}

fn pin_key(code: KeyCode) -> Option<PinKey> {
    match code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(PinKey::Digit(c as u8 - b'0')),
        KeyCode::Backspace => Some(PinKey::Backspace),
        KeyCode::Esc => Some(PinKey::Clear),
        KeyCode::Enter => Some(PinKey::Submit),
        _ => None,
    }
}

/// Map a terminal event onto the uniform activity stream.
fn activity_event(ev: &Event) -> Option<ActivityEvent> {
    match ev {
        Event::Key(_) => Some(ActivityEvent::KeyDown),
        Event::Resize(_, _) => Some(ActivityEvent::Resize),
        Event::Mouse(mouse) => Some(match mouse.kind {
            MouseEventKind::Down(_) => ActivityEvent::PointerDown,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => ActivityEvent::Wheel,
            _ => ActivityEvent::PointerMove,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseButton, MouseEvent};

    #[test]
    fn pin_keys_cover_the_contract() {
        assert_eq!(pin_key(KeyCode::Char('7')), Some(PinKey::Digit(7)));
        assert_eq!(pin_key(KeyCode::Backspace), Some(PinKey::Backspace));
        assert_eq!(pin_key(KeyCode::Esc), Some(PinKey::Clear));
        assert_eq!(pin_key(KeyCode::Enter), Some(PinKey::Submit));
        assert_eq!(pin_key(KeyCode::Tab), None);
    }

    #[test]
    fn events_map_to_activity() {
        let key = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(activity_event(&key), Some(ActivityEvent::KeyDown));

        let resize = Event::Resize(80, 24);
        assert_eq!(activity_event(&resize), Some(ActivityEvent::Resize));

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(activity_event(&click), Some(ActivityEvent::PointerDown));

        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(activity_event(&scroll), Some(ActivityEvent::Wheel));
    }
}
