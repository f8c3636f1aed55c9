use std::collections::HashMap;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use encore_core::{ScrobbleRequest, ScrobbleService, ServiceResult, TrackCandidate, TrackRef};
use encore_tasks::{
    spawn_album_lookup, spawn_track_search, AttemptOutcome, ScrobbleController, Slot, SubmitError,
    TaskEvent,
};

use crate::help::HelpContent;
use crate::theme::Theme;

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 18;
const HELP_WIDTH: u16 = 80;
const HELP_HEIGHT: u16 = 70;
const TICK_RATE: Duration = Duration::from_millis(50);
const LOG_CAPACITY: usize = 200;

pub struct UiContext {
    pub controller: ScrobbleController,
    pub service: Arc<dyn ScrobbleService>,
    pub theme: Theme,
    pub account: Option<String>,
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, UiError> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Run the interactive terminal until the user quits. The caller must have
/// entered a tokio runtime; batches and lookups are spawned onto it.
pub fn run_ui(context: UiContext) -> Result<(), UiError> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(context);

    loop {
        app.tick();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Manual,
    Search,
    Album,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Manual, Tab::Search, Tab::Album];

    fn display_name(&self) -> &'static str {
        match self {
            Tab::Manual => "Manual",
            Tab::Search => "Search",
            Tab::Album => "Album",
        }
    }

    fn slot(&self) -> Slot {
        match self {
            Tab::Manual => Slot::Manual,
            Tab::Search => Slot::Search,
            Tab::Album => Slot::Album,
        }
    }
}

struct Field {
    label: &'static str,
    value: String,
}

struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    fn new(labels: &[&'static str]) -> Self {
        Self {
            fields: labels
                .iter()
                .map(|label| Field {
                    label,
                    value: String::new(),
                })
                .collect(),
            focus: 0,
        }
    }

    fn focus_next(&mut self) -> bool {
        if self.focus + 1 < self.fields.len() {
            self.focus += 1;
            true
        } else {
            false
        }
    }

    fn focus_prev(&mut self) -> bool {
        if self.focus > 0 {
            self.focus -= 1;
            true
        } else {
            false
        }
    }

    fn insert(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.trim())
            .unwrap_or("")
    }
}

/// Empty means one play.
fn parse_plays(raw: &str) -> Result<u32, String> {
    if raw.is_empty() {
        return Ok(1);
    }
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("plays must be a positive number, got \"{raw}\"")),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LogKind {
    Info,
    Ok,
    Err,
}

struct LogEntry {
    text: String,
    kind: LogKind,
}

/// Per-slot activity shown under the form.
#[derive(Default)]
struct SlotView {
    log: Vec<LogEntry>,
    running: Option<(u32, u32)>,
}

impl SlotView {
    fn push(&mut self, kind: LogKind, text: String) {
        if self.log.len() >= LOG_CAPACITY {
            self.log.remove(0);
        }
        self.log.push(LogEntry { text, kind });
    }
}

struct PendingSearch {
    rx: oneshot::Receiver<ServiceResult<Vec<TrackCandidate>>>,
}

struct PendingAlbum {
    rx: oneshot::Receiver<ServiceResult<Vec<String>>>,
    artist: String,
    album: String,
    plays: u32,
}

struct SearchState {
    form: Form,
    candidates: Vec<TrackCandidate>,
    selected: usize,
    in_results: bool,
    pending: Option<PendingSearch>,
}

impl SearchState {
    fn new() -> Self {
        Self {
            form: Form::new(&["Artist", "Title", "Plays"]),
            candidates: Vec::new(),
            selected: 0,
            in_results: false,
            pending: None,
        }
    }
}

struct AlbumState {
    form: Form,
    pending: Option<PendingAlbum>,
}

impl AlbumState {
    fn new() -> Self {
        Self {
            form: Form::new(&["Artist", "Album", "Plays per track"]),
            pending: None,
        }
    }
}

struct App {
    controller: ScrobbleController,
    service: Arc<dyn ScrobbleService>,
    theme: Theme,
    account: Option<String>,
    active_tab: usize,
    show_help: bool,
    help: HelpContent,
    manual: Form,
    search: SearchState,
    album: AlbumState,
    views: HashMap<Slot, SlotView>,
}

impl App {
    fn new(context: UiContext) -> Self {
        let views = Slot::ALL
            .into_iter()
            .map(|slot| (slot, SlotView::default()))
            .collect();
        Self {
            controller: context.controller,
            service: context.service,
            theme: context.theme,
            account: context.account,
            active_tab: 0,
            show_help: false,
            help: HelpContent::new(),
            manual: Form::new(&["Artist", "Title", "Album (optional)", "Plays"]),
            search: SearchState::new(),
            album: AlbumState::new(),
            views,
        }
    }

    fn tab(&self) -> Tab {
        Tab::ALL[self.active_tab]
    }

    fn view(&mut self, slot: Slot) -> &mut SlotView {
        self.views.entry(slot).or_default()
    }

    /// Drain finished lookups and pending task events. Called once per frame.
    fn tick(&mut self) {
        self.pump_search();
        self.pump_album();
        for slot in Slot::ALL {
            self.drain_slot(slot);
        }
    }

    fn drain_slot(&mut self, slot: Slot) {
        let events = match self.controller.poll(slot) {
            Ok(events) => events,
            Err(err) => {
                tracing::error!(slot = %slot, error = %err, "task stream dropped");
                self.view(slot)
                    .push(LogKind::Err, format!("internal error: {err}"));
                self.view(slot).running = None;
                return;
            }
        };

        for event in events {
            match event {
                TaskEvent::Progress(progress) => {
                    let view = self.view(slot);
                    view.running = Some((progress.attempt, progress.total));
                    match &progress.outcome {
                        AttemptOutcome::Success => view.push(
                            LogKind::Ok,
                            format!(
                                "{}/{} ✔ {}",
                                progress.attempt,
                                progress.total,
                                progress.track.describe()
                            ),
                        ),
                        AttemptOutcome::Failure { reason } => view.push(
                            LogKind::Err,
                            format!(
                                "{}/{} ✘ {}: {reason}",
                                progress.attempt,
                                progress.total,
                                progress.track.describe()
                            ),
                        ),
                    }
                }
                TaskEvent::Completed(summary) => {
                    let view = self.view(slot);
                    view.running = None;
                    let mut line = format!(
                        "finished: {} ok, {} failed",
                        summary.succeeded, summary.failed
                    );
                    if summary.cancelled {
                        line.push_str(&format!(" (cancelled after {} attempts)", summary.attempted));
                    }
                    let kind = if summary.failed == 0 && !summary.cancelled {
                        LogKind::Ok
                    } else {
                        LogKind::Info
                    };
                    view.push(kind, line);
                }
            }
        }
    }

    fn pump_search(&mut self) {
        let Some(mut pending) = self.search.pending.take() else {
            return;
        };
        match pending.rx.try_recv() {
            Ok(Ok(candidates)) => {
                if candidates.is_empty() {
                    self.view(Slot::Search)
                        .push(LogKind::Info, "no matches found".into());
                } else {
                    self.view(Slot::Search)
                        .push(LogKind::Info, format!("{} matches", candidates.len()));
                }
                self.search.candidates = candidates;
                self.search.selected = 0;
                self.search.in_results = !self.search.candidates.is_empty();
            }
            Ok(Err(err)) => {
                self.view(Slot::Search)
                    .push(LogKind::Err, format!("search failed: {err}"));
            }
            Err(TryRecvError::Empty) => self.search.pending = Some(pending),
            Err(TryRecvError::Closed) => {
                self.view(Slot::Search)
                    .push(LogKind::Err, "search task stopped unexpectedly".into());
            }
        }
    }

    fn pump_album(&mut self) {
        let Some(mut pending) = self.album.pending.take() else {
            return;
        };
        match pending.rx.try_recv() {
            Ok(Ok(titles)) => {
                if titles.is_empty() {
                    self.view(Slot::Album)
                        .push(LogKind::Info, "album has no track listing".into());
                    return;
                }
                self.view(Slot::Album).push(
                    LogKind::Info,
                    format!("{} tracks on \"{}\"", titles.len(), pending.album),
                );
                let requests: Vec<ScrobbleRequest> = titles
                    .into_iter()
                    .map(|title| {
                        ScrobbleRequest::new(
                            TrackRef::new(pending.artist.clone(), title)
                                .with_album(pending.album.clone()),
                            pending.plays,
                        )
                    })
                    .collect();
                self.submit(Slot::Album, &requests);
            }
            Ok(Err(err)) => {
                self.view(Slot::Album)
                    .push(LogKind::Err, format!("album lookup failed: {err}"));
            }
            Err(TryRecvError::Empty) => self.album.pending = Some(pending),
            Err(TryRecvError::Closed) => {
                self.view(Slot::Album)
                    .push(LogKind::Err, "album lookup stopped unexpectedly".into());
            }
        }
    }

    fn submit(&mut self, slot: Slot, requests: &[ScrobbleRequest]) {
        match self.controller.submit(slot, requests) {
            Ok(()) => {
                let total: u32 = requests.iter().map(|r| r.count).sum();
                self.view(slot)
                    .push(LogKind::Info, format!("submitting {total} plays"));
            }
            Err(SubmitError::Busy { .. }) => {
                self.view(slot)
                    .push(LogKind::Err, "a batch is already running here".into());
            }
            Err(SubmitError::Invalid(err)) => {
                self.view(slot).push(LogKind::Err, err.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.show_help {
            match key.code {
                KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('q') => self.show_help = false,
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Tab => self.active_tab = (self.active_tab + 1) % Tab::ALL.len(),
            KeyCode::BackTab => {
                self.active_tab = (self.active_tab + Tab::ALL.len() - 1) % Tab::ALL.len();
            }
            KeyCode::Esc => {
                let slot = self.tab().slot();
                if self.controller.is_busy(slot) {
                    self.controller.cancel(slot);
                    self.view(slot)
                        .push(LogKind::Info, "cancelling after the current play".into());
                } else {
                    return true;
                }
            }
            KeyCode::Up => self.focus_up(),
            KeyCode::Down => self.focus_down(),
            KeyCode::Enter => self.activate(),
            KeyCode::Backspace => self.form_mut().backspace(),
            KeyCode::Char(c) => self.form_mut().insert(c),
            _ => {}
        }
        false
    }

    fn form_mut(&mut self) -> &mut Form {
        match self.tab() {
            Tab::Manual => &mut self.manual,
            Tab::Search => &mut self.search.form,
            Tab::Album => &mut self.album.form,
        }
    }

    fn focus_up(&mut self) {
        if self.tab() == Tab::Search && self.search.in_results {
            if self.search.selected > 0 {
                self.search.selected -= 1;
            } else {
                self.search.in_results = false;
            }
            return;
        }
        self.form_mut().focus_prev();
    }

    fn focus_down(&mut self) {
        if self.tab() == Tab::Search {
            if self.search.in_results {
                if self.search.selected + 1 < self.search.candidates.len() {
                    self.search.selected += 1;
                }
                return;
            }
            if !self.search.form.focus_next() && !self.search.candidates.is_empty() {
                self.search.in_results = true;
            }
            return;
        }
        self.form_mut().focus_next();
    }

    fn activate(&mut self) {
        match self.tab() {
            Tab::Manual => self.submit_manual(),
            Tab::Search => {
                if self.search.in_results {
                    self.scrobble_selected();
                } else {
                    self.start_search();
                }
            }
            Tab::Album => self.start_album(),
        }
    }

    fn submit_manual(&mut self) {
        let artist = self.manual.value(0).to_string();
        let title = self.manual.value(1).to_string();
        let album = self.manual.value(2).to_string();
        if artist.is_empty() || title.is_empty() {
            self.view(Slot::Manual)
                .push(LogKind::Err, "artist and title are required".into());
            return;
        }
        let plays = match parse_plays(self.manual.value(3)) {
            Ok(n) => n,
            Err(message) => {
                self.view(Slot::Manual).push(LogKind::Err, message);
                return;
            }
        };

        let mut track = TrackRef::new(artist, title);
        if !album.is_empty() {
            track = track.with_album(album);
        }
        self.submit(Slot::Manual, &[ScrobbleRequest::new(track, plays)]);
    }

    fn start_search(&mut self) {
        let artist = self.search.form.value(0).to_string();
        let title = self.search.form.value(1).to_string();
        if artist.is_empty() || title.is_empty() {
            self.view(Slot::Search)
                .push(LogKind::Err, "artist and title are required".into());
            return;
        }
        self.search.candidates.clear();
        self.search.in_results = false;
        self.view(Slot::Search)
            .push(LogKind::Info, format!("searching for \"{title}\" by {artist}"));
        self.search.pending = Some(PendingSearch {
            rx: spawn_track_search(Arc::clone(&self.service), artist, title),
        });
    }

    fn scrobble_selected(&mut self) {
        let plays = match parse_plays(self.search.form.value(2)) {
            Ok(n) => n,
            Err(message) => {
                self.view(Slot::Search).push(LogKind::Err, message);
                return;
            }
        };
        let Some(candidate) = self.search.candidates.get(self.search.selected) else {
            return;
        };
        let track = TrackRef::new(candidate.artist.clone(), candidate.title.clone());
        self.submit(Slot::Search, &[ScrobbleRequest::new(track, plays)]);
    }

    fn start_album(&mut self) {
        let artist = self.album.form.value(0).to_string();
        let album = self.album.form.value(1).to_string();
        if artist.is_empty() || album.is_empty() {
            self.view(Slot::Album)
                .push(LogKind::Err, "artist and album are required".into());
            return;
        }
        let plays = match parse_plays(self.album.form.value(2)) {
            Ok(n) => n,
            Err(message) => {
                self.view(Slot::Album).push(LogKind::Err, message);
                return;
            }
        };
        if self.album.pending.is_some() {
            self.view(Slot::Album)
                .push(LogKind::Info, "a lookup is already in flight".into());
            return;
        }
        self.view(Slot::Album)
            .push(LogKind::Info, format!("fetching track list for \"{album}\""));
        self.album.pending = Some(PendingAlbum {
            rx: spawn_album_lookup(Arc::clone(&self.service), artist.clone(), album.clone()),
            artist,
            album,
            plays,
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let message = format!(
                "Resize terminal to at least {MIN_WIDTH}x{MIN_HEIGHT} (current: {}x{})",
                area.width, area.height
            );
            let paragraph = Paragraph::new(message)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Encore").borders(Borders::ALL));
            frame.render_widget(paragraph, area);
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_header(frame, layout[0]);
        self.render_body(frame, layout[1]);
        self.render_footer(frame, layout[2]);

        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let account = self
            .account
            .as_deref()
            .map(|name| format!("Account: {name}"))
            .unwrap_or_else(|| "Account: not signed in".to_string());
        let busy: Vec<&str> = Slot::ALL
            .into_iter()
            .filter(|slot| self.controller.is_busy(*slot))
            .map(|slot| slot.as_str())
            .collect();
        let activity = if busy.is_empty() {
            "idle".to_string()
        } else {
            format!("running: {}", busy.join(", "))
        };

        let status = Line::from(vec![
            Span::styled(
                "Encore ",
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("▸ "),
            Span::styled(account, Style::default().fg(self.theme.success)),
            Span::raw("  "),
            Span::styled(activity, Style::default().fg(self.theme.secondary)),
        ]);

        let paragraph = Paragraph::new(status)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(14), Constraint::Min(10)])
            .split(area);

        self.render_nav(frame, chunks[0]);
        self.render_main(frame, chunks[1]);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Tab::ALL
            .iter()
            .map(|tab| {
                let marker = if self.controller.is_busy(tab.slot()) {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{}", tab.display_name()))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tabs"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.active_tab));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let tab = self.tab();
        let form = match tab {
            Tab::Manual => &self.manual,
            Tab::Search => &self.search.form,
            Tab::Album => &self.album.form,
        };
        let form_height = form.fields.len() as u16 + 2;
        let mut constraints = vec![Constraint::Length(form_height)];
        if tab == Tab::Search && !self.search.candidates.is_empty() {
            let rows = self.search.candidates.len().min(8) as u16 + 2;
            constraints.push(Constraint::Length(rows));
        }
        constraints.push(Constraint::Min(3));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_form(frame, chunks[0], form, tab);
        let mut next = 1;
        if tab == Tab::Search && !self.search.candidates.is_empty() {
            self.render_results(frame, chunks[next]);
            next += 1;
        }
        self.render_activity(frame, chunks[next], tab.slot());
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &Form, tab: Tab) {
        let form_focused = !(tab == Tab::Search && self.search.in_results);
        let lines: Vec<Line> = form
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let focused = form_focused && i == form.focus;
                let marker = if focused { "▸ " } else { "  " };
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.secondary)
                };
                let cursor = if focused { "_" } else { "" };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<18}", field.label), label_style),
                    Span::styled(format!("{}{cursor}", field.value), Style::default().fg(self.theme.text)),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(tab.display_name()),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .search
            .candidates
            .iter()
            .map(|candidate| {
                let listeners = candidate
                    .listeners
                    .map(|n| format!("  ({n} listeners)"))
                    .unwrap_or_default();
                ListItem::new(format!(
                    "{} — {}{listeners}",
                    candidate.artist, candidate.title
                ))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Matches"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut state = ratatui::widgets::ListState::default();
        if self.search.in_results {
            state.select(Some(self.search.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect, slot: Slot) {
        let view = self.views.get(&slot);
        let title = match view.and_then(|v| v.running) {
            Some((done, total)) => format!("Activity ({done}/{total})"),
            None => "Activity".to_string(),
        };

        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = view
            .map(|v| {
                let start = v.log.len().saturating_sub(visible);
                v.log[start..]
                    .iter()
                    .map(|entry| {
                        let style = match entry.kind {
                            LogKind::Ok => Style::default().fg(self.theme.success),
                            LogKind::Err => Style::default().fg(self.theme.error),
                            LogKind::Info => Style::default().fg(self.theme.secondary),
                        };
                        Line::from(Span::styled(entry.text.clone(), style))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(Line::from(vec![
            Span::raw("Enter: submit   Tab: switch   ↑/↓: fields   Esc: cancel/quit   F1: help"),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Keys"));
        frame.render_widget(footer, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(HELP_WIDTH, HELP_HEIGHT, area);
        let help = Paragraph::new(self.help.text(&self.theme))
            .block(
                Block::default()
                    .title("Help — Keys (press F1 to close)")
                    .borders(Borders::ALL),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, popup_area);
        frame.render_widget(help, popup_area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1])[1]
}
