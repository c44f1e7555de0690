use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linkboard_core::load::extract_url_path;
use linkboard_core::view::{FlatView, GroupedView, ViewState};
use linkboard_fetch::LinkRecord;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::io;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::mpsc;
use url::Url;

const PAGE_SIZE: usize = 10;

/// Messages from the loading task to the viewer
#[derive(Debug, Clone)]
pub enum ViewerMessage {
    /// Request sent, waiting for the response
    Loading { endpoint: String },
    /// Grouped view bound and ready
    Grouped(GroupedView),
    /// Flat view bound and ready
    Flat(FlatView),
    /// Fetch or decode failed
    Failed(String),
}

/// Whichever view the viewer was started for
#[derive(Debug, Clone)]
pub enum LoadedView {
    Grouped(GroupedView),
    Flat(FlatView),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Parents,
    Links,
}

/// TUI state for browsing a loaded link list
pub struct LinkViewer {
    state: ViewState<LoadedView>,
    endpoint: Option<String>,
    focus: Focus,
    selected_parent: usize,
    selected_link: usize,
    rx: mpsc::UnboundedReceiver<ViewerMessage>,
}

impl LinkViewer {
    pub fn new(rx: mpsc::UnboundedReceiver<ViewerMessage>) -> Self {
        Self {
            state: ViewState::Loading,
            endpoint: None,
            focus: Focus::Parents,
            selected_parent: 0,
            selected_link: 0,
            rx,
        }
    }

    pub fn state(&self) -> &ViewState<LoadedView> {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_parent(&self) -> usize {
        self.selected_parent
    }

    pub fn selected_link(&self) -> usize {
        self.selected_link
    }

    /// Process incoming messages from the loader without blocking
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ViewerMessage::Loading { endpoint } => {
                    self.endpoint = Some(endpoint);
                    self.state = ViewState::Loading;
                }
                ViewerMessage::Grouped(view) => {
                    self.reset_selection(Focus::Parents);
                    self.state = ViewState::Ready(LoadedView::Grouped(view));
                }
                ViewerMessage::Flat(view) => {
                    self.reset_selection(Focus::Links);
                    self.state = ViewState::Ready(LoadedView::Flat(view));
                }
                ViewerMessage::Failed(error) => {
                    self.state = ViewState::Failed(error);
                }
            }
        }
    }

    fn reset_selection(&mut self, focus: Focus) {
        self.focus = focus;
        self.selected_parent = 0;
        self.selected_link = 0;
    }

    /// Links shown in the right-hand (or only) panel
    fn visible_links(&self) -> &[LinkRecord] {
        match self.state.view() {
            Some(LoadedView::Grouped(view)) => view
                .parents()
                .get(self.selected_parent)
                .and_then(|parent| view.groups().get(parent))
                .unwrap_or(&[]),
            Some(LoadedView::Flat(view)) => view.links(),
            None => &[],
        }
    }

    fn parent_count(&self) -> usize {
        match self.state.view() {
            Some(LoadedView::Grouped(view)) => view.parents().len(),
            _ => 0,
        }
    }

    /// Apply a key press. Returns `true` when the viewer should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            _ => {}
        }

        // Nothing to navigate until a view has arrived
        if !self.state.is_ready() {
            return false;
        }

        let grouped = matches!(self.state.view(), Some(LoadedView::Grouped(_)));

        match key.code {
            KeyCode::Tab | KeyCode::Left | KeyCode::Right if grouped => {
                self.focus = match (key.code, self.focus) {
                    (KeyCode::Left, _) => Focus::Parents,
                    (KeyCode::Right, _) => Focus::Links,
                    (_, Focus::Parents) => Focus::Links,
                    (_, Focus::Links) => Focus::Parents,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            KeyCode::PageDown => self.move_selection(PAGE_SIZE as isize),
            KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::End => self.move_selection(isize::MAX),
            _ => {}
        }

        false
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Parents => {
                let total = self.parent_count();
                let next = step(self.selected_parent, delta, total);
                if next != self.selected_parent {
                    self.selected_parent = next;
                    self.selected_link = 0;
                }
            }
            Focus::Links => {
                let total = self.visible_links().len();
                self.selected_link = step(self.selected_link, delta, total);
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Main area
                Constraint::Length(4), // Selected link details
                Constraint::Length(1), // Hints bar
            ])
            .split(f.area());

        match &self.state {
            ViewState::Loading => self.render_loading(f, vertical_chunks[0]),
            ViewState::Failed(error) => self.render_failed(f, vertical_chunks[0], error),
            ViewState::Ready(LoadedView::Grouped(view)) => {
                let main_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(vertical_chunks[0]);

                self.render_parents(f, main_chunks[0], view);
                let title = view
                    .parents()
                    .get(self.selected_parent)
                    .map(|parent| format!(" {} ", parent))
                    .unwrap_or_else(|| " Links ".to_string());
                let parent = view.parents().get(self.selected_parent).map(String::as_str);
                self.render_links(f, main_chunks[1], &title, parent, self.focus == Focus::Links);
            }
            ViewState::Ready(LoadedView::Flat(view)) => {
                let title = format!(" Links ({}) ", view.links().len());
                self.render_links(f, vertical_chunks[0], &title, None, true);
            }
        }

        self.render_details(f, vertical_chunks[1]);
        self.render_hints(f, vertical_chunks[2]);
    }

    /// The link under the cursor in the links panel
    pub fn selected_record(&self) -> Option<&LinkRecord> {
        self.visible_links().get(self.selected_link)
    }

    fn render_details(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(link) = self.selected_record() else {
            let empty_msg = Paragraph::new("No link selected")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty_msg, area);
            return;
        };

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let text = vec![
            Line::from(vec![
                Span::styled("Type: ", label),
                Span::styled(link.content_type().unwrap_or("-").to_string(), value),
                Span::styled("  Size: ", label),
                Span::styled(
                    link.size().map(|s| format!("{} B", s)).unwrap_or_else(|| "-".to_string()),
                    value,
                ),
                Span::styled("  Time: ", label),
                Span::styled(
                    link.duration().map(|d| format!("{:.2}s", d)).unwrap_or_else(|| "-".to_string()),
                    value,
                ),
                Span::styled("  Checked: ", label),
                Span::styled(link.date().unwrap_or("-").to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Crawl start: ", label),
                Span::styled(link.start_url().unwrap_or("-").to_string(), value),
            ]),
        ];

        f.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_loading(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Loading ")
            .border_style(Style::default().fg(Color::Yellow));

        let endpoint = self.endpoint.as_deref().unwrap_or("...");
        let text = vec![
            Line::from(vec![
                Span::styled("⠋ ", Style::default().fg(Color::Cyan)),
                Span::raw("Fetching "),
                Span::styled(endpoint.to_string(), Style::default().fg(Color::Cyan)),
            ]),
        ];

        f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
    }

    fn render_failed(&self, f: &mut Frame, area: Rect, error: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Failed ")
            .border_style(Style::default().fg(Color::Red));

        let mut text = vec![Line::from(Span::styled(
            "✗ Could not load links",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))];
        if let Some(endpoint) = &self.endpoint {
            text.push(Line::from(format!("Endpoint: {}", endpoint)));
        }
        text.push(Line::from(""));
        text.push(Line::from(error.to_string()));

        f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
    }

    fn render_parents(&self, f: &mut Frame, area: Rect, view: &GroupedView) {
        let focused = self.focus == Focus::Parents;
        let title = format!(" Parents ({}) ", view.parents().len());
        let block = panel(title, focused);

        let inner = block.inner(area);
        f.render_widget(block, area);

        if view.parents().is_empty() {
            let empty_msg = Paragraph::new("No links with a parent page")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            f.render_widget(empty_msg, inner);
            return;
        }

        let height = inner.height as usize;
        let offset = scroll_offset(self.selected_parent, height, view.parents().len());

        let items: Vec<ListItem> = view
            .summary()
            .into_iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(idx, entry)| {
                let mut style = Style::default().fg(Color::White);
                if idx == self.selected_parent {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                ListItem::new(format!("[{}] {}", entry.links.len(), entry.parent)).style(style)
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_links(&self, f: &mut Frame, area: Rect, title: &str, parent: Option<&str>, focused: bool) {
        let block = panel(title.to_string(), focused);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let links = self.visible_links();
        if links.is_empty() {
            let empty_msg = Paragraph::new("No links")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            f.render_widget(empty_msg, inner);
            return;
        }

        let height = inner.height as usize;
        let offset = scroll_offset(self.selected_link, height, links.len());

        let items: Vec<ListItem> = links
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(idx, link)| {
                let code = link.response_code();
                let (status_icon, color) = match code {
                    Some(200..=299) => ("✓", Color::Green),
                    Some(300..=399) => ("→", Color::Yellow),
                    Some(400..=499) => ("!", Color::Red),
                    Some(_) => ("✗", Color::Magenta),
                    None => ("?", Color::DarkGray),
                };
                let code = code.map(|c| c.to_string()).unwrap_or_else(|| "---".to_string());

                let mut text = format!("{} [{}] {}", status_icon, code, link_label(link, parent));
                if let Some(reason) = link.response_reason() {
                    text.push_str(&format!(" ({})", reason));
                }

                let mut style = Style::default().fg(color);
                if focused && idx == self.selected_link {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                ListItem::new(text).style(style)
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_hints(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Black).bg(Color::Gray);
        let mut spans = vec![
            Span::styled(" q/ESC ", key),
            Span::raw(" Exit  "),
            Span::styled(" ↑/↓ ", key),
            Span::raw(" Select  "),
            Span::styled(" PgUp/PgDn ", key),
            Span::raw(" Page  "),
            Span::styled(" Home/End ", key),
            Span::raw(" Top/Bottom  "),
        ];
        if matches!(self.state.view(), Some(LoadedView::Grouped(_))) {
            spans.push(Span::styled(" Tab ", key));
            spans.push(Span::raw(" Switch panel"));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Black).fg(Color::Gray));
        f.render_widget(paragraph, area);
    }
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

/// Move `current` by `delta` within `0..total`, saturating at both ends
fn step(current: usize, delta: isize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(total - 1)
}

/// First visible row such that `selected` stays inside a window of `height`
fn scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    selected
        .saturating_sub(height - 1)
        .min(total - height)
}

/// Show only the path when the link lives on the same host as its parent
fn link_label(link: &LinkRecord, parent: Option<&str>) -> String {
    let Some(url) = link.url() else {
        return "(no url)".to_string();
    };

    let same_host = parent
        .and_then(|p| Url::parse(p).ok())
        .zip(Url::parse(url).ok())
        .is_some_and(|(p, u)| p.host_str().is_some() && p.host_str() == u.host_str());

    if same_host {
        extract_url_path(url)
    } else {
        url.to_string()
    }
}

/// Run the link viewer TUI (blocking function, should be run in separate thread)
pub fn run_viewer(
    rx: mpsc::UnboundedReceiver<ViewerMessage>,
    should_exit: Arc<AtomicBool>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut viewer = LinkViewer::new(rx);

    let result = (|| -> Result<()> {
        loop {
            viewer.process_messages();
            terminal.draw(|f| viewer.render(f))?;

            if should_exit.load(Ordering::Relaxed) {
                return Ok(());
            }

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && viewer.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Create a channel pair for feeding the viewer
pub fn create_viewer_channel() -> (
    mpsc::UnboundedSender<ViewerMessage>,
    mpsc::UnboundedReceiver<ViewerMessage>,
) {
    mpsc::unbounded_channel()
}
