use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use jobtrack::{
    FilterCategory, JobRecord, JobStatus, SnapshotStore, SortField, View, ViewController,
    ViewState, VisaSponsorship,
};

struct Cursor {
    selected: usize,
    scroll_offset: u16,
}

impl Cursor {
    fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

enum Action {
    Quit,
    Next,
    Prev,
    ScrollDown,
    ScrollUp,
    Toggle(FilterCategory, &'static str),
    Sort(SortField),
    Reset,
}

fn action_for(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('1') => Action::Toggle(FilterCategory::Status, "new"),
        KeyCode::Char('2') => Action::Toggle(FilterCategory::Status, "applied"),
        KeyCode::Char('3') => Action::Toggle(FilterCategory::Status, "interview"),
        KeyCode::Char('4') => Action::Toggle(FilterCategory::Status, "offer"),
        KeyCode::Char('5') => Action::Toggle(FilterCategory::Status, "rejected"),
        KeyCode::Char('y') => Action::Toggle(FilterCategory::Visa, "true"),
        KeyCode::Char('n') => Action::Toggle(FilterCategory::Visa, "false"),
        KeyCode::Char('u') => Action::Toggle(FilterCategory::Visa, "null"),
        KeyCode::Char('l') => Action::Toggle(FilterCategory::Match, "0"),
        KeyCode::Char('m') => Action::Toggle(FilterCategory::Match, "40"),
        KeyCode::Char('h') => Action::Toggle(FilterCategory::Match, "70"),
        KeyCode::Char('t') => Action::Sort(SortField::Title),
        KeyCode::Char('c') => Action::Sort(SortField::Company),
        KeyCode::Char('v') => Action::Sort(SortField::Visa),
        KeyCode::Char('p') => Action::Sort(SortField::Match),
        KeyCode::Char('s') => Action::Sort(SortField::Status),
        KeyCode::Char('a') => Action::Sort(SortField::AppliedDate),
        KeyCode::Char('r') => Action::Sort(SortField::ResponseDate),
        KeyCode::Char('d') => Action::Sort(SortField::Days),
        KeyCode::Char('0') => Action::Reset,
        KeyCode::Down | KeyCode::Char('j') => Action::Next,
        KeyCode::Up | KeyCode::Char('k') => Action::Prev,
        KeyCode::Char('J') | KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Char('K') | KeyCode::PageUp => Action::ScrollUp,
        _ => return None,
    };
    Some(action)
}

/// Expects a controller that has already been initialized.
pub fn run_browse<S: SnapshotStore>(controller: &mut ViewController<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, controller);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: SnapshotStore>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: &mut ViewController<S>,
) -> Result<()> {
    let mut cursor = Cursor::new();
    let mut list_state = ListState::default();

    loop {
        let visible = {
            let view = controller.view();
            cursor.clamp(view.jobs.len());
            list_state.select(if view.jobs.is_empty() { None } else { Some(cursor.selected) });
            let state = controller.state();
            terminal.draw(|frame| draw(frame, &view, state, &cursor, &mut list_state))?;
            view.jobs.len()
        };

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = action_for(key.code) else {
            continue;
        };

        match action {
            Action::Quit => break,
            Action::Next => cursor.next(visible),
            Action::Prev => cursor.prev(),
            Action::ScrollDown => cursor.scroll_down(),
            Action::ScrollUp => cursor.scroll_up(),
            Action::Toggle(category, token) => {
                controller.toggle_filter(category, token);
                cursor = Cursor::new();
            }
            Action::Sort(field) => {
                controller.set_sort(field);
                cursor = Cursor::new();
            }
            Action::Reset => {
                controller.reset();
                cursor = Cursor::new();
            }
        }
    }
    Ok(())
}

fn draw(
    frame: &mut Frame,
    view: &View<'_>,
    state: &ViewState,
    cursor: &Cursor,
    list_state: &mut ListState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header = Paragraph::new(describe_state(state))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(header, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(rows[1]);

    // Left panel: visible jobs
    let items: Vec<ListItem> = view
        .jobs
        .iter()
        .map(|job| {
            let title = if job.title.chars().count() > 30 {
                format!("{}...", job.title.chars().take(27).collect::<String>())
            } else {
                job.title.clone()
            };
            let pct = job
                .resume_match_percentage
                .map(|p| format!("{:>3}%", p))
                .unwrap_or_else(|| "   -".to_string());
            ListItem::new(format!(
                "{} {} #{:<4} {} | {}",
                status_icon(job.status),
                pct,
                job.id,
                title,
                job.company
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Jobs ({}) ",
            view.summary.label()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = match view.jobs.get(cursor.selected) {
        Some(job) => build_detail(job),
        None => Text::raw(view.empty_message().unwrap_or("No job selected")),
    };
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((cursor.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    let help = Paragraph::new(concat!(
        " j/k:move J/K:scroll  1-5:status y/n/u:visa l/m/h:match",
        "  t c v p s a r d:sort  0:reset q:quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);
}

fn status_icon(status: JobStatus) -> &'static str {
    match status {
        JobStatus::New => " ",
        JobStatus::Applied => "+",
        JobStatus::Interview => "*",
        JobStatus::Offer => "$",
        JobStatus::Rejected => "x",
        JobStatus::Unrecognized => "?",
    }
}

pub fn describe_state(state: &ViewState) -> String {
    let mut parts: Vec<String> = FilterCategory::ALL
        .iter()
        .filter_map(|category| {
            let tokens = state.filters.tokens(*category);
            if tokens.is_empty() {
                None
            } else {
                let joined: Vec<&str> = tokens.iter().map(String::as_str).collect();
                Some(format!("{}={}", category.as_str(), joined.join(",")))
            }
        })
        .collect();
    if parts.is_empty() {
        parts.push("no filters".to_string());
    }
    match state.sort.field {
        Some(field) => parts.push(format!(
            "sort {} {}",
            field.as_str(),
            state.sort.direction.as_str()
        )),
        None => parts.push("unsorted".to_string()),
    }
    format!(" {}", parts.join("  "))
}

fn build_detail(job: &JobRecord) -> Text<'_> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !job.company.is_empty() {
        lines.push(Line::from(format!("at {}", job.company)));
    }

    let status_style = match job.status {
        JobStatus::New => Style::default().fg(Color::Green),
        JobStatus::Applied => Style::default().fg(Color::Cyan),
        JobStatus::Interview => Style::default().fg(Color::Yellow),
        JobStatus::Offer => Style::default().fg(Color::Magenta),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::Unrecognized => Style::default(),
    };
    lines.push(Line::from(Span::styled(
        format!("Status: {}", job.status.label()),
        status_style,
    )));

    let visa_style = match job.has_visa_sponsorship {
        VisaSponsorship::Yes => Style::default().fg(Color::Green),
        VisaSponsorship::No => Style::default().fg(Color::Red),
        VisaSponsorship::Unknown => Style::default().fg(Color::DarkGray),
    };
    lines.push(Line::from(Span::styled(
        format!("Visa sponsorship: {}", job.has_visa_sponsorship.label()),
        visa_style,
    )));

    match job.resume_match_percentage {
        Some(pct) => lines.push(Line::from(format!("Resume match: {}%", pct))),
        None => lines.push(Line::from("Resume match: not analyzed")),
    }

    if let Some(url) = &job.job_url {
        lines.push(Line::from(format!("URL: {}", url)));
    }
    if let Some(date) = job.applied_date {
        lines.push(Line::from(format!("Applied: {}", date.format("%Y-%m-%d"))));
    }
    if let Some(date) = job.response_date {
        lines.push(Line::from(format!("Response: {}", date.format("%Y-%m-%d"))));
    }
    if let Some(days) = job.days_to_response {
        lines.push(Line::from(format!("Days to response: {}", days)));
    }

    for (heading, body) in [
        ("SPONSORSHIP ANALYSIS", &job.sponsorship_analysis),
        ("MATCH ANALYSIS", &job.match_analysis),
    ] {
        let Some(body) = body else { continue };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(body, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}
