//! Terminal rendering. Dispatches on the screen decided by the auth state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{App, AuthState, Field, Mode, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Loading => render_loading(frame),
        Screen::Login => render_auth_form(frame, app),
        Screen::Dashboard => render_dashboard(frame, app),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn render_loading(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 40, 3);
    let spinner = Paragraph::new("Checking session...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(spinner, area);
}

// ---------------------------------------------------------------------------
// Login / register form
// ---------------------------------------------------------------------------

fn render_auth_form(frame: &mut Frame, app: &App) {
    let title = match app.mode {
        Mode::Login => " Sign in ",
        Mode::Register => " Create account ",
    };

    let area = centered_rect(frame.area(), 50, 16);
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name (register only)
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(2), // error / status
            Constraint::Length(2), // hints
        ])
        .split(inner);

    if app.mode == Mode::Register {
        render_input(frame, rows[0], "Name", &app.name, app.focus == Field::Name);
    }
    render_input(frame, rows[1], "Email", &app.email, app.focus == Field::Email);
    let masked = "*".repeat(app.password.chars().count());
    render_input(
        frame,
        rows[2],
        "Password",
        &masked,
        app.focus == Field::Password,
    );

    let status = if app.in_flight {
        Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status), rows[3]);

    let toggle_hint = match app.mode {
        Mode::Login => "Ctrl+R register",
        Mode::Register => "Ctrl+R sign in",
    };
    let hints = Paragraph::new(format!(
        "Tab next field | Enter submit | {} | Esc quit",
        toggle_hint
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, rows[4]);
}

fn render_input(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(value.to_string())
        .block(Block::default().title(label).borders(Borders::ALL))
        .style(style);
    frame.render_widget(input, area);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn render_dashboard(frame: &mut Frame, app: &App) {
    let AuthState::Authenticated(user) = &app.auth else {
        // render() only dispatches here for the authenticated state.
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let greeting = Paragraph::new(format!("Welcome, {}", user.name))
        .block(Block::default().title(" Dashboard ").borders(Borders::ALL));
    frame.render_widget(greeting, rows[0]);

    let stats_text = match &app.stats {
        Some(stats) => format!("Registered users: {}", stats.user_count),
        None => "Loading stats...".to_string(),
    };
    let stats = Paragraph::new(vec![
        Line::from(stats_text),
        Line::from(""),
        Line::from(Span::styled(
            user.email.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().title(" Overview ").borders(Borders::ALL));
    frame.render_widget(stats, rows[1]);

    let hints = Paragraph::new("Ctrl+L logout | q quit").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, rows[3]);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
