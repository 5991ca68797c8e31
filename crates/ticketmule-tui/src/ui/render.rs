use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use ticketmule_core::FieldError;

use crate::app::{App, AppState, LoginFocus};

use super::styles;

/// Width of the login dialog, borders included
const LOGIN_WIDTH: u16 = 48;

/// Visible width of a text field
const FIELD_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_time_types(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let user = app
        .session
        .user()
        .map(|u| format!("Signed in as {}", u.display_name()))
        .unwrap_or_default();

    let title = Line::from(vec![
        Span::styled("  TicketMule", styles::title_style()),
        Span::raw("   "),
        Span::styled(user, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_time_types(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .time_types
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}  ", t.id), styles::muted_style()),
                Span::styled(t.name.clone(), styles::list_item_style()),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" Time Types ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.time_types.is_empty() {
        state.select(Some(app.time_type_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.state == AppState::LoggingIn {
        "[tab] next | [enter] select | [esc] quit"
    } else {
        "[r]efresh | [l]ogout | [q]uit"
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.api.base_url()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    // Keep the tail visible once the text outgrows the field
    let skip = value.chars().count().saturating_sub(FIELD_WIDTH);
    let visible: String = value.chars().skip(skip).collect();
    let cursor = if focused { "▌" } else { " " };

    Line::from(vec![
        Span::styled(format!("  {:>10} [", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", visible, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn field_error_line(error: Option<FieldError>) -> Option<Line<'static>> {
    error.map(|e| {
        Line::from(Span::styled(
            format!("              {}", e),
            styles::error_style(),
        ))
    })
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let mut lines = vec![];

    lines.push(Line::from(Span::styled(
        "               Sign in",
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    // Notification banner
    if let Some(n) = app.notifications.current() {
        lines.push(Line::from(Span::styled(
            format!(" {:<width$}", n.text, width = (LOGIN_WIDTH - 4) as usize),
            styles::notification_style(n.kind),
        )));
        lines.push(Line::from(""));
    }

    let errors = app.login_form.field_errors();

    lines.push(field_line(
        "Username:",
        app.login_username.clone(),
        app.login_focus == LoginFocus::Username,
    ));
    lines.extend(field_error_line(errors.username));

    let masked = "*".repeat(app.login_password.chars().count());
    lines.push(field_line(
        "Password:",
        masked,
        app.login_focus == LoginFocus::Password,
    ));
    lines.extend(field_error_line(errors.password));

    let remember_focused = app.login_focus == LoginFocus::Remember;
    let check = if app.login_remember { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::raw("              "),
        Span::styled(
            format!("{} Remember me", check),
            if remember_focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            },
        ),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_label = if app.logout_in_flight {
        " Signing out.. "
    } else if app.login_form.is_busy() {
        " Signing in... "
    } else if button_focused {
        "  ▶ Sign in ◀  "
    } else {
        "    Sign in    "
    };
    let button_style = if app.login_form.is_busy() {
        styles::muted_style()
    } else if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Forgot your password? Reset it on the web.",
        styles::link_style(),
    )));

    let height = lines.len() as u16 + 2;
    let area = centered_rect_fixed(LOGIN_WIDTH, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
