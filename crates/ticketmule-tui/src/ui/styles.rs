use ratatui::style::{Color, Modifier, Style};

use ticketmule_core::NotificationKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(144, 175, 76);
pub const LINK: Color = Color::Rgb(77, 136, 207);
pub const ERROR: Color = Color::Rgb(216, 0, 12);
pub const ERROR_BG: Color = Color::Rgb(255, 186, 186);
pub const SUCCESS: Color = Color::Rgb(85, 136, 85);
pub const SUCCESS_BG: Color = Color::Rgb(238, 255, 238);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn link_style() -> Style {
    Style::default().fg(LINK)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

/// Banner style for the transient notification
pub fn notification_style(kind: NotificationKind) -> Style {
    match kind {
        NotificationKind::Success => Style::default().fg(SUCCESS).bg(SUCCESS_BG),
        NotificationKind::Error => Style::default().fg(ERROR).bg(ERROR_BG),
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}
