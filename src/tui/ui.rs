//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Pane};
use super::avatar::{self, AvatarSize, AvatarSource};
use super::help;
use super::messages;
use super::sidebar;

/// Returns status indicator symbol and color based on online state
fn status_indicator(is_online: bool) -> (&'static str, Color) {
    if is_online {
        ("*", Color::Green)
    } else {
        ("o", Color::Red)
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    // Split main area: sidebar (32 cols) + content
    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(32), Constraint::Fill(1)]).areas(main_area);

    sidebar::render(
        sidebar_area,
        frame.buffer_mut(),
        &app.sidebar,
        app.active_pane == Pane::Sidebar,
    );

    // Split content: conversation header (avatar + names) + messages.
    let [conv_header_area, messages_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(content_area);

    render_conversation_header(conv_header_area, frame.buffer_mut(), app);

    messages::render(
        messages_area,
        frame.buffer_mut(),
        &app.messages,
        app.active_pane == Pane::Messages,
    );

    render_status(status_area, frame.buffer_mut(), app);

    // Help popup overlays everything else.
    if app.show_help {
        help::render_help_popup(frame);
    }
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = Span::styled(
        " chatvault",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let help_indicator = Span::styled(" [?] Help ", Style::default().fg(Color::Gray));

    let (status_symbol, status_color) = status_indicator(app.is_online);
    let online_status = Span::styled(
        format!(" {} online ", status_symbol),
        Style::default().fg(status_color),
    );

    let user_name = app
        .current_user
        .as_ref()
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| "-".to_string());
    let user = Span::styled(format!(" {} ", user_name), Style::default().fg(Color::Cyan));

    let left_width = " chatvault".len();
    let right_content = format!("[?] Help  {} online  {} ", status_symbol, user_name);
    let padding_width = area
        .width
        .saturating_sub((left_width + right_content.len()) as u16) as usize;
    let padding = Span::raw(" ".repeat(padding_width));

    let header_line = Line::from(vec![title, padding, help_indicator, online_status, user]);
    Paragraph::new(header_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Render the open conversation's avatar badge(s) and title.
fn render_conversation_header(area: Rect, buf: &mut Buffer, app: &App) {
    let Some(conv) = &app.conversation else {
        Paragraph::new(Line::from(Span::styled(
            " select a conversation (Enter)",
            Style::default().fg(Color::DarkGray),
        )))
        .render(area, buf);
        return;
    };

    let [avatar_area, text_area] =
        Layout::horizontal([Constraint::Length(10), Constraint::Fill(1)]).areas(area);

    let sources: Vec<AvatarSource> = conv.participants.iter().map(AvatarSource::from_user).collect();
    let fallback = sources
        .first()
        .cloned()
        .unwrap_or_else(|| AvatarSource::from_name(&conv.display_name()));

    let size = AvatarSize::for_height(avatar_area.height);
    if conv.is_group {
        avatar::render_group(
            avatar_area,
            buf,
            &fallback,
            &sources,
            size,
            &app.avatar_state,
        );
    } else {
        avatar::render(avatar_area, buf, &fallback, size, &app.avatar_state);
    }

    let name_line = Line::from(Span::styled(
        format!(" {}", conv.display_name()),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    let detail = match (conv.is_group, conv.message_count) {
        (true, Some(n)) => format!(" {} participants - {} messages", conv.participants.len(), n),
        (true, None) => format!(" {} participants", conv.participants.len()),
        (false, Some(n)) => format!(" {} messages", n),
        (false, None) => String::new(),
    };
    let detail_line = Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray)));

    let [name_area, detail_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(2)]).areas(text_area);
    Paragraph::new(name_line).render(name_area, buf);
    Paragraph::new(detail_line).render(detail_area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    // A pending status message takes over the whole bar.
    if let Some(ref msg) = app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(Color::Red).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bg(Color::DarkGray)
        };
        let line = Line::from(Span::styled(format!(" {} ", msg), style));
        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let (conn_symbol, conn_color) = status_indicator(app.is_online);
    let connection = Span::styled(
        format!(
            " {} {} ",
            conn_symbol,
            if app.is_online { "connected" } else { "offline" }
        ),
        Style::default().fg(conn_color),
    );

    let sep_style = Style::default().fg(Color::DarkGray);

    let conversation_display = app
        .conversation
        .as_ref()
        .map(|c| c.display_name())
        .unwrap_or_else(|| "(none)".to_string());
    let conversation = Span::styled(conversation_display, Style::default().fg(Color::Yellow));

    let pane = Span::styled(
        format!("Tab: {} ", app.active_pane.as_str()),
        Style::default().fg(Color::Cyan),
    );

    let help_hint = Span::styled("?: help", Style::default().fg(Color::Gray));
    let refresh_hint = Span::styled("r: refresh", Style::default().fg(Color::Gray));

    let status_line = Line::from(vec![
        connection,
        Span::styled(" | ", sep_style),
        conversation,
        Span::styled(" | ", sep_style),
        pane,
        Span::styled(" | ", sep_style),
        help_hint,
        Span::styled(" | ", sep_style),
        refresh_hint,
    ]);

    Paragraph::new(status_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}
