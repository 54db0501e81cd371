//! Help popup overlay: keyboard shortcuts organized by category.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Popup dimensions.
const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 18;

/// A shortcut entry: key binding and its description.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

/// A category of shortcuts with a title.
struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const NAVIGATION: Category = Category {
    title: "NAVIGATION",
    shortcuts: &[
        Shortcut {
            key: "Up/Down, j/k",
            desc: "Move within pane",
        },
        Shortcut {
            key: "Tab",
            desc: "Switch pane",
        },
        Shortcut {
            key: "Enter",
            desc: "Open selected conversation",
        },
    ],
};

const ACTIONS: Category = Category {
    title: "ACTIONS",
    shortcuts: &[
        Shortcut {
            key: "r",
            desc: "Refresh conversations and messages",
        },
        Shortcut {
            key: "o",
            desc: "Show view URL for selected media",
        },
        Shortcut {
            key: "s",
            desc: "Show download URL for selected media",
        },
        Shortcut {
            key: "?",
            desc: "Toggle this help",
        },
        Shortcut {
            key: "q / Esc",
            desc: "Quit",
        },
    ],
};

/// Render the help popup centered on the screen.
pub fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let mut lines: Vec<Line> = Vec::new();
    for category in [&NAVIGATION, &ACTIONS] {
        lines.push(Line::from(Span::styled(
            category.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for shortcut in category.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<16}", shortcut.key),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(shortcut.desc),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Center a fixed-size rect inside `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let [_, vertical, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(vertical);
    horizontal
}
