//! Sidebar widget: conversation list with previews and last-activity times.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::format::{relative_timestamp, truncate_text};
use crate::models::{Conversation, MessageContent};

/// One sidebar entry.
#[derive(Clone)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub is_group: bool,
    /// Relative time of the last message ("3h ago"), if known.
    pub last_activity: Option<String>,
    /// Truncated last-message preview.
    pub preview: Option<String>,
}

/// Sidebar state: owns the entries and tracks navigation.
pub struct SidebarState {
    pub entries: Vec<Entry>,
    pub selected: usize,
    pub scroll_offset: usize,
    pub loading: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            loading: true,
        }
    }
}

impl SidebarState {
    /// Rebuild entries from fetched conversations.
    pub fn update(&mut self, conversations: &[Conversation]) {
        self.entries = conversations.iter().map(entry_from_conversation).collect();
        self.loading = false;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }
}

fn entry_from_conversation(conv: &Conversation) -> Entry {
    let preview = conv.last_message.as_ref().and_then(|msg| {
        let text = match msg.content() {
            MessageContent::Text(t) => t.to_string(),
            MessageContent::Media(a) => format!("[{}]", a.display_name()),
            MessageContent::Mixed { text, .. } => {
                text.map(|t| t.to_string()).unwrap_or_else(|| "[media]".to_string())
            }
            MessageContent::CacheOnly(_) => "[media]".to_string(),
            MessageContent::Unavailable => return None,
        };
        Some(truncate_text(&text, crate::format::TRUNCATE_DEFAULT))
    });

    let last_activity = conv
        .last_message_at
        .or_else(|| conv.last_message.as_ref().and_then(|m| m.created_at))
        .map(relative_timestamp);

    Entry {
        id: conv.id,
        name: conv.display_name(),
        is_group: conv.is_group,
        last_activity,
        preview,
    }
}

/// Render the sidebar into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &SidebarState, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(" Conversations ");

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.loading {
        Paragraph::new(Span::styled(
            "loading...",
            Style::default().fg(Color::DarkGray),
        ))
        .render(inner, buf);
        return;
    }

    if state.entries.is_empty() {
        Paragraph::new(Span::styled(
            "(no conversations)",
            Style::default().fg(Color::DarkGray),
        ))
        .render(inner, buf);
        return;
    }

    // Two rows per entry: name line + preview line.
    let rows_per_entry = 2usize;
    let visible = (inner.height as usize / rows_per_entry).max(1);
    let scroll = state
        .selected
        .saturating_sub(visible.saturating_sub(1))
        .max(state.scroll_offset.min(state.selected));

    let mut y = inner.y;
    for (idx, entry) in state.entries.iter().enumerate().skip(scroll).take(visible) {
        let selected = idx == state.selected;
        let name_style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let icon = if entry.is_group { "## " } else { "@ " };
        let time = entry.last_activity.as_deref().unwrap_or("");
        let name_width = inner.width as usize;
        let head = format!("{}{}", icon, entry.name);
        let pad = name_width
            .saturating_sub(head.chars().count())
            .saturating_sub(time.len());
        let name_line = Line::from(vec![
            Span::styled(head, name_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(time.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(name_line).render(Rect::new(inner.x, y, inner.width, 1), buf);
        y += 1;
        if y >= inner.y + inner.height {
            break;
        }

        let preview = entry.preview.as_deref().unwrap_or("");
        let preview_line = Line::from(Span::styled(
            format!("  {}", preview),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(preview_line).render(Rect::new(inner.x, y, inner.width, 1), buf);
        y += 1;
        if y >= inner.y + inner.height {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaAsset, FileKind, Message, User};

    fn conversation(id: i64) -> Conversation {
        Conversation {
            id,
            name: Some(format!("conv {}", id)),
            is_group: false,
            participants: Vec::new(),
            last_message: None,
            last_message_at: None,
            message_count: None,
            messages: None,
        }
    }

    #[test]
    fn test_update_clamps_selection() {
        let mut state = SidebarState::default();
        state.selected = 5;
        state.update(&[conversation(1), conversation(2)]);
        assert_eq!(state.selected, 1);
        assert!(!state.loading);
    }

    #[test]
    fn test_preview_from_media_message() {
        let mut conv = conversation(1);
        conv.last_message = Some(Message {
            id: 1,
            conversation_id: 1,
            sender: Some(User {
                id: 2,
                display_name: None,
                username: None,
                bitmoji_url: None,
            }),
            created_at: None,
            content_type: 0,
            text: None,
            media: Some(MediaAsset {
                id: 1,
                file_type: FileKind::Image,
                mime_type: None,
                original_filename: Some("pic.png".to_string()),
                file_size: None,
            }),
            cache_id: None,
            parsing_successful: true,
        });
        let entry = entry_from_conversation(&conv);
        assert_eq!(entry.preview.as_deref(), Some("[pic.png]"));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut state = SidebarState::default();
        state.update(&[conversation(1), conversation(2)]);
        state.select_previous();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }
}
