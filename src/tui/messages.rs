//! Messages pane: renders archived messages as sender-grouped bubbles.
//!
//! Consecutive messages from one sender form a visual group: the sender
//! header (avatar chip + name) appears once above the group, one bubble is
//! drawn per message, and a single timestamp closes the group. Rendering is
//! total: a message that matches no known content shape degrades to a
//! placeholder line, never an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::format::{decode_html_entities, format_file_size, short_timestamp};
use crate::models::{MediaAsset, MediaRender, Message, MessageContent};

/// Marker appended to the group timestamp when any message in the group
/// failed ingestion parsing.
const PARSE_WARNING: &str = " [!]";

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// An ordered, non-empty run of messages sharing one sender.
#[derive(Debug, Clone)]
pub struct MessageGroup {
    pub messages: Vec<Message>,
    pub is_own: bool,
    pub show_sender: bool,
}

impl MessageGroup {
    /// Normalize a single message into a one-element group.
    pub fn single(message: Message, current_user_id: Option<i64>) -> Self {
        let is_own = match (message.sender_id(), current_user_id) {
            (Some(s), Some(c)) => s == c,
            _ => false,
        };
        Self {
            messages: vec![message],
            is_own,
            show_sender: true,
        }
    }

    pub fn sender_name(&self) -> String {
        self.messages
            .first()
            .and_then(|m| m.sender.as_ref())
            .map(|u| u.name().to_string())
            .unwrap_or_else(|| "(unknown)".to_string())
    }

    /// Group timestamp comes from the first message.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.first().and_then(|m| m.created_at)
    }

    /// True when any message in the group failed source parsing.
    pub fn has_parse_warning(&self) -> bool {
        self.messages.iter().any(|m| !m.parsing_successful)
    }
}

/// Split an ordered message sequence into visual groups: consecutive
/// messages with the same sender id share a group.
pub fn group_messages(messages: Vec<Message>, current_user_id: Option<i64>) -> Vec<MessageGroup> {
    let mut groups: Vec<MessageGroup> = Vec::new();
    for message in messages {
        let same_sender = groups
            .last()
            .and_then(|g| g.messages.last())
            .map(|prev| prev.sender_id() == message.sender_id())
            .unwrap_or(false);
        if same_sender {
            if let Some(group) = groups.last_mut() {
                group.messages.push(message);
                continue;
            }
        }
        groups.push(MessageGroup::single(message, current_user_id));
    }
    groups
}

// ---------------------------------------------------------------------------
// Per-element media state
// ---------------------------------------------------------------------------

/// One-shot probe state of a rendered media element. `Loading` until the
/// probe answers; terminal states never transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaProbe {
    Loading,
    Loaded,
    Errored,
}

/// Probe states keyed by (message id, asset id) so two renders of the same
/// underlying asset stay independent.
pub type MediaProbes = HashMap<(i64, i64), MediaProbe>;

/// State for the messages pane.
pub struct MessagesState {
    pub conversation_name: String,
    pub groups: Vec<MessageGroup>,
    pub scroll_offset: usize,
    pub selected: usize,
    pub loading: bool,
    probes: MediaProbes,
}

impl Default for MessagesState {
    fn default() -> Self {
        Self {
            conversation_name: String::new(),
            groups: Vec::new(),
            scroll_offset: 0,
            selected: 0,
            loading: false,
            probes: MediaProbes::new(),
        }
    }
}

impl MessagesState {
    /// Replace the pane contents with a freshly fetched conversation.
    pub fn update(&mut self, conversation_name: String, groups: Vec<MessageGroup>) {
        self.conversation_name = conversation_name;
        self.selected = groups.len().saturating_sub(1);
        self.groups = groups;
        self.scroll_offset = 0;
        self.loading = false;
        self.probes.clear();
    }

    /// Record a probe result. Terminal states stick; a late `Loading`
    /// never demotes a settled element.
    pub fn set_media_probe(&mut self, message_id: i64, media_id: i64, probe: MediaProbe) {
        let entry = self.probes.entry((message_id, media_id)).or_insert(probe);
        if *entry == MediaProbe::Loading {
            *entry = probe;
        }
    }

    pub fn media_probe(&self, message_id: i64, media_id: i64) -> MediaProbe {
        self.probes
            .get(&(message_id, media_id))
            .copied()
            .unwrap_or(MediaProbe::Loading)
    }

    /// Media elements that still need probing, in render order.
    pub fn pending_probes(&self) -> Vec<(i64, i64)> {
        let mut pending = Vec::new();
        for group in &self.groups {
            for msg in &group.messages {
                if let Some(asset) = &msg.media {
                    if self.media_probe(msg.id, asset.id) == MediaProbe::Loading
                        && !pending.contains(&(msg.id, asset.id))
                    {
                        pending.push((msg.id, asset.id));
                    }
                }
            }
        }
        pending
    }

    /// First media asset id in the selected group, for the view/download
    /// actions.
    pub fn selected_media(&self) -> Option<i64> {
        self.groups
            .get(self.selected)?
            .messages
            .iter()
            .find_map(|m| m.media.as_ref().map(|a| a.id))
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.groups.len() {
            self.selected += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Lines for one rendered group, split by role so layout can interleave
/// them with spacing.
struct GroupRender {
    /// Sender header, shown once per group; None for own-message groups.
    header: Option<Line<'static>>,
    /// One block of lines per message bubble.
    bubbles: Vec<Vec<Line<'static>>>,
    /// Single trailing timestamp line (with parse-warning marker if due).
    timestamp: Line<'static>,
}

/// Render the messages pane into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &MessagesState, focused: bool) {
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
        .title(format!(" {} ", state.conversation_name));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.loading {
        Paragraph::new(Line::from(Span::styled(
            "loading messages...",
            Style::default().fg(Color::DarkGray),
        )))
        .render(inner, buf);
        return;
    }

    if state.groups.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "(no messages)",
            Style::default().fg(Color::DarkGray),
        )))
        .render(inner, buf);
        return;
    }

    let (all_lines, group_ranges) = build_message_lines(state, inner.width as usize);
    let total_lines = all_lines.len();
    let visible_height = inner.height as usize;

    let scroll = compute_auto_scroll(
        state.scroll_offset,
        state.selected,
        &group_ranges,
        visible_height,
        total_lines,
    );

    for (row, line_idx) in (scroll..total_lines).take(visible_height).enumerate() {
        let y = inner.y + row as u16;
        let line_area = Rect::new(inner.x, y, inner.width, 1);
        Paragraph::new(all_lines[line_idx].clone()).render(line_area, buf);
    }

    // Scroll indicators on the right edge.
    if total_lines > visible_height {
        let indicator_x = inner.x + inner.width.saturating_sub(1);
        if scroll > 0 {
            let cell = &mut buf[(indicator_x, inner.y)];
            cell.set_char('^');
            cell.set_style(Style::default().fg(Color::DarkGray));
        }
        if scroll + visible_height < total_lines {
            let bottom_y = inner.y + inner.height.saturating_sub(1);
            let cell = &mut buf[(indicator_x, bottom_y)];
            cell.set_char('v');
            cell.set_style(Style::default().fg(Color::DarkGray));
        }
    }
}

/// Flatten all groups into a line buffer plus per-group line ranges.
fn build_message_lines(
    state: &MessagesState,
    width: usize,
) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for (group_idx, group) in state.groups.iter().enumerate() {
        let start = lines.len();
        let rendered = render_group(group, &state.probes, width, group_idx == state.selected);

        if let Some(header) = rendered.header {
            lines.push(header);
        }
        for bubble in rendered.bubbles {
            lines.extend(bubble);
        }
        lines.push(rendered.timestamp);
        lines.push(Line::from(""));

        ranges.push((start, lines.len()));
    }

    (lines, ranges)
}

/// Render one group into its header/bubbles/timestamp parts.
fn render_group(
    group: &MessageGroup,
    probes: &MediaProbes,
    width: usize,
    is_selected: bool,
) -> GroupRender {
    // Own groups hug the right edge; the left indent is the alignment
    // spacer that replaces the suppressed sender header.
    let card_width = (width * 3 / 4).clamp(12, width.max(12));
    let indent = if group.is_own {
        width.saturating_sub(card_width)
    } else {
        0
    };

    let header = if group.is_own || !group.show_sender {
        None
    } else {
        let name = group.sender_name();
        let chip = Span::styled(
            format!(" {} ", crate::format::avatar_initials(&name)),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let label = Span::styled(
            format!(" {}", name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        Some(Line::from(vec![chip, label]))
    };

    let border_style = if is_selected {
        Style::default().fg(Color::Yellow)
    } else if group.is_own {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::Gray)
    };

    let bubbles = group
        .messages
        .iter()
        .map(|msg| render_bubble(msg, probes, card_width, indent, border_style))
        .collect();

    let ts_text = group
        .timestamp()
        .map(short_timestamp)
        .unwrap_or_else(|| "--".to_string());
    let warn = if group.has_parse_warning() {
        PARSE_WARNING
    } else {
        ""
    };
    let timestamp = Line::from(vec![
        Span::raw(" ".repeat(indent)),
        Span::styled(
            format!("{}{}", ts_text, warn),
            Style::default().fg(if warn.is_empty() {
                Color::DarkGray
            } else {
                Color::Red
            }),
        ),
    ]);

    GroupRender {
        header,
        bubbles,
        timestamp,
    }
}

/// Render one message as a bordered bubble.
fn render_bubble(
    msg: &Message,
    probes: &MediaProbes,
    card_width: usize,
    indent: usize,
    border_style: Style,
) -> Vec<Line<'static>> {
    let inner_width = card_width.saturating_sub(4);
    let content = content_lines(msg, probes, inner_width);
    let indent_str = " ".repeat(indent);

    let mut lines = Vec::with_capacity(content.len() + 2);
    lines.push(Line::from(vec![
        Span::raw(indent_str.clone()),
        Span::styled(
            format!("+{}+", "-".repeat(card_width.saturating_sub(2))),
            border_style,
        ),
    ]));
    for (text, style) in content {
        let pad = inner_width.saturating_sub(text.width());
        lines.push(Line::from(vec![
            Span::raw(indent_str.clone()),
            Span::styled("| ".to_string(), border_style),
            Span::styled(text, style),
            Span::raw(" ".repeat(pad)),
            Span::styled(" |".to_string(), border_style),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw(indent_str),
        Span::styled(
            format!("+{}+", "-".repeat(card_width.saturating_sub(2))),
            border_style,
        ),
    ]));
    lines
}

/// Dispatch a message's classified content to display lines.
fn content_lines(msg: &Message, probes: &MediaProbes, width: usize) -> Vec<(String, Style)> {
    let text_style = Style::default().fg(Color::White);
    match msg.content() {
        MessageContent::Text(text) => wrap_text(&decode_html_entities(text), width)
            .into_iter()
            .map(|l| (l, text_style))
            .collect(),
        MessageContent::Media(asset) => media_lines(msg, asset, probes),
        MessageContent::Mixed { text, media } => {
            // Text block first, media block second; either may be absent.
            let mut lines: Vec<(String, Style)> = Vec::new();
            if let Some(text) = text {
                lines.extend(
                    wrap_text(&decode_html_entities(text), width)
                        .into_iter()
                        .map(|l| (l, text_style)),
                );
            }
            if let Some(asset) = media {
                lines.extend(media_lines(msg, asset, probes));
            }
            if lines.is_empty() {
                lines.push(placeholder_line());
            }
            lines
        }
        MessageContent::CacheOnly(cache_id) => vec![(
            format!("[media pending: {}]", cache_id),
            Style::default().fg(Color::DarkGray),
        )],
        MessageContent::Unavailable => vec![placeholder_line()],
    }
}

fn placeholder_line() -> (String, Style) {
    (
        "[content not available]".to_string(),
        Style::default().fg(Color::DarkGray),
    )
}

/// Media card lines, keyed by the asset's render classification.
fn media_lines(msg: &Message, asset: &MediaAsset, probes: &MediaProbes) -> Vec<(String, Style)> {
    let size = asset.file_size.map(format_file_size).unwrap_or_default();
    let mime = asset.mime_type.as_deref().unwrap_or("?");
    let media_style = Style::default().fg(Color::Cyan);
    let probe = probes
        .get(&(msg.id, asset.id))
        .copied()
        .unwrap_or(MediaProbe::Loading);

    match asset.render_kind(msg.content_type) {
        MediaRender::Image => match probe {
            MediaProbe::Loading => vec![(
                format!("[image] {} (loading...)", asset.display_name()),
                Style::default().fg(Color::DarkGray),
            )],
            MediaProbe::Errored => file_card(asset, &size, mime),
            MediaProbe::Loaded => vec![
                (
                    format!("[image] {} ({})", asset.display_name(), size),
                    media_style,
                ),
                actions_line(),
            ],
        },
        MediaRender::Audio => vec![
            (
                format!("[audio] > {} ({})", asset.display_name(), size),
                media_style,
            ),
            actions_line(),
        ],
        MediaRender::Video => vec![
            (
                format!("[video] {} ({})", asset.display_name(), size),
                media_style,
            ),
            actions_line(),
        ],
        MediaRender::File => file_card(asset, &size, mime),
    }
}

/// Generic file summary card (also the image-error fallback).
fn file_card(asset: &MediaAsset, size: &str, mime: &str) -> Vec<(String, Style)> {
    vec![
        (
            format!("[file] {}", asset.display_name()),
            Style::default().fg(Color::Cyan),
        ),
        (
            format!("{} - {}", size, mime),
            Style::default().fg(Color::DarkGray),
        ),
        actions_line(),
    ]
}

fn actions_line() -> (String, Style) {
    (
        "o: view  s: download".to_string(),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
    )
}

/// Word-wrapping: split on newlines first, then wrap long lines.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.width() <= max_width {
            result.push(line.to_string());
        } else {
            let words: Vec<&str> = line.split_whitespace().collect();
            let mut current = String::new();
            for word in words {
                if current.is_empty() {
                    current = word.to_string();
                } else if current.width() + 1 + word.width() <= max_width {
                    current.push(' ');
                    current.push_str(word);
                } else {
                    result.push(current);
                    current = word.to_string();
                }
            }
            if !current.is_empty() {
                result.push(current);
            }
        }
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

/// Scroll offset keeping the selected group visible.
fn compute_auto_scroll(
    current_scroll: usize,
    selected: usize,
    ranges: &[(usize, usize)],
    visible_height: usize,
    total_lines: usize,
) -> usize {
    if ranges.is_empty() || total_lines <= visible_height {
        return 0;
    }

    let (sel_start, sel_end) = if selected < ranges.len() {
        ranges[selected]
    } else {
        return current_scroll;
    };

    let mut scroll = current_scroll;
    let group_height = sel_end.saturating_sub(sel_start);
    if group_height >= visible_height {
        scroll = sel_start;
    } else {
        if sel_start < scroll {
            scroll = sel_start;
        }
        if sel_end > scroll + visible_height {
            scroll = sel_end.saturating_sub(visible_height);
        }
    }

    let max_scroll = total_lines.saturating_sub(visible_height);
    scroll.min(max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileKind, User};

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            display_name: Some(name.to_string()),
            username: None,
            bitmoji_url: None,
        }
    }

    fn text_message(id: i64, sender_id: i64, text: &str) -> Message {
        Message {
            id,
            conversation_id: 1,
            sender: Some(user(sender_id, "Ann Ax")),
            created_at: Some("2026-08-20T10:00:00Z".parse().unwrap()),
            content_type: 1,
            text: Some(text.to_string()),
            media: None,
            cache_id: None,
            parsing_successful: true,
        }
    }

    fn video_asset(mime: &str) -> MediaAsset {
        MediaAsset {
            id: 9,
            file_type: FileKind::Video,
            mime_type: Some(mime.to_string()),
            original_filename: Some("clip.mp4".to_string()),
            file_size: Some(2048),
        }
    }

    #[test]
    fn test_group_messages_by_consecutive_sender() {
        let msgs = vec![
            text_message(1, 10, "a"),
            text_message(2, 10, "b"),
            text_message(3, 20, "c"),
            text_message(4, 10, "d"),
        ];
        let groups = group_messages(msgs, Some(20));
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].messages.len(), 2);
        assert!(!groups[0].is_own);
        assert!(groups[1].is_own);
    }

    #[test]
    fn test_group_of_three_renders_one_header_three_bubbles_one_timestamp() {
        let group = MessageGroup {
            messages: vec![
                text_message(1, 10, "one"),
                text_message(2, 10, "two"),
                text_message(3, 10, "three"),
            ],
            is_own: false,
            show_sender: true,
        };
        let rendered = render_group(&group, &MediaProbes::new(), 60, false);
        assert!(rendered.header.is_some());
        assert_eq!(rendered.bubbles.len(), 3);
        let ts: String = rendered
            .timestamp
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(!ts.contains(PARSE_WARNING.trim()));
    }

    #[test]
    fn test_own_group_suppresses_header_and_indents() {
        let group = MessageGroup {
            messages: vec![text_message(1, 10, "hi")],
            is_own: true,
            show_sender: true,
        };
        let rendered = render_group(&group, &MediaProbes::new(), 60, false);
        assert!(rendered.header.is_none());
        // Alignment spacer replaces the sender column.
        let first: String = rendered.bubbles[0][0]
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(first.starts_with(' '));
    }

    #[test]
    fn test_warning_marker_iff_any_parse_failure() {
        let mut bad = text_message(2, 10, "broken");
        bad.parsing_successful = false;
        let group = MessageGroup {
            messages: vec![text_message(1, 10, "fine"), bad],
            is_own: false,
            show_sender: true,
        };
        assert!(group.has_parse_warning());
        let rendered = render_group(&group, &MediaProbes::new(), 60, false);
        let ts: String = rendered
            .timestamp
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(ts.contains("[!]"));
    }

    #[test]
    fn test_mixed_renders_text_then_media() {
        let mut msg = text_message(1, 10, "caption &amp; more");
        msg.content_type = 2;
        msg.media = Some(video_asset("video/mp4"));
        let lines = content_lines(&msg, &MediaProbes::new(), 40);
        assert!(lines[0].0.contains("caption & more"));
        assert!(lines[1].0.starts_with("[video]"));
    }

    #[test]
    fn test_mp4_routes_by_owning_content_type() {
        let mut msg = text_message(1, 10, "");
        msg.text = None;
        msg.media = Some(video_asset("video/mp4"));

        msg.content_type = 0;
        let lines = content_lines(&msg, &MediaProbes::new(), 40);
        assert!(lines[0].0.starts_with("[video]"));

        msg.content_type = 4;
        let lines = content_lines(&msg, &MediaProbes::new(), 40);
        assert!(lines[0].0.starts_with("[audio]"));
    }

    #[test]
    fn test_image_error_degrades_to_file_card() {
        let mut msg = text_message(1, 10, "");
        msg.text = None;
        msg.content_type = 0;
        msg.media = Some(MediaAsset {
            id: 3,
            file_type: FileKind::Image,
            mime_type: Some("image/png".to_string()),
            original_filename: Some("pic.png".to_string()),
            file_size: Some(4096),
        });

        let mut probes = MediaProbes::new();
        probes.insert((1, 3), MediaProbe::Errored);
        let lines = content_lines(&msg, &probes, 40);
        assert!(lines[0].0.starts_with("[file] pic.png"));
        assert!(lines[1].0.contains("image/png"));
    }

    #[test]
    fn test_unavailable_placeholder() {
        let mut msg = text_message(1, 10, "");
        msg.text = None;
        let lines = content_lines(&msg, &MediaProbes::new(), 40);
        assert_eq!(lines[0].0, "[content not available]");
    }

    #[test]
    fn test_probe_transitions_stick() {
        let mut state = MessagesState::default();
        state.set_media_probe(1, 2, MediaProbe::Errored);
        state.set_media_probe(1, 2, MediaProbe::Loading);
        assert_eq!(state.media_probe(1, 2), MediaProbe::Errored);
        // Unknown elements report Loading.
        assert_eq!(state.media_probe(9, 9), MediaProbe::Loading);
    }

    #[test]
    fn test_selected_media_finds_first_asset_in_group() {
        let mut with_media = text_message(2, 10, "");
        with_media.text = None;
        with_media.content_type = 0;
        with_media.media = Some(video_asset("video/mp4"));

        let mut state = MessagesState::default();
        state.groups = group_messages(vec![text_message(1, 10, "hi"), with_media], None);
        assert_eq!(state.selected_media(), Some(9));

        state.groups = group_messages(vec![text_message(1, 10, "hi")], None);
        state.selected = 0;
        assert_eq!(state.selected_media(), None);
    }

    #[test]
    fn test_auto_scroll_keeps_selection_visible() {
        let ranges = vec![(0, 5), (5, 10), (10, 15)];
        assert_eq!(compute_auto_scroll(0, 2, &ranges, 6, 15), 9);
        assert_eq!(compute_auto_scroll(9, 0, &ranges, 6, 15), 0);
    }
}
