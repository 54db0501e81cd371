//! Avatar badge widget: single user badge or stacked group badges.
//!
//! A badge shows the avatar image marker while the image reference is
//! believed good, and falls back permanently to initials once its probe
//! fails. Error state is per badge instance and one-way; siblings in a
//! stack never affect each other.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::format::avatar_initials;
use crate::models::User;

/// Marker shown when an avatar image reference is present and healthy.
/// Terminals cannot decode the image itself, so a badge face stands in.
const IMAGE_BADGE: &str = ":)";

/// Shown when no name at all is available for initials.
const NO_NAME_BADGE: &str = "?";

/// At most this many participants render in a group stack; extras are
/// silently dropped.
pub const MAX_STACKED: usize = 3;

/// Badge sizes, each with a normal and a smaller stacked scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl AvatarSize {
    /// Largest size whose normal badge fits the given row count.
    pub fn for_height(height: u16) -> Self {
        match height {
            0..=1 => AvatarSize::Small,
            2..=3 => AvatarSize::Medium,
            4..=5 => AvatarSize::Large,
            _ => AvatarSize::XLarge,
        }
    }

    /// Badge (width, height) in terminal cells.
    pub fn scale(self, stacked: bool) -> (u16, u16) {
        match (self, stacked) {
            (AvatarSize::Small, false) => (4, 1),
            (AvatarSize::Small, true) => (3, 1),
            (AvatarSize::Medium, false) => (6, 3),
            (AvatarSize::Medium, true) => (4, 1),
            (AvatarSize::Large, false) => (8, 3),
            (AvatarSize::Large, true) => (5, 2),
            (AvatarSize::XLarge, false) => (10, 5),
            (AvatarSize::XLarge, true) => (6, 3),
        }
    }
}

/// Who one badge depicts.
#[derive(Debug, Clone)]
pub struct AvatarSource {
    pub name: String,
    pub image_url: Option<String>,
}

impl AvatarSource {
    pub fn from_user(user: &User) -> Self {
        let name = user
            .display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| user.username.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            image_url: user.bitmoji_url.clone(),
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            image_url: None,
        }
    }
}

/// Per-instance image state. Transitions are one-way: once a badge's image
/// errors it stays on initials for the component's lifetime.
#[derive(Debug, Default, Clone)]
pub struct AvatarState {
    image_errored: bool,
    participant_errored: Vec<bool>,
}

impl AvatarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_image_error(&mut self) {
        self.image_errored = true;
    }

    pub fn image_errored(&self) -> bool {
        self.image_errored
    }

    pub fn mark_participant_error(&mut self, index: usize) {
        if self.participant_errored.len() <= index {
            self.participant_errored.resize(index + 1, false);
        }
        self.participant_errored[index] = true;
    }

    pub fn participant_errored(&self, index: usize) -> bool {
        self.participant_errored.get(index).copied().unwrap_or(false)
    }
}

/// Text content for a badge given its image state.
fn badge_label(source: &AvatarSource, errored: bool) -> String {
    if source.image_url.is_some() && !errored {
        return IMAGE_BADGE.to_string();
    }
    let initials = avatar_initials(&source.name);
    if initials.is_empty() {
        NO_NAME_BADGE.to_string()
    } else {
        initials
    }
}

/// Stable badge color from the name.
fn badge_color(name: &str) -> Color {
    const PALETTE: [Color; 6] = [
        Color::Blue,
        Color::Cyan,
        Color::Green,
        Color::Magenta,
        Color::Yellow,
        Color::Red,
    ];
    let hash: usize = name.bytes().map(|b| b as usize).sum();
    PALETTE[hash % PALETTE.len()]
}

/// Offsets of stacked badges inside `area`, keyed by badge count:
/// 1 centered, 2 diagonal pair, 3 top-left / top-right / bottom-center.
fn stack_layout(count: usize, badge: (u16, u16), area: Rect) -> Vec<(u16, u16)> {
    let (bw, bh) = badge;
    let max_x = area.width.saturating_sub(bw);
    let max_y = area.height.saturating_sub(bh);
    match count {
        0 => Vec::new(),
        1 => vec![(max_x / 2, max_y / 2)],
        2 => vec![(0, 0), (max_x, max_y)],
        _ => vec![(0, 0), (max_x, 0), (max_x / 2, max_y)],
    }
}

/// Render a single-user avatar badge.
pub fn render(area: Rect, buf: &mut Buffer, source: &AvatarSource, size: AvatarSize, state: &AvatarState) {
    let (bw, bh) = size.scale(false);
    let x = area.x + area.width.saturating_sub(bw) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    let badge = Rect::new(x, y, bw.min(area.width), bh.min(area.height));
    render_badge(badge, buf, source, state.image_errored());
}

/// Render a group avatar: up to the first three participants stacked.
/// Falls back to the single-badge path when the participant list is empty.
pub fn render_group(
    area: Rect,
    buf: &mut Buffer,
    fallback: &AvatarSource,
    participants: &[AvatarSource],
    size: AvatarSize,
    state: &AvatarState,
) {
    if participants.is_empty() {
        render(area, buf, fallback, size, state);
        return;
    }
    let shown = &participants[..participants.len().min(MAX_STACKED)];
    let badge = size.scale(true);
    let offsets = stack_layout(shown.len(), badge, area);
    for (index, (source, (dx, dy))) in shown.iter().zip(offsets).enumerate() {
        let rect = Rect::new(
            area.x + dx,
            area.y + dy,
            badge.0.min(area.width),
            badge.1.min(area.height),
        );
        render_badge(rect, buf, source, state.participant_errored(index));
    }
}

/// Paint one badge: colored block with its label centered.
fn render_badge(area: Rect, buf: &mut Buffer, source: &AvatarSource, errored: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let label = badge_label(source, errored);
    let style = Style::default()
        .fg(Color::Black)
        .bg(badge_color(&source.name))
        .add_modifier(Modifier::BOLD);

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buf[(x, y)];
            cell.set_char(' ');
            cell.set_style(style);
        }
    }

    let text_y = area.y + area.height / 2;
    let text_x = area.x + area.width.saturating_sub(label.width() as u16) / 2;
    buf.set_string(text_x, text_y, &label, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, image: bool) -> AvatarSource {
        AvatarSource {
            name: name.to_string(),
            image_url: image.then(|| "/media/avatar.png".to_string()),
        }
    }

    #[test]
    fn test_badge_label_prefers_image() {
        assert_eq!(badge_label(&source("John Doe", true), false), IMAGE_BADGE);
    }

    #[test]
    fn test_badge_label_falls_back_to_initials_on_error() {
        assert_eq!(badge_label(&source("John Doe", true), true), "JD");
    }

    #[test]
    fn test_badge_label_without_any_name() {
        assert_eq!(badge_label(&source("", false), false), NO_NAME_BADGE);
    }

    #[test]
    fn test_source_name_fallback_chain() {
        let user = User {
            id: 1,
            display_name: None,
            username: Some("ghost42".to_string()),
            bitmoji_url: None,
        };
        assert_eq!(AvatarSource::from_user(&user).name, "ghost42");
    }

    #[test]
    fn test_state_transitions_are_one_way_and_independent() {
        let mut state = AvatarState::new();
        state.mark_participant_error(1);
        assert!(!state.participant_errored(0));
        assert!(state.participant_errored(1));
        assert!(!state.participant_errored(2));
        // No API exists to clear an error; marking again keeps it set.
        state.mark_participant_error(1);
        assert!(state.participant_errored(1));
    }

    #[test]
    fn test_badge_label_centered_by_display_width() {
        // Two CJK initials are 6 bytes but 4 columns wide; centering in a
        // 6-column badge leaves one column either side.
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        render_badge(area, &mut buf, &source("王 伟", false), false);
        assert_eq!(buf[(1, 0)].symbol(), "王");
        assert_eq!(buf[(3, 0)].symbol(), "伟");
    }

    #[test]
    fn test_size_for_height() {
        assert_eq!(AvatarSize::for_height(1), AvatarSize::Small);
        assert_eq!(AvatarSize::for_height(3), AvatarSize::Medium);
        assert_eq!(AvatarSize::for_height(4), AvatarSize::Large);
        assert_eq!(AvatarSize::for_height(12), AvatarSize::XLarge);
    }

    #[test]
    fn test_stack_layout_positions() {
        let area = Rect::new(0, 0, 10, 4);
        let badge = (4, 1);
        assert_eq!(stack_layout(1, badge, area), vec![(3, 1)]);
        assert_eq!(stack_layout(2, badge, area), vec![(0, 0), (6, 3)]);
        assert_eq!(stack_layout(3, badge, area), vec![(0, 0), (6, 0), (3, 3)]);
    }

    #[test]
    fn test_group_render_caps_at_three_badges() {
        let participants: Vec<AvatarSource> = ["Ann Ax", "Bo By", "Cy Cz", "Di Dw"]
            .iter()
            .map(|n| source(n, true))
            .collect();
        let mut state = AvatarState::new();
        // Second participant's image failed; others unaffected.
        state.mark_participant_error(1);

        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        render_group(
            area,
            &mut buf,
            &source("group", false),
            &participants,
            AvatarSize::Medium,
            &state,
        );

        let content: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    + "\n"
            })
            .collect();
        // Exactly three badges: two image markers plus one initials fallback.
        assert_eq!(content.matches(":)").count(), 2);
        assert!(content.contains("BB"));
        // The fourth participant is dropped entirely.
        assert!(!content.contains("DD"));
    }
}
