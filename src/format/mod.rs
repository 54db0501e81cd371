//! Display-formatting helpers
//!
//! Pure functions shared by the CLI output and the TUI widgets. Timestamp
//! helpers compare against the wall clock at call time; the `_at` variants
//! take an explicit "now" so they stay deterministic under test.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Default length budget for [`truncate_text`].
pub const TRUNCATE_DEFAULT: usize = 50;

/// Short display string for a message timestamp.
///
/// Same calendar day -> time of day, one day old -> "Yesterday",
/// under a week -> weekday name, otherwise month/day.
pub fn short_timestamp(ts: DateTime<Utc>) -> String {
    short_timestamp_at(ts.with_timezone(&Local), Local::now())
}

pub fn short_timestamp_at<Tz: TimeZone>(ts: DateTime<Tz>, now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let days = now
        .date_naive()
        .signed_duration_since(ts.date_naive())
        .num_days();
    if days <= 0 {
        ts.format("%-I:%M %p").to_string()
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        ts.format("%A").to_string()
    } else {
        ts.format("%b %-d").to_string()
    }
}

/// Relative age string ("Just now", "5m ago", ...), full date past a week.
pub fn relative_timestamp(ts: DateTime<Utc>) -> String {
    relative_timestamp_at(ts, Utc::now())
}

pub fn relative_timestamp_at<Tz: TimeZone>(ts: DateTime<Tz>, now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let elapsed = now.signed_duration_since(ts.clone());
    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        ts.format("%b %-d, %Y").to_string()
    }
}

/// Human-readable byte count, base 1024 across B/KB/MB/GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let index = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(index as i32);
    // Two decimals with trailing zeros trimmed: "1.5 KB", "2 MB".
    let mut num = format!("{:.2}", value);
    while num.ends_with('0') {
        num.pop();
    }
    if num.ends_with('.') {
        num.pop();
    }
    format!("{} {}", num, UNITS[index])
}

/// Category label for the backend's integer content type.
pub fn message_type_label(content_type: i64) -> &'static str {
    match content_type {
        0 => "media",
        1 => "text",
        2 => "mixed",
        _ => "unknown",
    }
}

/// First letter of each whitespace token, uppercased, at most two letters.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(|c| c.to_uppercase())
        .take(2)
        .collect()
}

/// Avatar-badge initials: first + last token letters when two or more
/// tokens exist, else the first two letters of the single token.
///
/// Not interchangeable with [`initials`]: "Madonna" yields "MA" here but
/// "M" there.
pub fn avatar_initials(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => String::new(),
        [only] => only.chars().take(2).flat_map(|c| c.to_uppercase()).collect(),
        [first, .., last] => first
            .chars()
            .next()
            .into_iter()
            .chain(last.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect(),
    }
}

/// Cut text to `max` characters, appending "..." when shortened.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Decode HTML entities in archived message text.
///
/// Single pass: each entity is decoded once, text without entities passes
/// through unchanged, and malformed or unknown sequences are kept verbatim.
/// Never fails.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        // Entities are short; anything without a ';' nearby is literal text.
        let end = rest[1..].find(';').map(|i| i + 1);
        match end {
            Some(end) if end <= 10 => match decode_entity(&rest[1..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one entity body (between '&' and ';').
fn decode_entity(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = body.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_short_timestamp_buckets() {
        let now = at("2026-08-29T15:30:00Z");
        assert_eq!(short_timestamp_at(at("2026-08-29T09:15:00Z"), now), "9:15 AM");
        assert_eq!(short_timestamp_at(at("2026-08-28T23:59:00Z"), now), "Yesterday");
        // Two days back falls inside the weekday window.
        assert_eq!(short_timestamp_at(at("2026-08-27T08:00:00Z"), now), "Thursday");
        assert_eq!(short_timestamp_at(at("2026-08-01T08:00:00Z"), now), "Aug 1");
    }

    #[test]
    fn test_short_timestamp_uses_calendar_days() {
        // 23:50 vs 00:10 next day: 20 minutes apart but different days.
        let now = at("2026-08-29T00:10:00Z");
        assert_eq!(short_timestamp_at(at("2026-08-28T23:50:00Z"), now), "Yesterday");
    }

    #[test]
    fn test_relative_timestamp_buckets() {
        let now = at("2026-08-29T12:00:00Z");
        assert_eq!(relative_timestamp_at(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_timestamp_at(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_timestamp_at(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(relative_timestamp_at(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_timestamp_at(now - Duration::days(6), now), "6d ago");
        assert_eq!(
            relative_timestamp_at(now - Duration::days(30), now),
            "Jul 30, 2026"
        );
    }

    #[test]
    fn test_relative_timestamp_floors() {
        let now = at("2026-08-29T12:00:00Z");
        // 1h59m floors to 1h.
        assert_eq!(
            relative_timestamp_at(now - Duration::minutes(119), now),
            "1h ago"
        );
    }

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 B");
    }

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(2_621_440), "2.5 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_format_file_size_monotonic_units() {
        // Unit never shrinks as the byte count grows.
        let sizes = [1u64, 1023, 1024, 1_048_575, 1_048_576, 1_073_741_824, u64::MAX];
        let rank = |s: &str| ["B", "KB", "MB", "GB"]
            .iter()
            .position(|u| s.ends_with(u))
            .unwrap();
        let mut last = 0;
        for b in sizes {
            let r = rank(&format_file_size(b));
            assert!(r >= last, "unit shrank at {} bytes", b);
            last = r;
        }
    }

    #[test]
    fn test_message_type_label_total() {
        assert_eq!(message_type_label(0), "media");
        assert_eq!(message_type_label(1), "text");
        assert_eq!(message_type_label(2), "mixed");
        assert_eq!(message_type_label(3), "unknown");
        assert_eq!(message_type_label(4), "unknown");
        assert_eq!(message_type_label(-1), "unknown");
    }

    #[test]
    fn test_initials_per_token() {
        assert_eq!(initials("John Doe"), "JD");
        assert_eq!(initials("John Ronald Reuel"), "JR");
        assert_eq!(initials("madonna"), "M");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_avatar_initials() {
        assert_eq!(avatar_initials("John Doe"), "JD");
        assert_eq!(avatar_initials("John Ronald Reuel"), "JR");
        assert_eq!(avatar_initials("Madonna"), "MA");
        assert_eq!(avatar_initials(""), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", TRUNCATE_DEFAULT), "short");
        let long = "x".repeat(60);
        let cut = truncate_text(&long, TRUNCATE_DEFAULT);
        assert_eq!(cut.chars().count(), TRUNCATE_DEFAULT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("a &lt;b&gt; c"), "a <b> c");
        assert_eq!(decode_html_entities("fish &amp; chips"), "fish & chips");
        assert_eq!(decode_html_entities("it&#39;s &#x41;"), "it's A");
        assert_eq!(decode_html_entities("no&nbsp;break"), "no break");
    }

    #[test]
    fn test_decode_html_entities_passthrough() {
        // No entities: returned unchanged.
        assert_eq!(decode_html_entities("plain text"), "plain text");
        // Lone ampersand and unknown entities stay verbatim.
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_decode_html_entities_idempotent_on_decoded_text() {
        let once = decode_html_entities("it&#39;s <b> & done");
        assert_eq!(decode_html_entities(&once), once);
    }
}
