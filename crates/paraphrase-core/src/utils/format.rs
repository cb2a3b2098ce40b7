use chrono::Duration;

/// Format time remaining on a session, e.g. "2h 5m", "45m", "30s"
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        let minutes = (secs % 3600) / 60;
        if minutes == 0 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}h {}m", secs / 3600, minutes)
        }
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Character counter shown under a text pane, e.g. "120 / 5000"
pub fn character_count(text: &str, max: usize) -> String {
    format!("{} / {}", text.chars().count(), max)
}

/// Whitespace-separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::seconds(-5)), "0s");
        assert_eq!(format_remaining(Duration::seconds(30)), "30s");
        assert_eq!(format_remaining(Duration::seconds(45 * 60)), "45m");
        assert_eq!(format_remaining(Duration::seconds(2 * 3600)), "2h");
        assert_eq!(format_remaining(Duration::seconds(2 * 3600 + 5 * 60)), "2h 5m");
        assert_eq!(format_remaining(Duration::seconds(86_400 + 3 * 3600)), "1d 3h");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_counts() {
        assert_eq!(character_count("héllo", 5000), "5 / 5000");
        assert_eq!(word_count("  the quick\n brown   fox "), 4);
        assert_eq!(word_count(""), 0);
    }
}
