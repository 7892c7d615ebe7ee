//! Formatting helpers shared by parsers, watchers and the CLI.

/// Truncate to at most `max` characters, appending "..." when cut.
///
/// Counts `char`s, so multi-byte text never splits mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Keep at most the first `max` characters, without a marker.
pub fn clip(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Collapse all whitespace runs into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `<...>` tags, keeping the text between them.
pub fn strip_tags(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Keep only the last two components of a path ("src/main.rs").
pub fn shorten_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() <= 2 {
        return path.to_string();
    }
    format!(".../{}", parts[parts.len() - 2..].join("/"))
}

/// Compact token count ("1.2K", "3.4M").
pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Dollar amount, with a floor for tiny values.
pub fn format_cost(cost: f64) -> String {
    if cost < 0.01 {
        "<$0.01".to_string()
    } else {
        format!("${:.2}", cost)
    }
}

/// Human duration from milliseconds ("850ms", "42s", "3m 5s", "2h 10m").
pub fn format_duration(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    if ms < 1000 {
        return format!("{}ms", ms);
    }
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("héllo wörld", 7), "héllo w...");
        assert_eq!(clip("héllo wörld", 7), "héllo w");
        assert_eq!(clip("short", 7), "short");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<command-name>/init</command-name> go"),
            "/init go"
        );
    }

    #[test]
    fn test_shorten_path() {
        assert_eq!(shorten_path("/home/u/proj/src/main.rs"), ".../src/main.rs");
        assert_eq!(shorten_path("src/main.rs"), "src/main.rs");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_500_000), "2.5M");
        assert_eq!(format_cost(0.001), "<$0.01");
        assert_eq!(format_cost(1.234), "$1.23");
        assert_eq!(format_duration(850.0), "850ms");
        assert_eq!(format_duration(185_000.0), "3m 5s");
        assert_eq!(format_duration(7_800_000.0), "2h 10m");
    }
}
