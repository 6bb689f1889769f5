//! Formatting utilities used for CLI and export outputs.

pub fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

/// Shorten to `max` characters, ending with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub fn opt_or_dash(v: Option<&str>) -> String {
    match v {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

pub fn meters(d: f64) -> String {
    if d >= 1000.0 {
        format!("{:.2} km", d / 1000.0)
    } else {
        format!("{:.0} m", d)
    }
}
