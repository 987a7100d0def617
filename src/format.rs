//! Presentation-only formatting helpers shared by every builder.
//!
//! These functions turn raw model values into display strings: dates, phone
//! numbers, employment durations, proficiency badges. They carry no business
//! logic and never fail — an input that doesn't match the expected shape is
//! passed through unchanged rather than rejected, because by the time a
//! builder runs the document has already been validated.
//!
//! The html and markdown builders expose these as tera filters (see
//! [`crate::builders`]); the pdf builder calls them directly.

use chrono::{Datelike, Utc};

use crate::model::parse_year_month;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a `YYYY-MM` date as `"Jan 2020"`. A bare `YYYY` is returned as-is,
/// an empty value becomes `"Present"`, anything else passes through.
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return "Present".to_string();
    }
    match parse_year_month(date) {
        Some((year, month)) => format!("{} {}", MONTH_NAMES[(month - 1) as usize], year),
        None => date.to_string(),
    }
}

/// Format a start/end pair as `"Jan 2020 - Present"` or `"Jan 2020 - Jul 2021"`.
pub fn format_date_range(start: &str, end: Option<&str>) -> String {
    let start = format_date(start);
    let end = match end {
        Some(e) => format_date(e),
        None => "Present".to_string(),
    };
    format!("{start} - {end}")
}

/// Format a `+1-` phone number as `(XXX) XXX-XXXX`; other shapes pass
/// through trimmed.
pub fn format_phone(phone: &str) -> String {
    let cleaned = phone.trim();
    if let Some(rest) = cleaned.strip_prefix("+1-") {
        let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 10 {
            return format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]);
        }
    }
    cleaned.to_string()
}

/// Format an employment duration as `"2 yrs 3 mos"`, `"7 mos"`, or `"< 1 mo"`.
/// Open-ended positions are measured to the current month. Returns an empty
/// string when a date doesn't parse.
pub fn format_duration(start: &str, end: Option<&str>) -> String {
    let Some((sy, sm)) = parse_year_month(start) else {
        return String::new();
    };
    let (ey, em) = match end {
        Some(e) => match parse_year_month(e) {
            Some(parsed) => parsed,
            None => return String::new(),
        },
        None => {
            let now = Utc::now();
            (now.year(), now.month())
        }
    };
    let total = (ey - sy) * 12 + (em as i32 - sm as i32);
    match total {
        ..1 => "< 1 mo".to_string(),
        1..12 => format!("{total} mos"),
        _ => {
            let years = total / 12;
            let months = total % 12;
            let yr = if years == 1 { "yr" } else { "yrs" };
            if months == 0 {
                format!("{years} {yr}")
            } else {
                let mo = if months == 1 { "mo" } else { "mos" };
                format!("{years} {yr} {months} {mo}")
            }
        }
    }
}

/// CSS class for a proficiency token. Unknown tokens get the neutral class.
pub fn skill_level_class(proficiency: &str) -> &'static str {
    match proficiency {
        "expert" => "skill-expert",
        "advanced" => "skill-advanced",
        "intermediate" => "skill-intermediate",
        "beginner" => "skill-beginner",
        _ => "skill-basic",
    }
}

/// shields.io badge color for a proficiency token.
pub fn badge_color(proficiency: &str) -> &'static str {
    match proficiency {
        "expert" => "brightgreen",
        "advanced" => "green",
        "intermediate" => "yellow",
        "beginner" => "orange",
        _ => "lightgrey",
    }
}

/// Markdown image snippet for a skill badge:
/// `![Rust](https://img.shields.io/badge/Rust-expert-brightgreen)`.
///
/// shields.io badge-path escaping: spaces become `%20`, and literal dashes
/// and underscores are doubled so they survive the `label-message-color`
/// split.
pub fn skill_badge(name: &str, proficiency: &str) -> String {
    let color = badge_color(proficiency);
    format!(
        "![{}](https://img.shields.io/badge/{}-{}-{})",
        name,
        badge_escape(name),
        badge_escape(proficiency),
        color
    )
}

fn badge_escape(text: &str) -> String {
    text.replace('-', "--").replace('_', "__").replace(' ', "%20")
}

/// Strip the protocol from a URL for display (`https://a.dev` → `a.dev`).
pub fn format_url(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Escape markdown control characters in free text.
pub fn markdown_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '[' | ']' | '#' | '|' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
