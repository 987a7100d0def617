//! Tera filter adapters over [`crate::format`].
//!
//! Templates see the résumé as JSON, so these filters unwrap `serde_json`
//! values, delegate to the plain formatting functions, and wrap the result
//! back up. Object-valued filters (`date_range`, `duration`, `skill_badge`)
//! take the whole entry rather than keyword arguments so templates never
//! have to pass an optional field explicitly.

use std::collections::HashMap;

use serde_json::Value;
use tera::{Error, Result, Tera};

use crate::format;

/// Register the filters shared by every template-driven format.
pub fn register_common(tera: &mut Tera) {
    tera.register_filter("format_date", format_date);
    tera.register_filter("format_phone", format_phone);
    tera.register_filter("format_url", format_url);
    tera.register_filter("date_range", date_range);
    tera.register_filter("duration", duration);
}

fn as_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::msg(format!("{filter}: expected a string, got {value}")))
}

fn entry_dates<'a>(value: &'a Value, filter: &str) -> Result<(&'a str, Option<&'a str>)> {
    let start = value
        .get("start_date")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::msg(format!("{filter}: expected an object with start_date")))?;
    let end = value.get("end_date").and_then(Value::as_str);
    Ok((start, end))
}

fn format_date(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(format::format_date(as_str(value, "format_date")?).into())
}

fn format_phone(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(format::format_phone(as_str(value, "format_phone")?).into())
}

fn format_url(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(format::format_url(as_str(value, "format_url")?).into())
}

/// `{{ exp | date_range }}` → `"Jan 2020 - Present"`.
fn date_range(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let (start, end) = entry_dates(value, "date_range")?;
    Ok(format::format_date_range(start, end).into())
}

/// `{{ exp | duration }}` → `"2 yrs 3 mos"`.
fn duration(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let (start, end) = entry_dates(value, "duration")?;
    Ok(format::format_duration(start, end).into())
}

/// `{{ skill.proficiency | skill_level_class }}` → `"skill-expert"`.
pub fn skill_level_class(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(format::skill_level_class(as_str(value, "skill_level_class")?).into())
}

/// `{{ overview | markdown | safe }}` — markdown to HTML.
pub fn markdown(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let text = as_str(value, "markdown")?;
    let parser = pulldown_cmark::Parser::new(text);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    Ok(html.into())
}

/// `{{ skill | skill_badge }}` → shields.io badge markdown.
pub fn skill_badge(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::msg("skill_badge: expected an object with name"))?;
    let proficiency = value
        .get("proficiency")
        .and_then(Value::as_str)
        .unwrap_or("");
    Ok(format::skill_badge(name, proficiency).into())
}

/// `{{ text | markdown_escape }}` — escape markdown control characters.
pub fn markdown_escape(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(format::markdown_escape(as_str(value, "markdown_escape")?).into())
}
