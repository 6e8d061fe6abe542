//! Quota window metadata as reported by provider response headers.

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::HeaderMap;
use std::sync::OnceLock;

/// When a quota window refreshes
#[derive(Debug, Clone, PartialEq)]
pub enum ResetSignal {
    /// Seconds from the moment the response was received
    After(f64),
    /// Explicit expiry timestamp
    At(DateTime<Utc>),
    /// Header was missing or could not be parsed
    Unparsed(String),
}

/// The four quota counters plus two reset signals from one provider response
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitMetadata {
    pub limit_requests: u64,
    pub limit_tokens: u64,
    pub remaining_requests: u64,
    pub remaining_tokens: u64,
    pub reset_requests: ResetSignal,
    pub reset_tokens: ResetSignal,
}

impl RateLimitMetadata {
    /// Parse Groq's `x-ratelimit-*` headers.
    ///
    /// Returns `None` unless all four numeric headers are present and numeric.
    pub fn from_groq_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            limit_requests: header_u64(headers, "x-ratelimit-limit-requests")?,
            limit_tokens: header_u64(headers, "x-ratelimit-limit-tokens")?,
            remaining_requests: header_u64(headers, "x-ratelimit-remaining-requests")?,
            remaining_tokens: header_u64(headers, "x-ratelimit-remaining-tokens")?,
            reset_requests: duration_signal(header_str(headers, "x-ratelimit-reset-requests")),
            reset_tokens: duration_signal(header_str(headers, "x-ratelimit-reset-tokens")),
        })
    }

    /// Parse Anthropic's `anthropic-ratelimit-*` headers (RFC 3339 resets).
    pub fn from_anthropic_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            limit_requests: header_u64(headers, "anthropic-ratelimit-requests-limit")?,
            limit_tokens: header_u64(headers, "anthropic-ratelimit-tokens-limit")?,
            remaining_requests: header_u64(headers, "anthropic-ratelimit-requests-remaining")?,
            remaining_tokens: header_u64(headers, "anthropic-ratelimit-tokens-remaining")?,
            reset_requests: timestamp_signal(header_str(headers, "anthropic-ratelimit-requests-reset")),
            reset_tokens: timestamp_signal(header_str(headers, "anthropic-ratelimit-tokens-reset")),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_str(headers, name).and_then(|v| v.parse::<u64>().ok())
}

fn duration_signal(raw: Option<&str>) -> ResetSignal {
    match raw {
        Some(value) => match parse_reset_duration(value) {
            Some(secs) => ResetSignal::After(secs),
            None => ResetSignal::Unparsed(value.to_string()),
        },
        None => ResetSignal::Unparsed(String::new()),
    }
}

fn timestamp_signal(raw: Option<&str>) -> ResetSignal {
    match raw {
        Some(value) => match DateTime::parse_from_rfc3339(value) {
            Ok(at) => ResetSignal::At(at.with_timezone(&Utc)),
            Err(_) => ResetSignal::Unparsed(value.to_string()),
        },
        None => ResetSignal::Unparsed(String::new()),
    }
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)(ms|h|m|s)").expect("duration pattern is valid")
    })
}

/// Parse a Go-style duration (`2m59.56s`, `7.66s`, `120ms`, `1h2m3s`) or a
/// bare number of seconds into seconds.
///
/// Returns `None` for anything else, including partially matching input.
pub fn parse_reset_duration(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(secs) = raw.parse::<f64>() {
        return if secs.is_finite() && secs >= 0.0 { Some(secs) } else { None };
    }

    let mut total = 0.0;
    let mut consumed = 0;
    for caps in duration_pattern().captures_iter(raw) {
        let whole = caps.get(0)?;
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();

        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        total += match caps.get(2)?.as_str() {
            "h" => value * 3600.0,
            "m" => value * 60.0,
            "s" => value,
            "ms" => value / 1000.0,
            _ => return None,
        };
    }

    if consumed != raw.len() {
        return None;
    }
    Some(total)
}
