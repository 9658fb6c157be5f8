use chrono::{DateTime, TimeZone, Utc};

const WORDS_PER_MINUTE: usize = 200;

/// Strips scripts, event handlers and other unsafe markup from editor HTML.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Whole minutes needed to read `content`, rounded up. Markup is not counted.
pub fn reading_time_minutes(content: &str) -> usize {
    let text = ammonia::Builder::empty().clean(content).to_string();
    let words = text.split_whitespace().count().max(1);
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Creation time embedded in the first four bytes of a 24-hex-digit object id.
pub fn object_id_timestamp(id: &str) -> Option<DateTime<Utc>> {
    if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let seconds = i64::from_str_radix(&id[..8], 16).ok()?;
    Utc.timestamp_opt(seconds, 0).single()
}

pub fn is_http_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
