use chrono::{DateTime, SecondsFormat, Utc};

pub(crate) fn time_to_string(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn time_from_str(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|time| time.with_timezone(&Utc))
}

/// Truncates to at most `max_chars` characters. Returns `true` if anything was cut.
pub(crate) fn truncate_chars(s: &mut String, max_chars: usize) -> bool {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            s.truncate(byte_index);
            true
        }
        None => false,
    }
}
