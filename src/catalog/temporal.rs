use crate::bondlayer::model::{Event, RelatedEntity};
use crate::catalog::text::{decode_plain_text, sanitize_to_plain_text};
use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// What the original page rendered for an unparseable timestamp.
pub const INVALID_DATE: &str = "Invalid Date";

const CALENDAR_RENDER_URL: &str = "https://www.google.com/calendar/render?action=TEMPLATE";

// encodeURIComponent's unreserved set
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Parses an ISO-8601 timestamp. Offset-less values are read as local time.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|instant| instant.with_timezone(&Utc))
}

/// Two-digit day/month, four-digit year, 24-hour clock, local time:
/// `05/03/2025, 14:30`.
pub fn format(raw: &str) -> String {
    match parse_instant(raw) {
        Some(instant) => instant
            .with_timezone(&Local)
            .format("%d/%m/%Y, %H:%M")
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Compares only the local calendar date; time of day is irrelevant.
/// Unparseable timestamps never compare equal to anything.
pub fn is_same_calendar_day(a: &str, b: &str) -> bool {
    match (parse_instant(a), parse_instant(b)) {
        (Some(a), Some(b)) => {
            let (a, b) = (a.with_timezone(&Local), b.with_timezone(&Local));

            a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
        }
        _ => false,
    }
}

/// Compact UTC basic format for calendar-service query parameters:
/// `YYYYMMDDTHHMMSSZ`.
pub fn to_calendar_url_format(raw: &str) -> String {
    parse_instant(raw)
        .map(|instant| instant.format("%Y%m%dT%H%M%SZ").to_string())
        .unwrap_or_default()
}

/// Composes the calendar-service "add event" deep link. A reversed range is
/// emitted as-is, both ends formatted independently.
pub fn build_calendar_url(event: &Event, location: Option<&RelatedEntity>) -> String {
    let title = decode_plain_text(event.text_display_title.get());
    let details = sanitize_to_plain_text(event.text_sinopse.get());
    let dates = format!(
        "{}/{}",
        to_calendar_url_format(&event.datetime_start_date),
        to_calendar_url_format(&event.datetime_end_date)
    );

    let mut url = format!(
        "{}&text={}&dates={}&details={}",
        CALENDAR_RENDER_URL,
        encode(&title),
        dates,
        encode(&details)
    );

    let venue_line = location
        .map(|venue| {
            [
                decode_plain_text(venue.title.get()),
                decode_plain_text(venue.text_morada.get()),
            ]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(", ")
        })
        .unwrap_or_default();

    if !venue_line.is_empty() {
        url.push_str(&format!("&location={}", encode(&venue_line)));
    }

    url
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, URL_COMPONENT).to_string()
}
